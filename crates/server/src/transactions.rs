//! Transactions API endpoints

use api_types::{
    Category as ApiCategory,
    transaction::{
        ItemNew, ItemView, PageMeta, TransactionCreated, TransactionDeleted,
        TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse, TransactionNew,
        TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    Category, CreateTransactionCmd, MoneyCents, NewItem, PageRequest, TransactionAmount,
    TransactionKind, User,
};

use crate::{ServerError, server::ServerState};

fn map_category(category: Category) -> ApiCategory {
    match category {
        Category::Food => ApiCategory::Food,
        Category::Transportation => ApiCategory::Transportation,
        Category::Utilities => ApiCategory::Utilities,
        Category::Entertainment => ApiCategory::Entertainment,
        Category::Shopping => ApiCategory::Shopping,
        Category::Healthcare => ApiCategory::Healthcare,
        Category::Education => ApiCategory::Education,
        Category::Others => ApiCategory::Others,
    }
}

fn parse_category(category: ApiCategory) -> Category {
    match category {
        ApiCategory::Food => Category::Food,
        ApiCategory::Transportation => Category::Transportation,
        ApiCategory::Utilities => Category::Utilities,
        ApiCategory::Entertainment => Category::Entertainment,
        ApiCategory::Shopping => Category::Shopping,
        ApiCategory::Healthcare => Category::Healthcare,
        ApiCategory::Education => Category::Education,
        ApiCategory::Others => Category::Others,
    }
}

fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Outcome => ApiKind::Outcome,
    }
}

fn parse_kind(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Outcome => TransactionKind::Outcome,
    }
}

fn map_item(item: engine::Item) -> ItemView {
    ItemView {
        id: item.id,
        item_name: item.name,
        category: map_category(item.category),
        price_minor: item.price.cents(),
        quantity: item.quantity,
        subtotal_minor: item.subtotal.cents(),
    }
}

fn parse_amount(
    amount_minor: Option<i64>,
    items: Option<Vec<ItemNew>>,
) -> Result<TransactionAmount, ServerError> {
    match (amount_minor, items) {
        (Some(amount_minor), None) => Ok(TransactionAmount::Direct(MoneyCents::new(amount_minor))),
        (None, Some(items)) => Ok(TransactionAmount::Itemized(
            items
                .into_iter()
                .map(|item| NewItem {
                    name: item.item_name,
                    category: item.category.map(parse_category),
                    price: MoneyCents::new(item.price_minor),
                    quantity: item.quantity,
                })
                .collect(),
        )),
        (None, None) => Err(ServerError::Generic(
            "either amount_minor or items is required".to_string(),
        )),
        (Some(_), Some(_)) => Err(ServerError::Generic(
            "provide only one of amount_minor or items".to_string(),
        )),
    }
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount = parse_amount(payload.amount_minor, payload.items)?;

    let mut cmd = CreateTransactionCmd::new(user.id, parse_kind(payload.kind), amount);
    if let Some(category) = payload.category {
        cmd = cmd.category(parse_category(category));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(created_at) = payload.created_at {
        cmd = cmd.created_at(created_at.with_timezone(&Utc));
    }

    let created = state.engine.create_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: created.id,
            amount_minor: created.amount.cents(),
            balance_minor: created.balance.cents(),
            items: created.items.into_iter().map(map_item).collect(),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let page = state
        .engine
        .list_transactions(
            user.id,
            PageRequest {
                page: query.page,
                limit: query.limit,
            },
        )
        .await?;

    let transactions = page
        .transactions
        .into_iter()
        .map(|tx| TransactionView {
            id: tx.id,
            kind: map_kind(tx.kind),
            category: map_category(tx.category),
            description: tx.description,
            amount_minor: tx.amount.cents(),
            created_at: tx.created_at,
            items: tx.items.into_iter().map(map_item).collect(),
        })
        .collect();

    Ok(Json(TransactionListResponse {
        transactions,
        meta: PageMeta {
            current_page: page.meta.current_page,
            limit: page.meta.limit,
            total_items: page.meta.total_items,
            total_pages: page.meta.total_pages,
            has_next_page: page.meta.has_next_page,
            has_previous_page: page.meta.has_previous_page,
        },
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionDeleted>, ServerError> {
    let deleted = state.engine.delete_transaction(id, user.id).await?;

    Ok(Json(TransactionDeleted {
        amount_minor: deleted.amount.cents(),
        balance_minor: deleted.balance.cents(),
    }))
}
