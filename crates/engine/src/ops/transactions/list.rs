use sea_orm::TransactionTrait;

use crate::{EngineError, PageRequest, ResultEngine};

use super::{
    super::{Engine, with_tx},
    PageMeta, TransactionPage,
};

fn validate_page_request(request: PageRequest) -> ResultEngine<()> {
    if request.page == Some(0) {
        return Err(EngineError::InvalidPage("page must be >= 1".to_string()));
    }
    if request.limit == Some(0) {
        return Err(EngineError::InvalidPage("limit must be >= 1".to_string()));
    }
    Ok(())
}

impl Engine {
    /// Lists the transactions of `user_id` by ascending id, each with its
    /// items.
    ///
    /// Without a `limit` the whole ledger is returned as page 1. Page rows
    /// and the total count are read from the same snapshot.
    pub async fn list_transactions(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> ResultEngine<TransactionPage> {
        validate_page_request(request)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let (page, offset) = match request.limit {
                Some(limit) => {
                    let page = request.page.unwrap_or(1);
                    (page, Some(limit.saturating_mul(page - 1)))
                }
                None => (1, None),
            };

            let mut transactions = self
                .select_transactions(&db_tx, user_id, request.limit, offset)
                .await?;
            let total_items = self.count_transactions(&db_tx, user_id).await?;

            let ids: Vec<i64> = transactions.iter().map(|tx| tx.id).collect();
            let mut items = self.items_for_transactions(&db_tx, &ids).await?;
            for transaction in &mut transactions {
                transaction.items = items.remove(&transaction.id).unwrap_or_default();
            }

            let limit = request.limit.unwrap_or(transactions.len() as u64);
            Ok(TransactionPage {
                meta: PageMeta::compute(page, limit, total_items),
                transactions,
            })
        })
    }
}
