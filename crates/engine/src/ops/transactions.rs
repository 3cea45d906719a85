use serde::{Deserialize, Serialize};

use crate::{Item, MoneyCents, Transaction};

mod create;
mod delete;
mod list;

/// Result of a successful create: the new row and the owner balance after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCreated {
    pub id: i64,
    pub amount: MoneyCents,
    pub balance: MoneyCents,
    pub items: Vec<Item>,
}

/// Result of a successful delete: the reverted amount and the new balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDeleted {
    pub amount: MoneyCents,
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Pagination metadata for `page` (1-based) of `limit` rows out of `total_items`.
    ///
    /// A zero `limit` only happens for an unpaged listing of an empty ledger
    /// and yields zero pages.
    pub fn compute(page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit)
        };
        Self {
            current_page: page,
            limit,
            total_items,
            total_pages,
            has_next_page: total_items > limit.saturating_mul(page),
            has_previous_page: page > 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub meta: PageMeta,
}
