use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Spending category shared by transactions and their items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Shopping,
    Healthcare,
    Education,
    #[default]
    Others,
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Outcome,
    }

    /// Request body for `POST /transactions`.
    ///
    /// Exactly one of `amount_minor` and `items` must be present.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub category: Option<Category>,
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub items: Option<Vec<ItemNew>>,
        /// RFC3339 timestamp; if absent, server uses now().
        pub created_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub item_name: String,
        pub category: Option<Category>,
        pub price_minor: i64,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: i64,
        pub item_name: String,
        pub category: Category,
        pub price_minor: i64,
        pub quantity: i64,
        pub subtotal_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub kind: TransactionKind,
        pub category: Category,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub created_at: DateTime<Utc>,
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: i64,
        pub amount_minor: i64,
        /// Owner balance after the transaction.
        pub balance_minor: i64,
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDeleted {
        pub amount_minor: i64,
        pub balance_minor: i64,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        /// 1-based page; ignored without `limit`.
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageMeta {
        pub current_page: u64,
        pub limit: u64,
        pub total_items: u64,
        pub total_pages: u64,
        pub has_next_page: bool,
        pub has_previous_page: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub meta: PageMeta,
    }
}

pub mod profile {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RiskManagement {
        Low,
        Medium,
        High,
    }

    /// Request body for `PUT /financial-profile`.
    ///
    /// Absent fields are cleared.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FinancialProfileUpdate {
        pub monthly_income_minor: Option<i64>,
        pub current_savings_minor: Option<i64>,
        pub debt_minor: Option<i64>,
        pub financial_goals: Option<String>,
        pub risk_management: Option<RiskManagement>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FinancialProfileView {
        pub monthly_income_minor: Option<i64>,
        pub current_savings_minor: Option<i64>,
        pub debt_minor: Option<i64>,
        pub financial_goals: Option<String>,
        pub risk_management: Option<RiskManagement>,
        pub total_income_minor: i64,
        pub total_outcome_minor: i64,
    }

    /// Financial snapshot used to ask for advice.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FinancialSummaryView {
        pub balance_minor: i64,
        /// Income booked in the current calendar month (UTC).
        pub month_income_minor: i64,
        /// Outcome booked in the current calendar month (UTC).
        pub month_outcome_minor: i64,
        pub total_income_minor: i64,
        pub total_outcome_minor: i64,
        pub declared_monthly_income_minor: Option<i64>,
        pub current_savings_minor: Option<i64>,
        pub debt_minor: Option<i64>,
        pub financial_goals: Option<String>,
        pub risk_management: Option<RiskManagement>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        pub username: String,
        pub full_name: String,
        pub age: i32,
        pub balance_minor: i64,
        pub financial_profile: Option<super::profile::FinancialProfileView>,
    }

    /// Body of `PUT /user`; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub username: Option<String>,
        pub full_name: Option<String>,
        pub age: Option<i32>,
    }
}

pub mod stats {
    use super::*;

    /// Query string of `GET /stats/history`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HistoryQuery {
        /// Number of months, current one included (default 5).
        pub months: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotalsView {
        /// `YYYY-MM`
        pub month: String,
        pub income_minor: i64,
        pub outcome_minor: i64,
    }
}
