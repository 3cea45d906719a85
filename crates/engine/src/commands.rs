//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transaction creation,
//! profile updates, user creation), keeping call sites readable and avoiding
//! long argument lists.

use chrono::{DateTime, Utc};

use crate::{Category, MoneyCents, NewItem, RiskManagement, TransactionKind};

/// How the amount of a new transaction is determined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAmount {
    /// The amount is given as is.
    Direct(MoneyCents),
    /// The amount is the sum of `price × quantity` over the items.
    Itemized(Vec<NewItem>),
}

/// Create a transaction for `user_id`.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub amount: TransactionAmount,
    pub created_at: DateTime<Utc>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(user_id: i64, kind: TransactionKind, amount: TransactionAmount) -> Self {
        Self {
            user_id,
            kind,
            category: None,
            description: None,
            amount,
            created_at: Utc::now(),
        }
    }

    /// Shortcut for a non-itemized transaction.
    #[must_use]
    pub fn direct(user_id: i64, kind: TransactionKind, amount: MoneyCents) -> Self {
        Self::new(user_id, kind, TransactionAmount::Direct(amount))
    }

    /// Shortcut for an itemized transaction.
    #[must_use]
    pub fn itemized(user_id: i64, kind: TransactionKind, items: Vec<NewItem>) -> Self {
        Self::new(user_id, kind, TransactionAmount::Itemized(items))
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Page selection for transaction listings.
///
/// Without a `limit` the whole ledger is returned and `page` is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

/// Overwrite the user-editable fields of a financial profile.
///
/// Every field is written as given, `None` clears it.
#[derive(Clone, Debug, Default)]
pub struct UpdateFinancialProfileCmd {
    pub user_id: i64,
    pub monthly_income: Option<MoneyCents>,
    pub current_savings: Option<MoneyCents>,
    pub debt: Option<MoneyCents>,
    pub financial_goals: Option<String>,
    pub risk_management: Option<RiskManagement>,
}

impl UpdateFinancialProfileCmd {
    #[must_use]
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }
}

/// Create a user account with an opening balance.
#[derive(Clone, Debug)]
pub struct CreateUserCmd {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub age: Option<i32>,
    pub initial_balance: MoneyCents,
}

impl CreateUserCmd {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            age: None,
            initial_balance: MoneyCents::ZERO,
        }
    }

    #[must_use]
    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    #[must_use]
    pub fn initial_balance(mut self, balance: MoneyCents) -> Self {
        self.initial_balance = balance;
        self
    }
}

/// Edit the account details of a user.
///
/// Only the fields that are set are written. The balance is not editable here.
#[derive(Clone, Debug, Default)]
pub struct UpdateUserCmd {
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<i32>,
}

impl UpdateUserCmd {
    #[must_use]
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }
}
