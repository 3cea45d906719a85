//! Ledger engine.
//!
//! Owns the transaction ledger, the per-user running balance and the
//! financial profile aggregates, and keeps them consistent: every mutation
//! of the ledger, of the balance and of the aggregates for one operation runs
//! inside a single database transaction.

pub use categories::Category;
pub use commands::{
    CreateTransactionCmd, CreateUserCmd, PageRequest, TransactionAmount,
    UpdateFinancialProfileCmd, UpdateUserCmd,
};
pub use error::EngineError;
pub use financial_profiles::{FinancialProfile, RiskManagement};
pub use items::{Item, NewItem};
pub use money::MoneyCents;
pub use ops::{
    Engine, EngineBuilder, FinancialSummary, MonthlyTotals, PageMeta, TransactionCreated,
    TransactionDeleted, TransactionPage, UserDetail, compute_new_balance,
};
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

mod categories;
mod commands;
mod error;
mod financial_profiles;
mod items;
mod money;
mod ops;
mod passwords;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
