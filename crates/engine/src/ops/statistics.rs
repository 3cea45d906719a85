use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, TransactionKind};

use super::{Engine, ledger::LedgerRow, with_tx};

/// Longest history (in months) served by [`Engine::monthly_history`].
pub const MAX_HISTORY_MONTHS: u32 = 24;

/// Income and outcome booked in one calendar month (UTC).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: MoneyCents,
    pub outcome: MoneyCents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub(super) fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Shifts by `delta` months (negative goes back in time).
    pub(super) fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub(super) fn start(self) -> ResultEngine<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| EngineError::InvalidPage(format!("invalid month {}", self.label())))
    }

    fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Sums amounts per direction, rejecting overflow.
pub(super) fn sum_by_kind<'a>(
    rows: impl IntoIterator<Item = &'a LedgerRow>,
) -> ResultEngine<(MoneyCents, MoneyCents)> {
    let overflow = || EngineError::InvalidAmount("ledger total too large".to_string());
    let mut income = MoneyCents::ZERO;
    let mut outcome = MoneyCents::ZERO;
    for row in rows {
        match row.kind {
            TransactionKind::Income => {
                income = income.checked_add(row.amount).ok_or_else(overflow)?;
            }
            TransactionKind::Outcome => {
                outcome = outcome.checked_add(row.amount).ok_or_else(overflow)?;
            }
        }
    }
    Ok((income, outcome))
}

/// Buckets `rows` into the `months` calendar months ending with the month of
/// `now`, oldest first. Months without rows are present with zero totals.
fn bucket_by_month(
    rows: &[LedgerRow],
    months: u32,
    now: DateTime<Utc>,
) -> ResultEngine<Vec<MonthlyTotals>> {
    let current = YearMonth::of(now);
    let first = current.shift(-(months as i32 - 1));

    let mut out = Vec::with_capacity(months as usize);
    for offset in 0..months as i32 {
        let month = first.shift(offset);
        let (income, outcome) =
            sum_by_kind(rows.iter().filter(|row| YearMonth::of(row.created_at) == month))?;
        out.push(MonthlyTotals {
            month: month.label(),
            income,
            outcome,
        });
    }
    Ok(out)
}

impl Engine {
    /// Income/outcome totals of `user_id` for the last `months` calendar
    /// months, the month of `now` included.
    pub async fn monthly_history(
        &self,
        user_id: i64,
        months: u32,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<MonthlyTotals>> {
        if months == 0 || months > MAX_HISTORY_MONTHS {
            return Err(EngineError::InvalidPage(format!(
                "months must be between 1 and {MAX_HISTORY_MONTHS}"
            )));
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let since = YearMonth::of(now).shift(-(months as i32 - 1)).start()?;
            let rows = self.ledger_rows(&db_tx, user_id, Some(since)).await?;
            bucket_by_month(&rows, months, now)
        })
    }
}
