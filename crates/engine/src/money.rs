use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed amount of money in **integer cents**.
///
/// Balances, transaction amounts, item prices and the profile aggregates all
/// use it; the database keeps the raw value in the `*_minor` columns. There is
/// no unchecked arithmetic: every sum goes through the `checked_*` methods so
/// that an overflow surfaces as an [`EngineError::InvalidAmount`] upstream.
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap(), MoneyCents::new(10_50));
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Price times quantity, `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: i64) -> Option<MoneyCents> {
        self.0.checked_mul(quantity).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

fn invalid_amount(reason: &str, raw: &str) -> EngineError {
    EngineError::InvalidAmount(format!("{reason}: {raw:?}"))
}

fn all_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses amounts typed by a human: `10`, `10.5`, `-0,01`, `+1.00`.
    ///
    /// At most two fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, trimmed[1..].trim_start()),
            Some(b'+') => (false, trimmed[1..].trim_start()),
            _ => (false, trimmed),
        };
        if body.is_empty() {
            return Err(invalid_amount("empty amount", s));
        }

        let (units, fraction) = body
            .split_once(['.', ','])
            .unwrap_or((body, ""));
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid_amount("invalid amount", s));
        }

        let fraction_cents = match fraction.len() {
            0 => 0,
            1 | 2 => {
                let digits: i64 = fraction
                    .parse()
                    .map_err(|_| invalid_amount("invalid amount", s))?;
                if fraction.len() == 1 { digits * 10 } else { digits }
            }
            _ => return Err(invalid_amount("too many decimals", s)),
        };

        let cents = units
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(|cents| if negative { -cents } else { cents })
            .ok_or_else(|| invalid_amount("amount too large", s))?;

        Ok(MoneyCents(cents))
    }
}
