use crate::error::{BonusBallError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// Amount of money in pence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_pence(pence: u64) -> Self {
        Self(pence)
    }

    pub const fn from_pounds(pounds: u64) -> Self {
        Self(pounds.saturating_mul(100))
    }

    pub fn pence(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_mul(self, rhs: u64) -> Option<Money> {
        self.0.checked_mul(rhs).map(Money)
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Splits into (lower, upper) halves; the odd penny lands in the upper half.
    pub fn split_half(self) -> (Money, Money) {
        let lower = self.0 / 2;
        (Money(lower), Money(self.0 - lower))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u64> for Money {
    type Output = Money;

    fn mul(self, rhs: u64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = BonusBallError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().trim_start_matches('£');
        let invalid = || BonusBallError::config(format!("Invalid amount: {}", s));

        let (pounds, pence) = match raw.split_once('.') {
            Some((pounds, fraction)) => {
                if fraction.is_empty()
                    || fraction.len() > 2
                    || !fraction.chars().all(|c| c.is_ascii_digit())
                {
                    return Err(invalid());
                }
                let mut pence: u64 = fraction.parse().map_err(|_| invalid())?;
                if fraction.len() == 1 {
                    pence *= 10;
                }
                (pounds, pence)
            }
            None => (raw, 0),
        };

        if pounds.is_empty() || !pounds.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let pounds: u64 = pounds.parse().map_err(|_| invalid())?;

        pounds
            .checked_mul(100)
            .and_then(|p| p.checked_add(pence))
            .map(Money)
            .ok_or_else(invalid)
    }
}

/// A numbered pool entry a participant may own and pay for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub number: u32,
    pub owner: Option<String>,
    pub paid_through: DateTime<Utc>,
}

impl Slot {
    pub fn new(number: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            number,
            owner: None,
            paid_through: created_at,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// An unowned slot is never paid.
    pub fn is_paid_for(&self, draw_date: DateTime<Utc>) -> bool {
        self.owner.is_some() && self.paid_through >= draw_date
    }

    pub fn status(&self, draw_date: DateTime<Utc>) -> SlotStatus {
        match (&self.owner, self.is_paid_for(draw_date)) {
            (None, _) => SlotStatus::Open,
            (Some(_), true) => SlotStatus::Paid,
            (Some(_), false) => SlotStatus::Unpaid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Open,
    Paid,
    Unpaid,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "Open"),
            SlotStatus::Paid => write!(f, "Paid"),
            SlotStatus::Unpaid => write!(f, "Unpaid"),
        }
    }
}

/// Who the winning slot belonged to at settlement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawWinner {
    Owner(String),
    Unpaid,
    Unsold,
}

impl DrawWinner {
    pub fn label(&self) -> &str {
        match self {
            DrawWinner::Owner(name) => name,
            DrawWinner::Unpaid => "Unpaid",
            DrawWinner::Unsold => "Unsold",
        }
    }
}

/// Immutable record of one draw's financial outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: u64,
    pub winning_number: u32,
    pub winner: DrawWinner,
    pub prize: Money,
    pub charity: Money,
    pub rollover_carry: Money,
    pub draw_date: DateTime<Utc>,
}

impl Settlement {
    pub fn winner_name(&self) -> &str {
        self.winner.label()
    }
}

/// Figures derived from the pool for the upcoming draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub assigned: usize,
    pub paid: usize,
    pub collected: Money,
    pub rollover: Money,
    pub projected_prize: Money,
    pub projected_charity: Money,
    pub under_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Official draw result reported by a lookup service. Untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResult {
    pub date: String,
    pub number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_money_parse_and_display() {
        assert_eq!("2".parse::<Money>().unwrap(), Money::from_pounds(2));
        assert_eq!("£12.5".parse::<Money>().unwrap(), Money::from_pence(1250));
        assert_eq!(" 0.05 ".parse::<Money>().unwrap(), Money::from_pence(5));
        assert!("1.234".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("-1".parse::<Money>().is_err());
        assert!("3.".parse::<Money>().is_err());
        assert!("184467440737095520".parse::<Money>().is_err());
        assert!("184467440737095516.16".parse::<Money>().is_err());

        assert_eq!(Money::from_pence(1250).to_string(), "£12.50");
        assert_eq!(Money::ZERO.to_string(), "£0.00");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_pence(u64::MAX);
        assert_eq!(max + Money::from_pence(1), max);
        assert_eq!(max * 2, max);
        assert_eq!(Money::from_pounds(u64::MAX), max);
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(Money::from_pence(200).checked_mul(59), Some(Money::from_pence(11800)));
    }

    #[test]
    fn test_split_half_keeps_every_penny() {
        let (lower, upper) = Money::from_pence(4001).split_half();
        assert_eq!(lower, Money::from_pence(2000));
        assert_eq!(upper, Money::from_pence(2001));
        assert_eq!(lower + upper, Money::from_pence(4001));
    }

    #[test]
    fn test_unowned_slot_is_never_paid() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let mut slot = Slot::new(7, created + Duration::weeks(10));
        assert!(!slot.is_paid_for(created));
        assert_eq!(slot.status(created), SlotStatus::Open);

        slot.owner = Some("Alice".to_string());
        assert!(slot.is_paid_for(created));
        assert!(slot.is_paid_for(created + Duration::weeks(10)));
        assert!(!slot.is_paid_for(created + Duration::weeks(11)));
        assert_eq!(slot.status(created + Duration::weeks(11)), SlotStatus::Unpaid);
    }
}
