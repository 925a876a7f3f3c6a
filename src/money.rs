use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, marker::PhantomData};
use thiserror::Error;

/// Marks which side of an exchange rate a `Money` value is denominated in.
pub trait Axis: Copy + fmt::Debug + PartialEq + PartialOrd {
    const NAME: &'static str;
}

/// The currency of a destination's cost profile.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Local;

/// The single currency that every amount is normalised to for comparison.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Reference;

impl Axis for Local {
    const NAME: &'static str = "local";
}

impl Axis for Reference {
    const NAME: &'static str = "reference";
}

/// An amount of money on a single currency axis.
///
/// Local and reference amounts are distinct types, so mixing them up is a compile
/// error rather than a wrong number. The only way across is `to_reference` and
/// `to_local`. No rounding is ever applied here; that is left to whoever displays
/// the value.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money<A: Axis> {
    amount: Decimal,
    #[serde(skip)]
    axis: PhantomData<A>,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum CurrencyError {
    #[error("exchange rate must be greater than zero, got {0}")]
    NonPositiveRate(Decimal),
    #[error("amount is outside the representable decimal range")]
    Overflow,
}

impl<A: Axis> Money<A> {
    pub const ZERO: Self = Money {
        amount: Decimal::ZERO,
        axis: PhantomData,
    };

    pub fn new(amount: Decimal) -> Self {
        Money {
            amount,
            axis: PhantomData,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    // Costs are bounded below but not above, so arithmetic is checked
    pub fn try_add(self, rhs: Self) -> Result<Self, CurrencyError> {
        checked(self.amount.checked_add(rhs.amount))
    }

    pub fn try_sub(self, rhs: Self) -> Result<Self, CurrencyError> {
        checked(self.amount.checked_sub(rhs.amount))
    }

    /// Scale by a plain number (weeks, percentages). The axis is kept.
    pub fn try_mul(self, rhs: Decimal) -> Result<Self, CurrencyError> {
        checked(self.amount.checked_mul(rhs))
    }

    /// Divide by a plain number. A zero divisor is reported as an overflow.
    pub fn try_div(self, rhs: Decimal) -> Result<Self, CurrencyError> {
        checked(self.amount.checked_div(rhs))
    }

    pub fn try_sum<I: IntoIterator<Item = Self>>(iter: I) -> Result<Self, CurrencyError> {
        iter.into_iter().try_fold(Self::ZERO, |acc, m| acc.try_add(m))
    }
}

fn checked<A: Axis>(amount: Option<Decimal>) -> Result<Money<A>, CurrencyError> {
    amount.map(Money::new).ok_or(CurrencyError::Overflow)
}

/// Converts a local amount into the reference currency.
///
/// `rate` is the number of reference units bought by one local unit.
pub fn to_reference(amount: Money<Local>, rate: Decimal) -> Result<Money<Reference>, CurrencyError> {
    check_rate(rate)?;
    checked(amount.amount.checked_mul(rate))
}

/// Converts a reference amount back into the local currency.
pub fn to_local(amount: Money<Reference>, rate: Decimal) -> Result<Money<Local>, CurrencyError> {
    check_rate(rate)?;
    checked(amount.amount.checked_div(rate))
}

pub(crate) fn check_rate(rate: Decimal) -> Result<(), CurrencyError> {
    if rate <= Decimal::ZERO {
        return Err(CurrencyError::NonPositiveRate(rate));
    }
    Ok(())
}

impl<A: Axis> Default for Money<A> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<A: Axis> fmt::Debug for Money<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.amount, A::NAME)
    }
}

impl<A: Axis> fmt::Display for Money<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.amount, f)
    }
}
