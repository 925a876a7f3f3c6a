use crate::{
    budget::BudgetBreakdown,
    config::{ConfigError, EngineConfig},
    destination::{CostCategory, CurrencyProfile},
    money::{to_local, CurrencyError, Local, Money, Reference},
};
use log::trace;
use rust_decimal::{prelude::ToPrimitive, Decimal, MathematicalOps};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// The financial mechanisms the card offers during a trip.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenefitKind {
    ExchangeRate,
    InvestmentReturns,
    Cashback,
    FreeTransfers,
}

/// Presentation copy for a benefit. Static per kind; nothing here is computed.
#[derive(Debug, PartialEq)]
pub struct BenefitCopy {
    pub id: &'static str,
    pub label: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
}

// Indexed by `BenefitKind as usize`
static COPY: [BenefitCopy; 4] = [
    BenefitCopy {
        id: "exchange-rate",
        label: "5% better exchange rate",
        title: "Cheaper exchange rate",
        description: "Get an exchange rate 5% better than the market average for your whole stay",
        formula: "Monthly spend × 5% × Months abroad = Total exchange rate savings",
    },
    BenefitCopy {
        id: "investment-returns",
        label: "Returns (5% annual)",
        title: "Returns on your savings",
        description: "Earn 5% annual interest, compounded weekly, on your trip savings plan",
        formula: "Interest earned by your departure date if you start saving the trip budget today",
    },
    BenefitCopy {
        id: "cashback",
        label: "3% cashback",
        title: "3% cashback",
        description: "Get 3% back on food, transport and entertainment spending for your whole stay",
        formula: "3% × (Food + Transport + Entertainment) × Months abroad",
    },
    BenefitCopy {
        id: "free-transfers",
        label: "Free transfers",
        title: "Free transfers",
        description: "Send international transfers with no fees during your stay",
        formula: "Cost per transfer × Transfers during your stay = Total savings",
    },
];

/// An entry of the benefit picker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: BenefitKind,
    pub label: &'static str,
}

/// Extra figures some benefits report alongside their amounts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BenefitDetail {
    None,
    Savings {
        weeks_until_start: u32,
        weekly_contribution: Money<Reference>,
    },
    Transfers {
        count: u32,
    },
}

/// A single benefit projection.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitResult {
    pub id: BenefitKind,
    pub title: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub weekly_amount_reference: Money<Reference>,
    pub weekly_amount_local: Money<Local>,
    pub total_amount_reference: Money<Reference>,
    pub detail: BenefitDetail,
    pub currency: Arc<CurrencyProfile>,
}

#[derive(Error, Debug, PartialEq)]
pub enum BenefitError {
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not price benefit: {0}")]
    Currency(#[from] CurrencyError),
    #[error("interest compounding over {0} weeks overflowed")]
    Overflow(u32),
}

/// Everything a benefit calculator reads. Calculators share it immutably and do not
/// depend on each other. Amounts are converted with the budget's own currency.
#[derive(Clone, Copy, Debug)]
pub struct BenefitInput<'a> {
    pub budget: &'a BudgetBreakdown,
    pub weeks_until_start: u32,
    pub config: &'a EngineConfig,
}

// Weekly and whole-trip amounts a calculator produces, before the common fields are
// filled in.
struct Projection {
    weekly: Money<Reference>,
    total: Money<Reference>,
    detail: BenefitDetail,
}

impl BenefitKind {
    /// Every benefit, in display order.
    pub const ALL: [BenefitKind; 4] = [
        BenefitKind::ExchangeRate,
        BenefitKind::InvestmentReturns,
        BenefitKind::Cashback,
        BenefitKind::FreeTransfers,
    ];

    pub fn copy(&self) -> &'static BenefitCopy {
        &COPY[*self as usize]
    }

    pub fn id(&self) -> &'static str {
        self.copy().id
    }

    pub fn from_id(id: &str) -> Option<Self> {
        BenefitKind::ALL.iter().copied().find(|k| k.id() == id)
    }

    /// Project this benefit over the trip described by `input`.
    pub fn calculate(&self, input: &BenefitInput<'_>) -> Result<BenefitResult, BenefitError> {
        input.config.validate()?;

        let projection = match *self {
            BenefitKind::ExchangeRate => exchange_rate(input)?,
            BenefitKind::InvestmentReturns => investment_returns(input)?,
            BenefitKind::Cashback => cashback(input)?,
            BenefitKind::FreeTransfers => free_transfers(input)?,
        };

        let copy = self.copy();
        let result = BenefitResult {
            id: *self,
            title: copy.title,
            description: copy.description,
            formula: copy.formula,
            weekly_amount_reference: projection.weekly,
            weekly_amount_local: to_local(projection.weekly, input.budget.exchange_rate())?,
            total_amount_reference: projection.total,
            detail: projection.detail,
            currency: Arc::clone(input.budget.currency()),
        };

        trace!(
            "{}: weekly {:?}, total {:?}",
            copy.id,
            result.weekly_amount_reference,
            result.total_amount_reference
        );

        Ok(result)
    }
}

/// The ordered (id, label) pairs used to populate a benefit picker.
pub fn catalog() -> Vec<CatalogEntry> {
    BenefitKind::ALL
        .iter()
        .map(|k| CatalogEntry {
            id: *k,
            label: k.copy().label,
        })
        .collect()
}

fn trip_weeks(input: &BenefitInput<'_>) -> Decimal {
    Decimal::from(input.budget.weeks())
}

fn checked(value: Option<Decimal>) -> Result<Decimal, CurrencyError> {
    value.ok_or(CurrencyError::Overflow)
}

// A bonus on the rate, applied to the whole recurring spend
fn exchange_rate(input: &BenefitInput<'_>) -> Result<Projection, BenefitError> {
    let config = input.config;
    let weekly = input
        .budget
        .monthly_recurring_reference()
        .try_mul(config.exchange_rate_benefit)?
        .try_div(config.weeks_per_month)?;

    Ok(Projection {
        weekly,
        total: weekly.try_mul(trip_weeks(input))?,
        detail: BenefitDetail::None,
    })
}

// Interest on saving towards the trip every week from now until departure
fn investment_returns(input: &BenefitInput<'_>) -> Result<Projection, BenefitError> {
    let weeks = input.budget.weeks();
    let weekly_contribution = weekly_contribution(
        input.budget.weekly_recurring_reference(),
        weeks,
        input.weeks_until_start,
    )?;
    let interest = savings_interest(
        input.budget.weekly_recurring_reference(),
        weeks,
        input.weeks_until_start,
        input.config,
    )?;

    let weekly = if weeks == 0 {
        Money::ZERO
    } else {
        // Interest accrues before departure, but is shown spread over the trip so it
        // lines up with the other benefits.
        interest.try_div(trip_weeks(input))?
    };

    Ok(Projection {
        weekly,
        total: interest,
        detail: BenefitDetail::Savings {
            weeks_until_start: input.weeks_until_start,
            weekly_contribution,
        },
    })
}

fn weekly_contribution(
    weekly_recurring: Money<Reference>,
    trip_weeks: u32,
    weeks_until_start: u32,
) -> Result<Money<Reference>, CurrencyError> {
    if weeks_until_start == 0 {
        return Ok(Money::ZERO);
    }

    weekly_recurring
        .try_mul(Decimal::from(trip_weeks))?
        .try_div(Decimal::from(weeks_until_start))
}

/// Interest earned by saving the recurring trip budget in equal weekly deposits until
/// departure, compounded weekly.
///
/// The deposits form an ordinary annuity of `weeks_until_start` payments, so the
/// interest is its future value less the sum of the deposits. With no time left to
/// save, or a zero interest rate, there is no interest.
pub fn savings_interest(
    weekly_recurring: Money<Reference>,
    trip_weeks: u32,
    weeks_until_start: u32,
    config: &EngineConfig,
) -> Result<Money<Reference>, BenefitError> {
    config.validate()?;

    if weeks_until_start == 0 {
        return Ok(Money::ZERO);
    }

    let weekly_rate = checked(
        config
            .annual_interest_rate
            .checked_div(Decimal::from(config.weeks_in_year)),
    )?;
    if weekly_rate.is_zero() {
        return Ok(Money::ZERO);
    }

    let contribution = weekly_contribution(weekly_recurring, trip_weeks, weeks_until_start)?;
    let periods = Decimal::from(weeks_until_start);

    let growth = checked(Decimal::ONE.checked_add(weekly_rate))?
        .checked_powu(u64::from(weeks_until_start))
        .ok_or(BenefitError::Overflow(weeks_until_start))?;
    let annuity_factor = checked(
        growth
            .checked_sub(Decimal::ONE)
            .and_then(|g| g.checked_div(weekly_rate)),
    )?;
    let future_value = contribution.try_mul(annuity_factor)?;
    let interest = future_value.try_sub(contribution.try_mul(periods)?)?;

    // A single deposit earns nothing, but the 28 digit rounding of `1 + rate` can
    // leave a negative residue in the last place.
    if interest.amount() < Decimal::ZERO {
        return Ok(Money::ZERO);
    }

    Ok(interest)
}

// A share of everyday spending comes back
fn cashback(input: &BenefitInput<'_>) -> Result<Projection, BenefitError> {
    let budget = input.budget;
    let config = input.config;

    let eligible = [
        CostCategory::Food,
        CostCategory::Transport,
        CostCategory::Entertainment,
    ];
    let monthly_base = Money::try_sum(eligible.iter().map(|c| budget.monthly_reference(*c)))?;
    let weekly = monthly_base
        .try_div(config.weeks_per_month)?
        .try_mul(config.cashback_rate)?;

    Ok(Projection {
        weekly,
        total: weekly.try_mul(trip_weeks(input))?,
        detail: BenefitDetail::None,
    })
}

// Fees that a fixed number of transfers per month would have cost
fn free_transfers(input: &BenefitInput<'_>) -> Result<Projection, BenefitError> {
    let config = input.config;
    let transfers_per_week = checked(
        config
            .transfers_per_month
            .checked_div(config.weeks_per_month),
    )?;
    let weekly = Money::new(checked(
        transfers_per_week.checked_mul(config.transfer_cost_reference),
    )?);

    let count = checked(config.transfers_per_month.checked_mul(input.budget.months()))?
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX);

    Ok(Projection {
        weekly,
        total: weekly.try_mul(trip_weeks(input))?,
        detail: BenefitDetail::Transfers { count },
    })
}
