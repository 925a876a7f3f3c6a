use crate::{
    config::{ConfigError, EngineConfig},
    destination::{CostCategory, CurrencyProfile, DestinationCostProfile},
    money::{to_reference, CurrencyError, Local, Money, Reference},
};
use log::trace;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// A recurring category's share of the budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecurringLine {
    pub category: CostCategory,
    pub monthly_local: Money<Local>,
    pub monthly_reference: Money<Reference>,
    pub weekly_local: Money<Local>,
    pub weekly_reference: Money<Reference>,
}

/// A cost paid once for the whole trip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OneTimeLine {
    pub category: CostCategory,
    pub local: Money<Local>,
    pub reference: Money<Reference>,
}

/// What a trip to a destination costs, split into what is paid every week and what is
/// paid once.
///
/// Derived on demand from a cost profile and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetBreakdown {
    weeks: u32,
    currency: Arc<CurrencyProfile>,
    months: Decimal,

    monthly_recurring_local: Money<Local>,
    monthly_recurring_reference: Money<Reference>,
    weekly_recurring_local: Money<Local>,
    weekly_recurring_reference: Money<Reference>,
    one_time_local: Money<Local>,
    one_time_reference: Money<Reference>,
    trip_total_local: Money<Local>,
    trip_total_reference: Money<Reference>,

    // Only categories with a cost. Zero means "not applicable", not "missing".
    recurring_lines: Vec<RecurringLine>,
    one_time_lines: Vec<OneTimeLine>,
}

#[derive(Error, Debug, PartialEq)]
pub enum BudgetError {
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not price destination: {0}")]
    Currency(#[from] CurrencyError),
}

impl BudgetBreakdown {
    /// Prorate a destination's monthly costs into a weekly budget for a trip of
    /// `weeks` weeks, at the destination currency's real exchange rate.
    pub fn compute(
        destination: &DestinationCostProfile,
        weeks: u32,
        config: &EngineConfig,
    ) -> Result<Self, BudgetError> {
        config.validate()?;

        let rate = destination.real_exchange_rate();
        let weeks_per_month = config.weeks_per_month;
        let trip_weeks = Decimal::from(weeks);

        let monthly_recurring_local =
            Money::try_sum(CostCategory::RECURRING.iter().map(|c| destination.local(*c)))?;
        let monthly_recurring_reference = to_reference(monthly_recurring_local, rate)?;

        let mut recurring_lines = Vec::new();
        for category in CostCategory::RECURRING.iter() {
            let monthly_local = destination.local(*category);
            if monthly_local.is_zero() {
                continue;
            }

            let monthly_reference = to_reference(monthly_local, rate)?;
            recurring_lines.push(RecurringLine {
                category: *category,
                monthly_local,
                monthly_reference,
                weekly_local: monthly_local.try_div(weeks_per_month)?,
                weekly_reference: monthly_reference.try_div(weeks_per_month)?,
            });
        }

        let one_time_local =
            Money::try_sum(CostCategory::ONE_TIME.iter().map(|c| destination.local(*c)))?;
        let one_time_reference = to_reference(one_time_local, rate)?;

        let mut one_time_lines = Vec::new();
        for category in CostCategory::ONE_TIME.iter() {
            let local = destination.local(*category);
            if local.is_zero() {
                continue;
            }

            one_time_lines.push(OneTimeLine {
                category: *category,
                local,
                reference: to_reference(local, rate)?,
            });
        }

        let weekly_recurring_local = monthly_recurring_local.try_div(weeks_per_month)?;
        let weekly_recurring_reference = monthly_recurring_reference.try_div(weeks_per_month)?;

        let breakdown = BudgetBreakdown {
            weeks,
            currency: Arc::clone(&destination.currency),
            months: trip_weeks
                .checked_div(weeks_per_month)
                .ok_or(CurrencyError::Overflow)?,
            monthly_recurring_local,
            monthly_recurring_reference,
            weekly_recurring_local,
            weekly_recurring_reference,
            one_time_local,
            one_time_reference,
            trip_total_local: weekly_recurring_local
                .try_mul(trip_weeks)?
                .try_add(one_time_local)?,
            trip_total_reference: weekly_recurring_reference
                .try_mul(trip_weeks)?
                .try_add(one_time_reference)?,
            recurring_lines,
            one_time_lines,
        };

        trace!(
            "budget for {} ({} weeks): weekly {:?}, one-time {:?}, total {:?}",
            destination.country,
            weeks,
            breakdown.weekly_recurring_reference,
            breakdown.one_time_reference,
            breakdown.trip_total_reference
        );

        Ok(breakdown)
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// The trip length expressed in average months.
    pub fn months(&self) -> Decimal {
        self.months
    }

    /// The currency the destination is priced in. Every conversion in the budget, and
    /// in benefits projected from it, uses its real rate.
    pub fn currency(&self) -> &Arc<CurrencyProfile> {
        &self.currency
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.currency.real_exchange_rate()
    }

    pub fn monthly_recurring_local(&self) -> Money<Local> {
        self.monthly_recurring_local
    }

    pub fn monthly_recurring_reference(&self) -> Money<Reference> {
        self.monthly_recurring_reference
    }

    pub fn weekly_recurring_local(&self) -> Money<Local> {
        self.weekly_recurring_local
    }

    pub fn weekly_recurring_reference(&self) -> Money<Reference> {
        self.weekly_recurring_reference
    }

    pub fn one_time_local(&self) -> Money<Local> {
        self.one_time_local
    }

    pub fn one_time_reference(&self) -> Money<Reference> {
        self.one_time_reference
    }

    pub fn trip_total_local(&self) -> Money<Local> {
        self.trip_total_local
    }

    pub fn trip_total_reference(&self) -> Money<Reference> {
        self.trip_total_reference
    }

    pub fn recurring_lines(&self) -> &[RecurringLine] {
        &self.recurring_lines
    }

    pub fn one_time_lines(&self) -> &[OneTimeLine] {
        &self.one_time_lines
    }

    /// Monthly reference cost of a recurring category, zero when it does not apply.
    pub fn monthly_reference(&self, category: CostCategory) -> Money<Reference> {
        self.recurring_lines
            .iter()
            .find(|l| l.category == category)
            .map(|l| l.monthly_reference)
            .unwrap_or(Money::ZERO)
    }
}
