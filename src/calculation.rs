use crate::{
    benefit::{BenefitInput, BenefitKind, BenefitResult},
    budget::BudgetBreakdown,
    config::EngineConfig,
    destination::DestinationCostProfile,
    money::{to_local, CurrencyError, Local, Money, Reference},
    trip::TripParameters,
    EngineError,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;

/// The four benefit projections for a trip and what they add up to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitCalculation {
    pub benefits: Vec<BenefitResult>,
    pub total_weekly_reference: Money<Reference>,
    pub total_weekly_local: Money<Local>,
    pub total_amount_reference: Money<Reference>,
    pub total_amount_local: Money<Local>,
    /// How many weeks of recurring trip costs the benefits pay for. `None` when the
    /// destination has no recurring costs to measure against.
    pub equivalent_weeks: Option<Decimal>,
    #[serde(skip)]
    budget: BudgetBreakdown,
}

impl BenefitCalculation {
    /// Sum a set of benefit results against the budget they were projected from.
    pub fn aggregate(
        benefits: Vec<BenefitResult>,
        budget: BudgetBreakdown,
    ) -> Result<Self, CurrencyError> {
        let rate = budget.exchange_rate();

        let total_weekly_reference =
            Money::try_sum(benefits.iter().map(|b| b.weekly_amount_reference))?;
        let total_amount_reference =
            Money::try_sum(benefits.iter().map(|b| b.total_amount_reference))?;

        let weekly_recurring = budget.weekly_recurring_reference();
        let equivalent_weeks = if weekly_recurring.is_zero() {
            warn!("no recurring costs to measure benefits against, equivalent weeks is undefined");
            None
        } else {
            let weeks = total_amount_reference
                .amount()
                .checked_div(weekly_recurring.amount())
                .ok_or(CurrencyError::Overflow)?;
            Some(weeks)
        };

        Ok(BenefitCalculation {
            total_weekly_local: to_local(total_weekly_reference, rate)?,
            total_amount_local: to_local(total_amount_reference, rate)?,
            benefits,
            total_weekly_reference,
            total_amount_reference,
            equivalent_weeks,
            budget,
        })
    }

    /// The budget the benefits were projected from.
    pub fn budget(&self) -> &BudgetBreakdown {
        &self.budget
    }

    pub fn benefit(&self, kind: BenefitKind) -> Option<&BenefitResult> {
        self.benefits.iter().find(|b| b.id == kind)
    }
}

/// Project every benefit for a trip of `weeks` weeks to `destination`, leaving in
/// (`start_month`, `start_year`).
///
/// Out of range trip parameters are rejected, never clamped. A departure that is not
/// in the future is accepted, but leaves no time to save, so the savings benefit is
/// zero.
pub fn compute_benefits(
    destination: &DestinationCostProfile,
    weeks: u32,
    start_month: u32,
    start_year: i32,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<BenefitCalculation, EngineError> {
    config.validate()?;
    let trip = TripParameters::new(weeks, start_month, start_year, config)?;

    if !trip.is_departure_in_future(now, config) {
        warn!(
            "departure {}/{} is not after {}, no savings horizon",
            start_month, start_year, now
        );
    }

    let budget = BudgetBreakdown::compute(destination, trip.weeks(), config)?;
    let input = BenefitInput {
        budget: &budget,
        weeks_until_start: trip.weeks_until_departure(now),
        config,
    };

    let benefits = BenefitKind::ALL
        .iter()
        .map(|kind| kind.calculate(&input))
        .collect::<Result<Vec<_>, _>>()?;

    let calculation = BenefitCalculation::aggregate(benefits, budget)?;

    debug!(
        "benefits for {} over {} weeks: total {:?}, equivalent weeks {:?}",
        destination.country,
        weeks,
        calculation.total_amount_reference,
        calculation.equivalent_weeks
    );

    Ok(calculation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        budget::BudgetError,
        destination::{CostCategory, CurrencyProfile},
        trip::TripError,
    };
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn destination() -> DestinationCostProfile {
        let currency = Arc::new(CurrencyProfile::new("€", "EUR", dec!(20), dec!(21)).unwrap());
        DestinationCostProfile::new("Spain", currency)
            .with_cost(CostCategory::Housing, dec!(500))
            .with_cost(CostCategory::Food, dec!(250))
            .with_cost(CostCategory::Transport, dec!(50))
            .with_cost(CostCategory::Entertainment, dec!(100))
            .with_cost(CostCategory::Activities, dec!(60))
            .with_cost(CostCategory::Extras, dec!(40))
            .with_cost(CostCategory::Insurance, dec!(100))
            .with_cost(CostCategory::Flight, dec!(800))
    }

    #[test]
    fn compute_benefits_in_catalog_order() {
        init();
        let calculation =
            compute_benefits(&destination(), 4, 6, 2027, now(), &EngineConfig::default()).unwrap();
        let ids: Vec<BenefitKind> = calculation.benefits.iter().map(|b| b.id).collect();
        assert_eq!(ids, BenefitKind::ALL.to_vec());
    }

    #[test]
    fn totals_are_exact_sums() {
        init();
        let calculation =
            compute_benefits(&destination(), 12, 3, 2027, now(), &EngineConfig::default())
                .unwrap();

        let total: Decimal = calculation
            .benefits
            .iter()
            .map(|b| b.total_amount_reference.amount())
            .sum();
        assert_eq!(calculation.total_amount_reference.amount(), total);

        let weekly: Decimal = calculation
            .benefits
            .iter()
            .map(|b| b.weekly_amount_reference.amount())
            .sum();
        assert_eq!(calculation.total_weekly_reference.amount(), weekly);
    }

    #[test]
    fn local_totals_use_real_rate() {
        init();
        let calculation =
            compute_benefits(&destination(), 12, 3, 2027, now(), &EngineConfig::default())
                .unwrap();
        assert_eq!(
            calculation.total_amount_local.amount(),
            calculation.total_amount_reference.amount() / dec!(20)
        );
        assert_eq!(
            calculation.total_weekly_local.amount(),
            calculation.total_weekly_reference.amount() / dec!(20)
        );
    }

    #[test]
    fn equivalent_weeks_identity() {
        init();
        let calculation =
            compute_benefits(&destination(), 20, 9, 2027, now(), &EngineConfig::default())
                .unwrap();
        let weekly = calculation.budget().weekly_recurring_reference().amount();
        let equivalent = calculation.equivalent_weeks.unwrap();
        assert_eq!(
            (equivalent * weekly).round_dp(8),
            calculation.total_amount_reference.amount().round_dp(8)
        );
    }

    #[test]
    fn equivalent_weeks_undefined_without_recurring_costs() {
        init();
        let currency = Arc::new(CurrencyProfile::new("€", "EUR", dec!(20), dec!(21)).unwrap());
        let destination = DestinationCostProfile::new("Spain", currency)
            .with_cost(CostCategory::Flight, dec!(800));
        let calculation =
            compute_benefits(&destination, 4, 6, 2027, now(), &EngineConfig::default()).unwrap();

        assert_eq!(calculation.equivalent_weeks, None);
        // Free transfers do not depend on the destination's spending
        assert!(calculation.total_amount_reference.amount() > Decimal::ZERO);
    }

    #[test]
    fn past_departure_has_no_savings_returns() {
        init();
        let calculation =
            compute_benefits(&destination(), 8, 1, 2026, now(), &EngineConfig::default()).unwrap();
        let returns = calculation
            .benefit(BenefitKind::InvestmentReturns)
            .unwrap();
        assert!(returns.total_amount_reference.is_zero());
        assert!(returns.weekly_amount_reference.is_zero());
    }

    #[test]
    fn later_departure_earns_more() {
        init();
        let config = EngineConfig::default();
        let soon = compute_benefits(&destination(), 8, 1, 2027, now(), &config).unwrap();
        let later = compute_benefits(&destination(), 8, 1, 2029, now(), &config).unwrap();

        let returns = |c: &BenefitCalculation| {
            c.benefit(BenefitKind::InvestmentReturns)
                .unwrap()
                .total_amount_reference
        };
        assert!(returns(&later) > returns(&soon));
    }

    #[test]
    fn rejects_out_of_range_weeks() {
        init();
        let result = compute_benefits(&destination(), 0, 6, 2027, now(), &EngineConfig::default());
        assert_eq!(
            result.err(),
            Some(EngineError::Trip(TripError::WeeksOutOfRange(0, 104)))
        );

        let result =
            compute_benefits(&destination(), 105, 6, 2027, now(), &EngineConfig::default());
        assert_eq!(
            result.err(),
            Some(EngineError::Trip(TripError::WeeksOutOfRange(105, 104)))
        );
    }

    #[test]
    fn rejects_out_of_range_month_and_year() {
        init();
        let config = EngineConfig::default();
        assert_eq!(
            compute_benefits(&destination(), 4, 13, 2027, now(), &config).err(),
            Some(EngineError::Trip(TripError::MonthOutOfRange(13)))
        );
        assert_eq!(
            compute_benefits(&destination(), 4, 6, 2040, now(), &config).err(),
            Some(EngineError::Trip(TripError::YearOutOfRange(2040, 2025, 2030)))
        );
    }

    #[test]
    fn rejects_invalid_config() {
        init();
        let config = EngineConfig {
            weeks_per_month: Decimal::ZERO,
            ..EngineConfig::default()
        };
        let result = compute_benefits(&destination(), 4, 6, 2027, now(), &config);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn rejects_broken_exchange_rate() {
        init();
        let mut destination = destination();
        let currency = CurrencyProfile::new("€", "EUR", dec!(20), dec!(21)).unwrap();
        let broken: CurrencyProfile = serde_json::from_value(serde_json::json!({
            "symbol": currency.symbol(),
            "isoCode": currency.iso_code(),
            "realExchangeRate": "0",
            "paddedRate": "0"
        }))
        .unwrap();
        destination.currency = Arc::new(broken);

        let result = compute_benefits(&destination, 4, 6, 2027, now(), &EngineConfig::default());
        assert_eq!(
            result.err(),
            Some(EngineError::Budget(BudgetError::Currency(
                CurrencyError::NonPositiveRate(Decimal::ZERO)
            )))
        );
    }

    #[test]
    fn oversized_destination_cost_is_an_error() {
        init();
        let destination = destination().with_cost(CostCategory::Housing, Decimal::MAX / dec!(10));
        assert!(destination.validate().is_ok());

        let result = compute_benefits(&destination, 4, 6, 2027, now(), &EngineConfig::default());
        assert_eq!(
            result.err(),
            Some(EngineError::Budget(BudgetError::Currency(
                CurrencyError::Overflow
            )))
        );
    }

    #[test]
    fn benefits_use_the_budget_currency() {
        init();
        let destination = destination();
        let calculation =
            compute_benefits(&destination, 4, 6, 2027, now(), &EngineConfig::default()).unwrap();
        for benefit in calculation.benefits.iter() {
            assert!(Arc::ptr_eq(&benefit.currency, calculation.budget().currency()));
            assert!(Arc::ptr_eq(&benefit.currency, &destination.currency));
        }
    }

    #[test]
    fn serializes_for_presentation() {
        init();
        let calculation =
            compute_benefits(&destination(), 4, 6, 2027, now(), &EngineConfig::default()).unwrap();
        let json = serde_json::to_value(&calculation).unwrap();
        assert_eq!(json["benefits"][0]["id"], "exchange-rate");
        assert_eq!(json["benefits"][3]["detail"]["type"], "transfers");
        assert_eq!(json["benefits"][0]["currency"]["isoCode"], "EUR");
        assert!(json.get("budget").is_none());
    }
}
