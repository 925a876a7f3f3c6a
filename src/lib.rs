//! Travel budget estimates and card benefit projections.
//!
//! Given a destination's monthly cost profile, a trip length and a departure month,
//! the engine works out what the trip costs per week and in total (in the
//! destination's currency and in the reference currency), then projects four
//! benefits a traveller gets from paying with the card. Everything is a pure
//! function of its inputs; the current time is always passed in.

mod benefit;
mod budget;
mod calculation;
pub mod calendar;
mod config;
mod destination;
mod money;
mod trip;

pub use benefit::{
    catalog, savings_interest, BenefitCopy, BenefitDetail, BenefitError, BenefitInput,
    BenefitKind, BenefitResult, CatalogEntry,
};
pub use budget::{BudgetBreakdown, BudgetError, OneTimeLine, RecurringLine};
pub use calculation::{compute_benefits, BenefitCalculation};
pub use config::{ConfigError, EngineConfig};
pub use destination::{CostCategory, CurrencyProfile, DestinationCostProfile, DestinationError};
pub use money::{to_local, to_reference, Axis, CurrencyError, Local, Money, Reference};
pub use trip::{TripError, TripParameters};

use thiserror::Error;

/// Why a benefit calculation was abandoned.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("invalid trip: {0}")]
    Trip(#[from] TripError),
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("destination data is inconsistent: {0}")]
    Currency(#[from] CurrencyError),
    #[error("could not build budget: {0}")]
    Budget(#[from] BudgetError),
    #[error("could not project benefit: {0}")]
    Benefit(#[from] BenefitError),
}
