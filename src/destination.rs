use crate::money::{self, CurrencyError, Local, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A currency that destinations are priced in, with its rates against the
/// reference currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyProfile {
    symbol: String,
    iso_code: String,
    // Reference units per one local unit
    real_exchange_rate: Decimal,
    // The real rate plus a safety margin, used for conservative quotes
    padded_rate: Decimal,
}

impl CurrencyProfile {
    pub fn new<S: Into<String>, T: Into<String>>(
        symbol: S,
        iso_code: T,
        real_exchange_rate: Decimal,
        padded_rate: Decimal,
    ) -> Result<Self, CurrencyError> {
        money::check_rate(real_exchange_rate)?;
        money::check_rate(padded_rate)?;

        Ok(CurrencyProfile {
            symbol: symbol.into(),
            iso_code: iso_code.into(),
            real_exchange_rate,
            padded_rate,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn iso_code(&self) -> &str {
        &self.iso_code
    }

    pub fn real_exchange_rate(&self) -> Decimal {
        self.real_exchange_rate
    }

    pub fn padded_rate(&self) -> Decimal {
        self.padded_rate
    }

    fn validate(&self) -> Result<(), CurrencyError> {
        money::check_rate(self.real_exchange_rate)?;
        money::check_rate(self.padded_rate)
    }
}

/// A line of the destination cost sheet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    Housing,
    Food,
    Transport,
    Entertainment,
    Activities,
    Extras,
    Flight,
    Communication,
    Insurance,
}

impl CostCategory {
    /// Costs paid every month of the trip, in display order.
    pub const RECURRING: [CostCategory; 6] = [
        CostCategory::Housing,
        CostCategory::Food,
        CostCategory::Transport,
        CostCategory::Entertainment,
        CostCategory::Activities,
        CostCategory::Extras,
    ];

    /// Costs paid once per trip, whatever its length, in display order.
    pub const ONE_TIME: [CostCategory; 3] = [
        CostCategory::Flight,
        CostCategory::Communication,
        CostCategory::Insurance,
    ];

    pub fn id(&self) -> &'static str {
        match *self {
            CostCategory::Housing => "housing",
            CostCategory::Food => "food",
            CostCategory::Transport => "transport",
            CostCategory::Entertainment => "entertainment",
            CostCategory::Activities => "activities",
            CostCategory::Extras => "extras",
            CostCategory::Flight => "flight",
            CostCategory::Communication => "communication",
            CostCategory::Insurance => "insurance",
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            CostCategory::Housing => "Housing",
            CostCategory::Food => "Food",
            CostCategory::Transport => "Transport",
            CostCategory::Entertainment => "Entertainment",
            CostCategory::Activities => "Tourist activities",
            CostCategory::Extras => "Extras",
            CostCategory::Flight => "Round-trip flight",
            CostCategory::Communication => "Mobile data and WiFi",
            CostCategory::Insurance => "Insurance and paperwork",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(
            *self,
            CostCategory::Flight | CostCategory::Communication | CostCategory::Insurance
        )
    }
}

/// The cost profile of a destination, as served by the catalog.
///
/// Every cost is in the destination's local currency. Recurring categories are per
/// month; flight, communication and insurance are paid once per trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationCostProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub continent: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,

    pub housing_cost: Decimal,
    pub food_cost: Decimal,
    pub transport_cost: Decimal,
    pub entertainment_cost: Decimal,
    pub insurance_cost: Decimal,
    pub flight_cost: Decimal,
    pub communication_cost: Decimal,
    pub activities_cost: Decimal,
    pub extras_cost: Decimal,
    #[serde(default)]
    pub contingency_percent: Decimal,
    #[serde(default)]
    pub bank_fees_cost: Decimal,

    // Totals precomputed by the catalog. The engine reports them but never
    // derives anything from them.
    #[serde(default)]
    pub total_monthly_local: Decimal,
    #[serde(default, alias = "totalMonthlyMxnReal")]
    pub total_monthly_reference_real: Decimal,
    #[serde(default, alias = "totalMonthlyMxnPadded")]
    pub total_monthly_reference_padded: Decimal,

    pub currency: Arc<CurrencyProfile>,
}

#[derive(Error, Debug, PartialEq)]
pub enum DestinationError {
    #[error("cost '{0}' is negative: {1}")]
    NegativeCost(&'static str, Decimal),
    #[error("invalid currency: {0}")]
    Currency(#[from] CurrencyError),
    #[error("could not parse destination: {0}")]
    Parse(String),
}

impl DestinationCostProfile {
    /// A profile with every cost set to zero, ready to be filled in with `with_cost`.
    pub fn new<S: Into<String>>(country: S, currency: Arc<CurrencyProfile>) -> Self {
        DestinationCostProfile {
            id: String::new(),
            continent: String::new(),
            country: country.into(),
            city: None,
            image_url: None,
            housing_cost: Decimal::ZERO,
            food_cost: Decimal::ZERO,
            transport_cost: Decimal::ZERO,
            entertainment_cost: Decimal::ZERO,
            insurance_cost: Decimal::ZERO,
            flight_cost: Decimal::ZERO,
            communication_cost: Decimal::ZERO,
            activities_cost: Decimal::ZERO,
            extras_cost: Decimal::ZERO,
            contingency_percent: Decimal::ZERO,
            bank_fees_cost: Decimal::ZERO,
            total_monthly_local: Decimal::ZERO,
            total_monthly_reference_real: Decimal::ZERO,
            total_monthly_reference_padded: Decimal::ZERO,
            currency,
        }
    }

    pub fn with_cost(mut self, category: CostCategory, amount: Decimal) -> Self {
        *self.cost_mut(category) = amount;
        self
    }

    /// Parse a catalog record and check it is fit for calculation.
    pub fn from_json(json: &str) -> Result<Self, DestinationError> {
        let destination: DestinationCostProfile =
            serde_json::from_str(json).map_err(|e| DestinationError::Parse(e.to_string()))?;
        destination.validate()?;
        Ok(destination)
    }

    /// Checks the data integrity guarantees the engine relies on: no negative costs and
    /// positive exchange rates.
    pub fn validate(&self) -> Result<(), DestinationError> {
        self.currency.validate()?;

        for category in CostCategory::RECURRING.iter().chain(CostCategory::ONE_TIME.iter()) {
            let value = self.cost(*category);
            if value < Decimal::ZERO {
                return Err(DestinationError::NegativeCost(category.id(), value));
            }
        }

        let extras = [
            ("contingency", self.contingency_percent),
            ("bank-fees", self.bank_fees_cost),
        ];
        for (name, value) in extras.iter() {
            if *value < Decimal::ZERO {
                return Err(DestinationError::NegativeCost(*name, *value));
            }
        }

        Ok(())
    }

    /// The catalog figure for a category: monthly for recurring costs, per trip for
    /// one-time costs.
    pub fn cost(&self, category: CostCategory) -> Decimal {
        match category {
            CostCategory::Housing => self.housing_cost,
            CostCategory::Food => self.food_cost,
            CostCategory::Transport => self.transport_cost,
            CostCategory::Entertainment => self.entertainment_cost,
            CostCategory::Activities => self.activities_cost,
            CostCategory::Extras => self.extras_cost,
            CostCategory::Flight => self.flight_cost,
            CostCategory::Communication => self.communication_cost,
            CostCategory::Insurance => self.insurance_cost,
        }
    }

    fn cost_mut(&mut self, category: CostCategory) -> &mut Decimal {
        match category {
            CostCategory::Housing => &mut self.housing_cost,
            CostCategory::Food => &mut self.food_cost,
            CostCategory::Transport => &mut self.transport_cost,
            CostCategory::Entertainment => &mut self.entertainment_cost,
            CostCategory::Activities => &mut self.activities_cost,
            CostCategory::Extras => &mut self.extras_cost,
            CostCategory::Flight => &mut self.flight_cost,
            CostCategory::Communication => &mut self.communication_cost,
            CostCategory::Insurance => &mut self.insurance_cost,
        }
    }

    pub fn local(&self, category: CostCategory) -> Money<Local> {
        Money::new(self.cost(category))
    }

    pub fn real_exchange_rate(&self) -> Decimal {
        self.currency.real_exchange_rate()
    }
}
