//! Currency rate abstractions and core types

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Display;

/// Currency every rate table is quoted against.
pub const BASE_CURRENCY: &str = "UAH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Currency {
    Usd,
    Eur,
    Pln,
    Gbp,
    Btc,
}

impl Currency {
    /// Currencies shown in rate reports and conversions, in display order.
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Pln,
        Currency::Gbp,
        Currency::Btc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Pln => "PLN",
            Currency::Gbp => "GBP",
            Currency::Btc => "BTC",
        }
    }

    /// Decimal places kept for a converted amount.
    pub fn conversion_scale(&self) -> u32 {
        match self {
            Currency::Btc => 6,
            _ => 2,
        }
    }

    /// Decimal places kept when showing the raw rate.
    pub fn rate_scale(&self) -> u32 {
        match self {
            Currency::Btc => 6,
            _ => 4,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Units of each currency per one unit of the base currency.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Rate for a currency code; unknown codes read as zero.
    pub fn rate(&self, code: &str) -> Decimal {
        self.rates.get(code).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn rate_for(&self, currency: Currency) -> Decimal {
        self.rate(currency.code())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    /// The provider could not be reached or answered with something unreadable.
    #[error("failed to fetch exchange rates: {0}")]
    Fetch(String),
    /// The provider answered but reported a failure.
    #[error("exchange rate provider reported an error")]
    Provider,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable, RateError>;
}
