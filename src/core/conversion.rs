//! Amount parsing and conversion from the base currency

use crate::core::currency::{Currency, RateTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a number: {input:?}")]
pub struct FormatError {
    pub input: String,
}

/// Parses user-typed amounts such as `1000`, `1 000,50` or `1e3`.
///
/// Spaces are treated as thousands separators and a comma as the decimal
/// separator. Sign and magnitude are not checked.
pub fn parse_amount(raw: &str) -> Result<Decimal, FormatError> {
    let cleaned = raw.trim().replace(' ', "").replace(',', ".");
    if cleaned.is_empty() {
        return Err(FormatError {
            input: raw.to_string(),
        });
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .or_else(|_| match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(saturate(value)),
            _ => Err(FormatError {
                input: raw.to_string(),
            }),
        })
}

// Numbers beyond what `Decimal` holds clamp to its bounds, tiny ones to zero.
fn saturate(value: f64) -> Decimal {
    if value.abs() < 1e-28 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedAmount {
    pub currency: Currency,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: Decimal,
    pub values: Vec<ConvertedAmount>,
}

impl ConversionResult {
    pub fn get(&self, currency: Currency) -> Option<Decimal> {
        self.values
            .iter()
            .find(|v| v.currency == currency)
            .map(|v| v.value)
    }
}

/// Rounds to `scale` places (banker's rounding) and drops trailing zeros.
pub fn round_to(value: Decimal, scale: u32) -> Decimal {
    value.round_dp(scale).normalize()
}

/// Converts `amount` of the base currency into every supported currency.
pub fn convert(amount: Decimal, rates: &RateTable) -> ConversionResult {
    let values = Currency::ALL
        .iter()
        .map(|&currency| ConvertedAmount {
            currency,
            value: round_to(
                amount.saturating_mul(rates.rate_for(currency)),
                currency.conversion_scale(),
            ),
        })
        .collect();

    ConversionResult { amount, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_rates() -> RateTable {
        [
            ("USD", "0.024"),
            ("EUR", "0.022"),
            ("PLN", "0.094"),
            ("GBP", "0.019"),
            ("BTC", "0.0000004"),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), dec(rate)))
        .collect()
    }

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(parse_amount("1000").unwrap(), dec("1000"));
    }

    #[test]
    fn test_parse_with_separators() {
        assert_eq!(parse_amount("1 000,50").unwrap(), dec("1000.5"));
        assert_eq!(parse_amount("  250.75 \n").unwrap(), dec("250.75"));
        assert_eq!(parse_amount("1e3").unwrap(), dec("1000"));
    }

    #[test]
    fn test_parse_keeps_negative_and_zero() {
        assert_eq!(parse_amount("-5").unwrap(), dec("-5"));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_out_of_range_numbers() {
        assert_eq!(parse_amount("1e30").unwrap(), Decimal::MAX);
        assert_eq!(parse_amount("-1e30").unwrap(), Decimal::MIN);
        assert_eq!(
            parse_amount("12345678901234567890123456789012").unwrap(),
            Decimal::MAX
        );
        assert!(parse_amount("1e-30").unwrap().is_zero());
        assert!(
            parse_amount("0.00000000000000000000000000001")
                .unwrap()
                .is_zero()
        );
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_amount("abc"),
            Err(FormatError {
                input: "abc".to_string()
            })
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("   ").is_err());
        assert!(parse_amount("1,000.50").is_err());
    }

    #[test]
    fn test_convert_rounds_per_currency() {
        let result = convert(dec("100"), &sample_rates());

        assert_eq!(result.amount, dec("100"));
        assert_eq!(result.get(Currency::Usd), Some(dec("2.4")));
        assert_eq!(result.get(Currency::Eur), Some(dec("2.2")));
        assert_eq!(result.get(Currency::Pln), Some(dec("9.4")));
        assert_eq!(result.get(Currency::Gbp), Some(dec("1.9")));
        assert_eq!(result.get(Currency::Btc), Some(dec("0.00004")));
        assert_eq!(result.get(Currency::Usd).unwrap().to_string(), "2.4");
    }

    #[test]
    fn test_convert_rounds_half_to_even() {
        let rates: RateTable = [("USD".to_string(), dec("0.001"))].into_iter().collect();

        assert_eq!(convert(dec("5"), &rates).get(Currency::Usd), Some(dec("0")));
        assert_eq!(
            convert(dec("15"), &rates).get(Currency::Usd),
            Some(dec("0.02"))
        );
        assert_eq!(
            convert(dec("25"), &rates).get(Currency::Usd),
            Some(dec("0.02"))
        );
    }

    #[test]
    fn test_convert_missing_rates_yield_zero() {
        let result = convert(dec("100"), &RateTable::default());

        assert_eq!(result.values.len(), Currency::ALL.len());
        assert!(result.values.iter().all(|v| v.value.is_zero()));
    }

    #[test]
    fn test_convert_degenerate_amounts() {
        let rates = sample_rates();

        assert_eq!(
            convert(dec("-100"), &rates).get(Currency::Usd),
            Some(dec("-2.4"))
        );
        assert!(
            convert(Decimal::ZERO, &rates)
                .values
                .iter()
                .all(|v| v.value.is_zero())
        );
    }

    #[test]
    fn test_convert_is_deterministic() {
        let rates = sample_rates();
        assert_eq!(
            convert(dec("1234.56"), &rates),
            convert(dec("1234.56"), &rates)
        );
    }

    #[test]
    fn test_convert_saturates_instead_of_overflowing() {
        let rates: RateTable = [("USD".to_string(), dec("1000"))].into_iter().collect();
        let result = convert(Decimal::MAX, &rates);
        assert_eq!(result.get(Currency::Usd), Some(Decimal::MAX));
    }
}
