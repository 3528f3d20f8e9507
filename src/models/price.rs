use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price must be greater than or equal to 0")]
    Negative,
    #[error("price is too large")]
    OutOfRange,
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// Listing price, held as whole pence.
///
/// Callers speak pounds: deserializing accepts a pounds amount (number or
/// decimal string) and serializing yields a two-decimal pounds string such as
/// `"123.45"`. The pence value is what gets persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub fn from_pence(pence: i64) -> Self {
        Self(pence)
    }

    pub fn pence(self) -> i64 {
        self.0
    }

    /// Converts a pounds amount to pence, rounding half away from zero.
    pub fn from_pounds(pounds: Decimal) -> Result<Self, PriceError> {
        if pounds.is_sign_negative() && !pounds.is_zero() {
            return Err(PriceError::Negative);
        }
        let pence = pounds
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::OutOfRange)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        pence.to_i64().map(Self).ok_or(PriceError::OutOfRange)
    }

    /// Parses a pounds amount written as text, e.g. a query parameter.
    pub fn parse_pounds(text: &str) -> Result<Self, PriceError> {
        let pounds =
            Decimal::from_str(text.trim()).map_err(|_| PriceError::Invalid(text.to_string()))?;
        Self::from_pounds(pounds)
    }

    pub fn to_pounds_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pounds_string())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pounds_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pounds = <Decimal as Deserialize>::deserialize(deserializer)?;
        Price::from_pounds(pounds).map_err(serde::de::Error::custom)
    }
}
