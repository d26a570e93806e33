//! Exact `multipleOf` keyword
//!
//! Replaces the built-in float check: both the divisor and the instance are
//! read from their JSON text into `BigDecimal`, so `19.99` is a multiple of `0.01`.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use jsonschema::paths::{LazyLocation, Location};
use jsonschema::{Keyword, ValidationError};
use serde_json::{Map, Number, Value};

pub(crate) const KEYWORD: &str = "multipleOf";

/// Parse a JSON number exactly as written
pub(crate) fn to_decimal(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}

struct DecimalMultipleOf {
    divisor: BigDecimal,
    literal: String,
}

impl DecimalMultipleOf {
    fn accepts(&self, number: &Number) -> bool {
        to_decimal(number).is_some_and(|value| (&value % &self.divisor).is_zero())
    }
}

impl Keyword for DecimalMultipleOf {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        location: &LazyLocation,
    ) -> Result<(), ValidationError<'i>> {
        match instance {
            Value::Number(number) if !self.accepts(number) => Err(ValidationError::custom(
                Location::new(),
                location.into(),
                instance,
                format!("{number} is not a multiple of {}", self.literal),
            )),
            _ => Ok(()),
        }
    }

    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::Number(number) => self.accepts(number),
            _ => true,
        }
    }
}

/// Build the keyword from its schema value; the divisor must be a positive number
pub(crate) fn factory<'a>(
    _parent: &'a Map<String, Value>,
    value: &'a Value,
    path: Location,
) -> Result<Box<dyn Keyword>, ValidationError<'a>> {
    let divisor = value
        .as_number()
        .and_then(to_decimal)
        .filter(|d| *d > BigDecimal::zero());

    match divisor {
        Some(divisor) => Ok(Box::new(DecimalMultipleOf {
            divisor,
            literal: value.to_string(),
        })),
        None => Err(ValidationError::custom(
            Location::new(),
            path,
            value,
            format!("{KEYWORD} must be a number greater than 0, got {value}"),
        )),
    }
}
