//! Price record types and the numeric codec into them.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A price in canonical decimal-string form.
///
/// All fields are decimal integers kept as strings so that chains with
/// different native integer widths round-trip without precision loss.
/// The represented value is `price * 10^expo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub price: String,
    pub conf: String,
    pub expo: String,
    pub publish_time: String,
}

impl PriceRecord {
    /// Build a record from chain-native integers of any width.
    pub fn from_parts(
        price: impl Display,
        conf: impl Display,
        expo: impl Display,
        publish_time: impl Display,
    ) -> Self {
        Self {
            price: price.to_string(),
            conf: conf.to_string(),
            expo: expo.to_string(),
            publish_time: publish_time.to_string(),
        }
    }

    /// The price as a scaled decimal (`price * 10^expo`).
    pub fn scaled(&self) -> Result<Decimal> {
        scale_decimal(&self.price, &self.expo)
    }

    /// The confidence interval as a scaled decimal (`conf * 10^expo`).
    pub fn scaled_conf(&self) -> Result<Decimal> {
        scale_decimal(&self.conf, &self.expo)
    }
}

/// Current and exponentially-weighted moving average price of one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeed {
    pub price: PriceRecord,
    pub ema_price: PriceRecord,
}

fn scale_decimal(mantissa: &str, expo: &str) -> Result<Decimal> {
    let mantissa: i64 = mantissa.parse()?;
    let expo: i32 = expo.parse()?;

    if expo <= 0 {
        let scale = expo.unsigned_abs();
        Decimal::try_from_i128_with_scale(mantissa as i128, scale)
            .map_err(|e| AppError::NumericOverflow(format!("10^{expo} scale: {e}")))
    } else {
        let factor = 10i64
            .checked_pow(expo as u32)
            .ok_or_else(|| AppError::NumericOverflow(format!("10^{expo} exceeds i64")))?;
        Decimal::from(mantissa)
            .checked_mul(Decimal::from(factor))
            .ok_or_else(|| AppError::NumericOverflow(format!("{mantissa} * 10^{expo}")))
    }
}
