//! Serialization helpers for exact 64-bit integer handling.
//!
//! Signed transactions come back from the extension with 64-bit quantities
//! encoded as plain JSON numbers (possibly beyond 2^53, where a JavaScript
//! consumer would already have lost precision) or as big-number objects of
//! the form `{"bn": {"s", "e", "c"}}`. Both must survive bit-exact:
//! integer tokens are parsed into native 64-bit integers, which `serde_json`
//! keeps exact across the whole i64/u64 range, and rewritten to decimal
//! strings before any typed parsing happens.

use serde::{
    de::{self, Deserializer, Visitor},
    ser::Serializer,
    Deserialize, Serialize,
};
use serde_json::Value;
use std::{
    fmt::{self, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;

/// Largest integer a JavaScript number can hold exactly.
const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// A 64-bit integer that survives JSON exactly.
///
/// Accepted from both JSON numbers and decimal strings. On output a value
/// stays a number while it fits JavaScript's safe-integer range and becomes
/// a decimal string beyond that, so a JavaScript consumer never receives a
/// lossy token.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Long(pub i64);

impl Serialize for Long {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&self.0) {
            serializer.serialize_i64(self.0)
        } else {
            serializer.collect_str(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Long {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LongVisitor;

        impl<'de> Visitor<'de> for LongVisitor {
            type Value = Long;

            fn expecting(&self, f: &mut Formatter) -> fmt::Result {
                f.write_str("a 64-bit integer as a number or decimal string")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Long(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(v)
                    .map(Long)
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse()
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(LongVisitor)
    }
}

impl Display for Long {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for Long {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for Long {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Long)
    }
}

/// A big-number object that does not decode to a 64-bit integer.
#[derive(Debug, Error)]
#[error("malformed big-number object")]
pub struct BigNumberError;

/// Top-level field names that carry 64-bit quantities.
const LONG_FIELDS: [&str; 3] = ["quantity", "amount", "minSponsoredAssetFee"];

/// Rewrites every 64-bit quantity field of a signed transaction to its
/// exact decimal-string form.
///
/// The rewrite is applied by field name across all transaction kinds:
/// `quantity`, `amount` and `minSponsoredAssetFee` at the top level,
/// `amount` inside `transfers` and `payment` entries, integer-typed
/// `data` entry values, and integer invoke-call arguments (including
/// nested lists). Everything else is left untouched.
pub fn normalize_longs(tx: &mut Value) -> Result<(), BigNumberError> {
    let Some(fields) = tx.as_object_mut() else {
        return Ok(());
    };

    for name in LONG_FIELDS {
        if let Some(value) = fields.get_mut(name) {
            normalize_long(value)?;
        }
    }

    for name in ["transfers", "payment"] {
        if let Some(Value::Array(items)) = fields.get_mut(name) {
            for item in items {
                if let Some(amount) = item.get_mut("amount") {
                    normalize_long(amount)?;
                }
            }
        }
    }

    if let Some(Value::Array(entries)) = fields.get_mut("data") {
        for entry in entries {
            normalize_typed_value(entry)?;
        }
    }

    if let Some(args) = fields
        .get_mut("call")
        .and_then(|call| call.get_mut("args"))
        .and_then(Value::as_array_mut)
    {
        for arg in args {
            normalize_arg(arg)?;
        }
    }

    Ok(())
}

fn normalize_typed_value(entry: &mut Value) -> Result<(), BigNumberError> {
    if entry.get("type").and_then(Value::as_str) == Some("integer") {
        if let Some(value) = entry.get_mut("value") {
            normalize_long(value)?;
        }
    }
    Ok(())
}

fn normalize_arg(arg: &mut Value) -> Result<(), BigNumberError> {
    match arg.get("type").and_then(Value::as_str) {
        Some("integer") => normalize_typed_value(arg),
        Some("list") => {
            if let Some(Value::Array(items)) = arg.get_mut("value") {
                for item in items {
                    normalize_arg(item)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn normalize_long(value: &mut Value) -> Result<(), BigNumberError> {
    match value {
        // Integer tokens in the 64-bit range parse without loss, so
        // printing the number reproduces the source token exactly.
        Value::Number(n) => {
            *value = Value::String(n.to_string());
            Ok(())
        }
        Value::Object(fields) => {
            let bn = fields.get("bn").ok_or(BigNumberError)?;
            *value = Value::String(decode_bn(bn)?);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Decodes `{s, e, c}`: sign, decimal exponent of the leading digit, and
/// base-10^14 coefficient limbs with the most significant limb written bare
/// and the rest zero-padded to 14 digits.
fn decode_bn(bn: &Value) -> Result<String, BigNumberError> {
    let sign = bn.get("s").and_then(Value::as_i64).ok_or(BigNumberError)?;
    let exponent = bn.get("e").and_then(Value::as_i64).ok_or(BigNumberError)?;
    let limbs = bn.get("c").and_then(Value::as_array).ok_or(BigNumberError)?;
    if exponent < 0 || limbs.is_empty() {
        return Err(BigNumberError);
    }

    let mut digits = String::new();
    for (i, limb) in limbs.iter().enumerate() {
        let limb = limb.as_u64().ok_or(BigNumberError)?;
        if i == 0 {
            digits.push_str(&limb.to_string());
        } else {
            if limb >= 100_000_000_000_000 {
                return Err(BigNumberError);
            }
            digits.push_str(&format!("{limb:014}"));
        }
    }

    // The integer part spans `e + 1` digits; anything past that would be a
    // fraction, which a long cannot hold.
    let width = (exponent as usize) + 1;
    if digits.len() > width {
        return Err(BigNumberError);
    }
    while digits.len() < width {
        digits.push('0');
    }

    if sign < 0 && digits != "0" {
        Ok(format!("-{digits}"))
    } else {
        Ok(digits)
    }
}
