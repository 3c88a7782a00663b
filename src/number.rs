// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt::{self, Debug, Display, Formatter};

use serde::ser::Serializer;
use serde::Serialize;

const F64_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// A JSON number. Integers stay exact; everything else is an `f64`.
#[derive(Clone, Copy)]
pub enum Number {
    UInt(u64),
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_i128(self) -> Option<i128> {
        match self {
            Number::UInt(v) => Some(v as i128),
            Number::Int(v) => Some(v as i128),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= F64_SAFE_INTEGER => {
                Some(f as i128)
            }
            Number::Float(_) => None,
        }
    }

    fn to_f64_lossy(self) -> f64 {
        match self {
            Number::UInt(v) => v as f64,
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    fn format_decimal(&self) -> String {
        match self {
            Number::UInt(v) => v.to_string(),
            Number::Int(v) => v.to_string(),
            // Integral floats are written without a fractional part.
            Number::Float(f) => match self.to_i128() {
                Some(i) => i.to_string(),
                None => f.to_string(),
            },
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (self, self.to_i128()) {
            (Number::UInt(v), _) => serializer.serialize_u64(*v),
            (Number::Int(v), _) => serializer.serialize_i64(*v),
            (Number::Float(_), Some(i)) if i >= 0 => serializer.serialize_u64(i as u64),
            (Number::Float(_), Some(i)) => serializer.serialize_i64(i as i64),
            (Number::Float(f), None) => serializer.serialize_f64(*f),
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::UInt(value)
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number::UInt(value as u64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::UInt(u64::from(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.to_i128(), other.to_i128()) {
            return a == b;
        }
        self.to_f64_lossy() == other.to_f64_lossy()
    }
}
