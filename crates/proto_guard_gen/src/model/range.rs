use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::NumericClass;
use crate::model::ScalarType;

/// A numeric option value, kept in the widest representation of its class.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Convert to the representation of `scalar`, if the value fits exactly.
    ///
    /// Integer fields reject fractional bounds, float fields reject
    /// non-finite ones.
    pub fn convert_to(self, scalar: ScalarType) -> Option<Self> {
        let class = scalar.numeric_class()?;
        let narrow = scalar.is_32_bit();
        match (class, self) {
            (NumericClass::Float, Self::Float(v)) if !v.is_finite() => None,
            (NumericClass::Float, number) if narrow && number.as_f64().abs() > f64::from(f32::MAX) => None,
            (NumericClass::Float, number) => Some(Self::Float(number.as_f64())),
            (NumericClass::Signed, Self::Int(v)) if !narrow || i32::try_from(v).is_ok() => Some(Self::Int(v)),
            (NumericClass::Signed, Self::UInt(v)) => {
                let limit = if narrow { i64::from(i32::MAX) } else { i64::MAX };
                i64::try_from(v).ok().filter(|v| *v <= limit).map(Self::Int)
            }
            (NumericClass::Unsigned, Self::UInt(v)) if !narrow || u32::try_from(v).is_ok() => Some(Self::UInt(v)),
            (NumericClass::Unsigned, Self::Int(v)) => {
                let limit = if narrow { u64::from(u32::MAX) } else { u64::MAX };
                u64::try_from(v).ok().filter(|v| *v <= limit).map(Self::UInt)
            }
            _ => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (Self::UInt(a), Self::UInt(b)) => Some(a.cmp(&b)),
            (Self::Int(a), Self::UInt(b)) => Some(u64::try_from(a).map_or(Ordering::Less, |a| a.cmp(&b))),
            (Self::UInt(a), Self::Int(b)) => Some(u64::try_from(b).map_or(Ordering::Greater, |b| a.cmp(&b))),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRangeError {
    #[error("`{0}` is not a number")]
    Number(String),
    #[error("range `{0}` must look like `[min..max]`, `(min..max)` or a mix of both")]
    Notation(String),
    #[error("range `{0}` has its lower bound above its upper bound")]
    Empty(String),
}

impl FromStr for Number {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseRangeError::Number(s.to_string());
        if s.contains(['.', 'e', 'E']) || s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("nan") {
            return s.parse::<f64>().map(Self::Float).map_err(|_| err());
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Self::Int(v));
        }
        s.parse::<u64>().map(Self::UInt).map_err(|_| err())
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: Number,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundSide {
    Lower,
    Upper,
}

/// Numeric interval with optional ends.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Range {
    pub fn at_least(value: impl Into<Number>) -> Self {
        Self::default().with_lower(Bound::inclusive(value))
    }

    pub fn greater_than(value: impl Into<Number>) -> Self {
        Self::default().with_lower(Bound::exclusive(value))
    }

    pub fn at_most(value: impl Into<Number>) -> Self {
        Self::default().with_upper(Bound::inclusive(value))
    }

    pub fn less_than(value: impl Into<Number>) -> Self {
        Self::default().with_upper(Bound::exclusive(value))
    }

    #[must_use]
    pub const fn with_lower(mut self, bound: Bound) -> Self {
        self.lower = Some(bound);
        self
    }

    #[must_use]
    pub const fn with_upper(mut self, bound: Bound) -> Self {
        self.upper = Some(bound);
        self
    }

    pub const fn bound(&self, side: BoundSide) -> Option<&Bound> {
        match side {
            BoundSide::Lower => self.lower.as_ref(),
            BoundSide::Upper => self.upper.as_ref(),
        }
    }
}

impl FromStr for Range {
    type Err = ParseRangeError;

    /// Parses interval notation such as `[0..10)` or `(0.5..1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = || ParseRangeError::Notation(s.to_string());
        let trimmed = s.trim();
        let lower_inclusive = match trimmed.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(notation()),
        };
        let upper_inclusive = match trimmed.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(notation()),
        };
        let inner = &trimmed[1..trimmed.len() - 1];
        let (lower, upper) = inner.split_once("..").ok_or_else(notation)?;
        if upper.contains("..") {
            return Err(notation());
        }
        let lower = Bound {
            value: lower.parse()?,
            inclusive: lower_inclusive,
        };
        let upper = Bound {
            value: upper.parse()?,
            inclusive: upper_inclusive,
        };
        match lower.value.partial_cmp(&upper.value) {
            Some(Ordering::Less | Ordering::Equal) => Ok(Self::default().with_lower(lower).with_upper(upper)),
            _ => Err(ParseRangeError::Empty(s.to_string())),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => {
                let open = if lower.inclusive { '[' } else { '(' };
                let close = if upper.inclusive { ']' } else { ')' };
                write!(f, "{open}{}..{}{close}", lower.value, upper.value)
            }
            (Some(lower), None) => write!(f, "{} {}", if lower.inclusive { ">=" } else { ">" }, lower.value),
            (None, Some(upper)) => write!(f, "{} {}", if upper.inclusive { "<=" } else { "<" }, upper.value),
            (None, None) => f.write_str("(unbounded)"),
        }
    }
}
