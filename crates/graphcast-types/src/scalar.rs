//! Protected scalar values
//!
//! A scalar never needs further conversion: the graph walker returns it
//! unchanged, renderers write it as a leaf.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde_json::{Number as JsonNumber, Value as JsonValue};
use std::fmt;

/// A native value that terminates conversion.
///
/// # Examples
///
/// ```
/// use graphcast_types::Scalar;
///
/// let name = Scalar::from("Alice");
/// assert_eq!(name.to_string(), "Alice");
/// assert_eq!(Scalar::from(42).to_json(), serde_json::json!(42));
/// assert!(Scalar::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	/// Absence of a value
	Null,
	/// Boolean value
	Bool(bool),
	/// Integer value
	Int(i64),
	/// Floating point value
	Float(f64),
	/// Exact decimal value
	Decimal(Decimal),
	/// Text value
	String(String),
	/// Date and time without zone information
	DateTime(NaiveDateTime),
	/// Calendar date
	Date(NaiveDate),
	/// Wall-clock time
	Time(NaiveTime),
}

impl Scalar {
	/// Returns `true` for [`Scalar::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Scalar::Null)
	}

	/// Returns the text payload of a [`Scalar::String`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Scalar::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the payload of a [`Scalar::Int`].
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Scalar::Int(n) => Some(*n),
			_ => None,
		}
	}

	/// JSON form of the scalar.
	///
	/// Decimals and temporal values become strings (ISO-8601 with millisecond
	/// precision for times), non-finite floats become `null`.
	///
	/// # Examples
	///
	/// ```
	/// use chrono::NaiveDate;
	/// use graphcast_types::Scalar;
	///
	/// let date = Scalar::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
	/// assert_eq!(date.to_json(), serde_json::json!("2024-03-01"));
	/// assert_eq!(Scalar::Float(f64::NAN).to_json(), serde_json::Value::Null);
	/// ```
	pub fn to_json(&self) -> JsonValue {
		match self {
			Scalar::Null => JsonValue::Null,
			Scalar::Bool(b) => JsonValue::Bool(*b),
			Scalar::Int(n) => JsonValue::Number((*n).into()),
			Scalar::Float(f) => JsonNumber::from_f64(*f)
				.map(JsonValue::Number)
				.unwrap_or(JsonValue::Null),
			Scalar::Decimal(_)
			| Scalar::String(_)
			| Scalar::DateTime(_)
			| Scalar::Date(_)
			| Scalar::Time(_) => JsonValue::String(self.to_string()),
		}
	}

	/// Build a scalar from a JSON leaf.
	///
	/// Returns `None` for arrays and objects.
	pub fn from_json(value: &JsonValue) -> Option<Self> {
		match value {
			JsonValue::Null => Some(Scalar::Null),
			JsonValue::Bool(b) => Some(Scalar::Bool(*b)),
			JsonValue::Number(n) => {
				if let Some(i) = n.as_i64() {
					Some(Scalar::Int(i))
				} else {
					n.as_f64().map(Scalar::Float)
				}
			}
			JsonValue::String(s) => Some(Scalar::String(s.clone())),
			JsonValue::Array(_) | JsonValue::Object(_) => None,
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Null => Ok(()),
			Scalar::Bool(b) => write!(f, "{}", b),
			Scalar::Int(n) => write!(f, "{}", n),
			Scalar::Float(n) => write!(f, "{}", n),
			Scalar::Decimal(d) => write!(f, "{}", d),
			Scalar::String(s) => f.write_str(s),
			Scalar::DateTime(dt) => {
				if dt.nanosecond() == 0 {
					write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))
				} else {
					write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f"))
				}
			}
			Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
			Scalar::Time(t) => {
				if t.nanosecond() == 0 {
					write!(f, "{}", t.format("%H:%M:%S"))
				} else {
					write!(f, "{}", t.format("%H:%M:%S%.3f"))
				}
			}
		}
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Scalar::Bool(value)
	}
}

impl From<i32> for Scalar {
	fn from(value: i32) -> Self {
		Scalar::Int(value.into())
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Scalar::Int(value)
	}
}

impl From<u32> for Scalar {
	fn from(value: u32) -> Self {
		Scalar::Int(value.into())
	}
}

impl From<f64> for Scalar {
	fn from(value: f64) -> Self {
		Scalar::Float(value)
	}
}

impl From<Decimal> for Scalar {
	fn from(value: Decimal) -> Self {
		Scalar::Decimal(value)
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Scalar::String(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Scalar::String(value)
	}
}

impl From<NaiveDateTime> for Scalar {
	fn from(value: NaiveDateTime) -> Self {
		Scalar::DateTime(value)
	}
}

impl From<NaiveDate> for Scalar {
	fn from(value: NaiveDate) -> Self {
		Scalar::Date(value)
	}
}

impl From<NaiveTime> for Scalar {
	fn from(value: NaiveTime) -> Self {
		Scalar::Time(value)
	}
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Scalar::Null)
	}
}
