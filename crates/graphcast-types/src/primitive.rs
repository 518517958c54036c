//! Primitive value tree
//!
//! The format-independent output of serialization and the input of
//! deserialization: scalars, ordered mappings and single-pass sequences.

use crate::error::ConversionResult;
use crate::scalar::Scalar;
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

/// Kind of field that produced a mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Plain attribute field
	Value,
	/// Relation rendered by the related object's primary key
	Related,
	/// Nested serializer
	Nested,
}

/// Metadata recorded next to a mapping entry.
///
/// Renderers that need to know where an entry came from (for example to
/// emit relation markup) read it through [`PrimitiveMap::metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
	/// Name of the field in the serializer's field set
	pub field_name: String,
	/// What produced the value
	pub kind: FieldKind,
	/// Name of the bound model field, if any
	pub model_field: Option<String>,
}

impl FieldMeta {
	/// Create metadata for a field
	pub fn new(field_name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			field_name: field_name.into(),
			kind,
			model_field: None,
		}
	}

	/// Record the bound model field
	pub fn with_model_field(mut self, model_field: impl Into<String>) -> Self {
		self.model_field = Some(model_field.into());
		self
	}
}

/// Entry of a [`PrimitiveMap`]
#[derive(Debug)]
pub struct Entry {
	/// Converted value
	pub value: Primitive,
	/// Field that produced the value, when known
	pub meta: Option<FieldMeta>,
}

/// Ordered string-keyed mapping of primitive values.
///
/// Insertion order is output order. Re-inserting an existing key replaces the
/// value in place.
///
/// # Examples
///
/// ```
/// use graphcast_types::{FieldKind, FieldMeta, Primitive, PrimitiveMap, Scalar};
///
/// let mut map = PrimitiveMap::new();
/// map.insert("id", Scalar::from(1));
/// map.set_with_metadata("name", Scalar::from("a"), FieldMeta::new("name", FieldKind::Value));
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["id", "name"]);
/// assert!(map.metadata("id").is_none());
/// assert_eq!(map.metadata("name").unwrap().field_name, "name");
/// ```
#[derive(Debug, Default)]
pub struct PrimitiveMap {
	entries: IndexMap<String, Entry>,
}

impl PrimitiveMap {
	/// Create an empty mapping
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value without metadata
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Primitive>) {
		self.entries.insert(
			key.into(),
			Entry {
				value: value.into(),
				meta: None,
			},
		);
	}

	/// Insert a value together with the metadata of the field that produced it
	pub fn set_with_metadata(
		&mut self,
		key: impl Into<String>,
		value: impl Into<Primitive>,
		meta: FieldMeta,
	) {
		self.entries.insert(
			key.into(),
			Entry {
				value: value.into(),
				meta: Some(meta),
			},
		);
	}

	/// Get a value by key
	pub fn get(&self, key: &str) -> Option<&Primitive> {
		self.entries.get(key).map(|entry| &entry.value)
	}

	/// Get the metadata recorded for a key
	pub fn metadata(&self, key: &str) -> Option<&FieldMeta> {
		self.entries.get(key).and_then(|entry| entry.meta.as_ref())
	}

	/// Remove a value, keeping the order of the remaining entries
	pub fn take(&mut self, key: &str) -> Option<Primitive> {
		self.entries.shift_remove(key).map(|entry| entry.value)
	}

	/// Check whether a key is present
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Keys in output order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Key/value pairs in output order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Primitive)> {
		self.entries
			.iter()
			.map(|(key, entry)| (key.as_str(), &entry.value))
	}

	/// Number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the mapping has no entries
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Drain the mapping into JSON, preserving order
	pub fn into_json(self) -> ConversionResult<JsonMap<String, JsonValue>> {
		let mut map = JsonMap::new();
		for (key, entry) in self.entries {
			map.insert(key, entry.value.into_json()?);
		}
		Ok(map)
	}
}

impl IntoIterator for PrimitiveMap {
	type Item = (String, Entry);
	type IntoIter = indexmap::map::IntoIter<String, Entry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

/// Lazily produced, finite, single-pass sequence of primitive values.
///
/// Elements are converted on demand while the sequence is drained. A
/// sequence cannot be restarted or cloned: once an element has been pulled
/// it is gone. Conversion faults discovered while producing an element are
/// yielded in place of that element.
///
/// # Examples
///
/// ```
/// use graphcast_types::{Primitive, Scalar, Sequence};
///
/// let mut seq = Sequence::from_values(vec![Primitive::from(Scalar::from("x"))]);
/// assert!(seq.next().is_some());
/// assert!(seq.next().is_none());
/// ```
pub struct Sequence {
	items: Box<dyn Iterator<Item = ConversionResult<Primitive>>>,
}

impl Sequence {
	/// Wrap a lazy iterator
	pub fn new<I>(items: I) -> Self
	where
		I: Iterator<Item = ConversionResult<Primitive>> + 'static,
	{
		Self {
			items: Box::new(items),
		}
	}

	/// Sequence over already converted values
	pub fn from_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = Primitive>,
		I::IntoIter: 'static,
	{
		Self::new(values.into_iter().map(Ok))
	}

	/// Drain every element, stopping at the first fault
	pub fn collect_values(self) -> ConversionResult<Vec<Primitive>> {
		self.collect()
	}
}

impl Iterator for Sequence {
	type Item = ConversionResult<Primitive>;

	fn next(&mut self) -> Option<Self::Item> {
		self.items.next()
	}
}

impl fmt::Debug for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Sequence(..)")
	}
}

/// Node of the primitive tree.
#[derive(Debug)]
pub enum Primitive {
	/// Protected scalar
	Scalar(Scalar),
	/// Ordered mapping
	Mapping(PrimitiveMap),
	/// Single-pass sequence
	Sequence(Sequence),
}

impl Primitive {
	/// The null scalar
	pub fn null() -> Self {
		Primitive::Scalar(Scalar::Null)
	}

	/// Whether this is the null scalar
	pub fn is_null(&self) -> bool {
		matches!(self, Primitive::Scalar(Scalar::Null))
	}

	/// Borrow the scalar payload
	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			Primitive::Scalar(s) => Some(s),
			_ => None,
		}
	}

	/// Borrow the mapping payload
	pub fn as_mapping(&self) -> Option<&PrimitiveMap> {
		match self {
			Primitive::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Take the mapping payload
	pub fn into_mapping(self) -> Option<PrimitiveMap> {
		match self {
			Primitive::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Drain the tree into a JSON value.
	///
	/// This consumes every lazy sequence in the tree. Leaves convert through
	/// [`Scalar::to_json`], so NaN and infinite floats become `null` and do
	/// not survive a JSON round trip.
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_types::{Primitive, PrimitiveMap, Scalar, Sequence};
	///
	/// let mut map = PrimitiveMap::new();
	/// map.insert("id", Scalar::from(1));
	/// map.insert(
	///     "tags",
	///     Sequence::from_values(vec![Scalar::from("x").into(), Scalar::from("y").into()]),
	/// );
	///
	/// let json = Primitive::Mapping(map).into_json().unwrap();
	/// assert_eq!(json, serde_json::json!({"id": 1, "tags": ["x", "y"]}));
	/// ```
	pub fn into_json(self) -> ConversionResult<JsonValue> {
		match self {
			Primitive::Scalar(s) => Ok(s.to_json()),
			Primitive::Mapping(map) => Ok(JsonValue::Object(map.into_json()?)),
			Primitive::Sequence(seq) => {
				let mut items = Vec::new();
				for item in seq {
					items.push(item?.into_json()?);
				}
				Ok(JsonValue::Array(items))
			}
		}
	}

	/// Build a tree from a decoded JSON document.
	///
	/// Strings stay strings: no attempt is made to recover dates or decimals.
	pub fn from_json(value: JsonValue) -> Self {
		match value {
			JsonValue::Array(items) => Primitive::Sequence(Sequence::from_values(
				items.into_iter().map(Primitive::from_json).collect::<Vec<_>>(),
			)),
			JsonValue::Object(map) => {
				let mut out = PrimitiveMap::new();
				for (key, value) in map {
					out.insert(key, Primitive::from_json(value));
				}
				Primitive::Mapping(out)
			}
			leaf => Primitive::Scalar(Scalar::from_json(&leaf).unwrap_or(Scalar::Null)),
		}
	}
}

impl From<Scalar> for Primitive {
	fn from(value: Scalar) -> Self {
		Primitive::Scalar(value)
	}
}

impl From<PrimitiveMap> for Primitive {
	fn from(value: PrimitiveMap) -> Self {
		Primitive::Mapping(value)
	}
}

impl From<Sequence> for Primitive {
	fn from(value: Sequence) -> Self {
		Primitive::Sequence(value)
	}
}
