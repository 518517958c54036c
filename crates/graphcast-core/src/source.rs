//! Source object graph
//!
//! The input side of serialization. Every value is classified once into a
//! [`Source`] variant so the graph walker can dispatch on a closed set of
//! shapes: protected scalars, zero-argument accessors, mappings, sequences and
//! composite objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use graphcast_types::Scalar;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::model::{ModelMeta, resolve_pk};

/// Shared handle to a composite object.
pub type ObjectRef = Rc<dyn Object>;

/// Composite object reachable from a [`Source`].
///
/// Implement this for application types, or build instances at runtime with
/// [`DynamicObject`].
pub trait Object {
	/// Type name used in diagnostics and in the default display string
	fn type_name(&self) -> &str;

	/// Names of the attributes exposed by this instance
	fn attribute_names(&self) -> Vec<String>;

	/// Current value of an attribute, `None` when the instance has no such attribute
	fn attribute(&self, name: &str) -> Option<Source>;

	/// Model description of the instance's type, if it is backed by a model
	fn model(&self) -> Option<Arc<dyn ModelMeta>> {
		None
	}

	/// Flat text form used when the object is rendered by a plain field
	fn display(&self) -> String {
		format!("<{} object>", self.type_name())
	}
}

/// Identity of an object: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
	/// Identity of the object behind `obj`
	pub fn of(obj: &ObjectRef) -> Self {
		Self(Rc::as_ptr(obj) as *const () as usize)
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:x}", self.0)
	}
}

/// Zero-argument callable producing a computed value.
#[derive(Clone)]
pub struct Accessor(Rc<dyn Fn() -> Source>);

impl Accessor {
	/// Wrap a closure
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> Source + 'static,
	{
		Self(Rc::new(f))
	}

	/// Invoke the accessor
	pub fn call(&self) -> Source {
		(self.0)()
	}
}

impl fmt::Debug for Accessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Accessor(..)")
	}
}

/// A value of the source object graph.
///
/// # Examples
///
/// ```
/// use graphcast_core::{Accessor, Source};
///
/// let computed = Source::from(Accessor::new(|| Source::from(41 + 1)));
/// let tags = Source::from(vec![Source::from("x"), Source::from("y")]);
///
/// assert!(matches!(computed, Source::Accessor(_)));
/// assert!(matches!(tags, Source::Sequence(ref items) if items.len() == 2));
/// ```
#[derive(Clone)]
pub enum Source {
	/// Protected value, returned unchanged by the walker
	Scalar(Scalar),
	/// Computed property, invoked and then converted
	Accessor(Accessor),
	/// Ordered mapping, converted per value
	Mapping(IndexMap<String, Source>),
	/// Finite sequence, converted lazily per element
	Sequence(Vec<Source>),
	/// Composite object, converted through a field set
	Object(ObjectRef),
}

impl Source {
	/// The null scalar
	pub fn null() -> Self {
		Source::Scalar(Scalar::Null)
	}

	/// Wrap any [`Object`] implementation
	pub fn object<T: Object + 'static>(obj: Rc<T>) -> Self {
		Source::Object(obj)
	}

	/// Borrow the object handle
	pub fn as_object(&self) -> Option<&ObjectRef> {
		match self {
			Source::Object(obj) => Some(obj),
			_ => None,
		}
	}

	/// Look up an attribute of an object, or a key of a mapping.
	///
	/// The name `pk` falls back to the object's resolved primary key when the
	/// object has no attribute of that name. Anything else yields `None`.
	pub fn get(&self, name: &str) -> Option<Source> {
		match self {
			Source::Object(obj) => get_attribute(obj.as_ref(), name),
			Source::Mapping(map) => map.get(name).cloned(),
			_ => None,
		}
	}
}

impl fmt::Debug for Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Source::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
			Source::Accessor(a) => a.fmt(f),
			Source::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
			Source::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
			Source::Object(obj) => write!(f, "Object({} @ {})", obj.type_name(), ObjectId::of(obj)),
		}
	}
}

/// Attribute lookup with the `pk` alias.
pub fn get_attribute(obj: &dyn Object, name: &str) -> Option<Source> {
	if let Some(value) = obj.attribute(name) {
		return Some(value);
	}
	if name == "pk" {
		let model = obj.model()?;
		let pk = resolve_pk(model.as_ref());
		return obj.attribute(&pk.name);
	}
	None
}

macro_rules! impl_from_scalar {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Source {
				fn from(value: $ty) -> Self {
					Source::Scalar(Scalar::from(value))
				}
			}
		)*
	};
}

impl_from_scalar!(
	bool,
	i32,
	i64,
	u32,
	f64,
	Decimal,
	&str,
	String,
	NaiveDateTime,
	NaiveDate,
	NaiveTime,
);

impl From<Scalar> for Source {
	fn from(value: Scalar) -> Self {
		Source::Scalar(value)
	}
}

impl From<Accessor> for Source {
	fn from(value: Accessor) -> Self {
		Source::Accessor(value)
	}
}

impl From<Vec<Source>> for Source {
	fn from(value: Vec<Source>) -> Self {
		Source::Sequence(value)
	}
}

impl From<IndexMap<String, Source>> for Source {
	fn from(value: IndexMap<String, Source>) -> Self {
		Source::Mapping(value)
	}
}

impl From<ObjectRef> for Source {
	fn from(value: ObjectRef) -> Self {
		Source::Object(value)
	}
}

impl From<Rc<DynamicObject>> for Source {
	fn from(value: Rc<DynamicObject>) -> Self {
		Source::Object(value)
	}
}

/// Attribute bag implementing [`Object`].
///
/// Attributes keep insertion order and can be set after the object is shared,
/// which is how cyclic graphs are assembled.
///
/// # Examples
///
/// ```
/// use graphcast_core::{DynamicObject, Object, Source};
///
/// let x = DynamicObject::new("Node").with("name", "x").shared();
/// let y = DynamicObject::new("Node").with("name", "y").with("peer", x.clone()).shared();
/// x.set("peer", y.clone());
///
/// assert_eq!(x.attribute_names(), vec!["name", "peer"]);
/// assert!(matches!(x.attribute("peer"), Some(Source::Object(_))));
/// ```
pub struct DynamicObject {
	type_name: String,
	attributes: RefCell<IndexMap<String, Source>>,
	model: Option<Arc<dyn ModelMeta>>,
	display: Option<String>,
}

impl DynamicObject {
	/// Create an object without attributes
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			attributes: RefCell::new(IndexMap::new()),
			model: None,
			display: None,
		}
	}

	/// Add an attribute
	pub fn with(self, name: impl Into<String>, value: impl Into<Source>) -> Self {
		self.attributes.borrow_mut().insert(name.into(), value.into());
		self
	}

	/// Bind the object to a model description
	pub fn with_model(mut self, model: Arc<dyn ModelMeta>) -> Self {
		self.model = Some(model);
		self
	}

	/// Set the flat text form
	pub fn with_display(mut self, display: impl Into<String>) -> Self {
		self.display = Some(display.into());
		self
	}

	/// Set or replace an attribute on a shared object
	pub fn set(&self, name: impl Into<String>, value: impl Into<Source>) {
		self.attributes.borrow_mut().insert(name.into(), value.into());
	}

	/// Move the object behind a shared handle
	pub fn shared(self) -> Rc<Self> {
		Rc::new(self)
	}
}

impl Object for DynamicObject {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn attribute_names(&self) -> Vec<String> {
		self.attributes.borrow().keys().cloned().collect()
	}

	fn attribute(&self, name: &str) -> Option<Source> {
		self.attributes.borrow().get(name).cloned()
	}

	fn model(&self) -> Option<Arc<dyn ModelMeta>> {
		self.model.clone()
	}

	fn display(&self) -> String {
		match &self.display {
			Some(display) => display.clone(),
			None => format!("<{} object>", self.type_name),
		}
	}
}

impl fmt::Debug for DynamicObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynamicObject")
			.field("type_name", &self.type_name)
			.field("attributes", &self.attribute_names())
			.finish()
	}
}
