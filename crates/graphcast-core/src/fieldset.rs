//! Field sets and serializer classes
//!
//! A [`SerializerClass`] is the type-level template of a serializer: its
//! ordered field declarations (merged with those of its bases), its [`Meta`]
//! block and its behaviour. It is built once, usually in a static, and shared
//! read-only by every [`Serializer`] created from it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::behavior::{Declared, SerializerBehavior};
use crate::fields::Field;
use crate::options::Meta;
use crate::serializer::Serializer;

/// Ordered mapping from field name to field.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
	fields: IndexMap<String, Box<dyn Field>>,
}

impl FieldSet {
	/// Create an empty field set
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a field. An existing name keeps its position and takes the new field.
	pub fn insert(&mut self, name: impl Into<String>, field: Box<dyn Field>) {
		self.fields.insert(name.into(), field);
	}

	/// Get a field by name
	pub fn get(&self, name: &str) -> Option<&dyn Field> {
		self.fields.get(name).map(|field| field.as_ref())
	}

	/// Get a field by name, mutable
	pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn Field>> {
		self.fields.get_mut(name)
	}

	/// Remove a field, keeping the order of the others
	pub fn remove(&mut self, name: &str) -> Option<Box<dyn Field>> {
		self.fields.shift_remove(name)
	}

	/// Whether a field of that name exists
	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Field names in order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	/// Fields in order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Field)> {
		self.fields
			.iter()
			.map(|(name, field)| (name.as_str(), field.as_ref()))
	}

	/// Number of fields
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the set is empty
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// First field that is a root serializer
	pub fn root_serializer_mut(&mut self) -> Option<&mut Serializer> {
		self.fields
			.values_mut()
			.filter_map(|field| field.as_serializer_mut())
			.find(|serializer| serializer.options().is_root)
	}
}

impl IntoIterator for FieldSet {
	type Item = (String, Box<dyn Field>);
	type IntoIter = indexmap::map::IntoIter<String, Box<dyn Field>>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.into_iter()
	}
}

/// Type-level serializer template.
pub struct SerializerClass {
	name: String,
	base_fields: FieldSet,
	meta: Meta,
	behavior: Arc<dyn SerializerBehavior>,
}

impl SerializerClass {
	/// Start declaring a class
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_core::{Field, SerializerClass, ValueField};
	///
	/// let base = SerializerClass::builder("Base")
	///     .field("a", ValueField::new())
	///     .field("b", ValueField::new())
	///     .field("c", ValueField::new())
	///     .build();
	/// let derived = SerializerClass::builder("Derived")
	///     .extends(&base)
	///     .field("d", ValueField::new())
	///     .field("b", ValueField::new().with_label("B"))
	///     .build();
	///
	/// let names: Vec<_> = derived.base_fields().names().collect();
	/// assert_eq!(names, vec!["a", "b", "c", "d"]);
	/// assert_eq!(derived.base_fields().get("b").unwrap().label(), Some("B"));
	/// ```
	pub fn builder(name: impl Into<String>) -> SerializerClassBuilder {
		SerializerClassBuilder {
			name: name.into(),
			bases: Vec::new(),
			declared: Vec::new(),
			meta: None,
			behavior: None,
		}
	}

	/// Class name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared fields including inherited ones, in order
	pub fn base_fields(&self) -> &FieldSet {
		&self.base_fields
	}

	/// Configuration block
	pub fn meta(&self) -> &Meta {
		&self.meta
	}

	/// Variant behaviour
	pub fn behavior(&self) -> &dyn SerializerBehavior {
		self.behavior.as_ref()
	}

	/// Create a serializer instance with keyword overrides
	pub fn instantiate(self: &Arc<Self>, kwargs: &Meta) -> Serializer {
		Serializer::with_options(self, kwargs)
	}
}

impl fmt::Debug for SerializerClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializerClass")
			.field("name", &self.name)
			.field("fields", &self.base_fields.names().collect::<Vec<_>>())
			.field("behavior", &self.behavior)
			.finish()
	}
}

/// Builder returned by [`SerializerClass::builder`].
pub struct SerializerClassBuilder {
	name: String,
	bases: Vec<Arc<SerializerClass>>,
	declared: Vec<(String, Box<dyn Field>)>,
	meta: Option<Meta>,
	behavior: Option<Arc<dyn SerializerBehavior>>,
}

impl SerializerClassBuilder {
	/// Inherit from `base`. With several bases, earlier ones contribute their
	/// fields first.
	pub fn extends(mut self, base: &Arc<SerializerClass>) -> Self {
		self.bases.push(Arc::clone(base));
		self
	}

	/// Declare a field
	pub fn field(mut self, name: impl Into<String>, field: impl Field + 'static) -> Self {
		self.declared.push((name.into(), Box::new(field)));
		self
	}

	/// Set the configuration block; inherited from the first base otherwise
	pub fn meta(mut self, meta: Meta) -> Self {
		self.meta = Some(meta);
		self
	}

	/// Set the variant behaviour; inherited from the first base otherwise
	pub fn behavior(mut self, behavior: impl SerializerBehavior + 'static) -> Self {
		self.behavior = Some(Arc::new(behavior));
		self
	}

	/// Merge the declarations into the class template
	pub fn build(self) -> Arc<SerializerClass> {
		let mut declared = self.declared;
		declared.sort_by_key(|(_, field)| field.core().creation_counter());

		let mut base_fields = FieldSet::new();
		for base in &self.bases {
			for (name, field) in base.base_fields.iter() {
				base_fields.insert(name, field.clone_box());
			}
		}
		for (name, field) in declared {
			base_fields.insert(name, field);
		}

		let first_base = self.bases.first();
		let meta = self
			.meta
			.or_else(|| first_base.map(|base| base.meta.clone()))
			.unwrap_or_default();
		let behavior = self
			.behavior
			.or_else(|| first_base.map(|base| Arc::clone(&base.behavior)))
			.unwrap_or_else(|| Arc::new(Declared));

		tracing::trace!(
			class = %self.name,
			fields = base_fields.len(),
			"built serializer class"
		);

		Arc::new(SerializerClass {
			name: self.name,
			base_fields,
			meta,
			behavior,
		})
	}
}
