//! Model introspection
//!
//! Describes application types backed by a model: their primary key, their
//! single-valued attributes and relations, and their many-to-many relations.
//! Relations name their target model, which is resolved through a
//! process-wide registry.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
	/// Single-valued relation (foreign key, one-to-one)
	ToOne,
	/// Multi-valued relation
	ToMany,
}

/// Relation from a model field to another model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
	/// Cardinality
	pub kind: RelationKind,
	/// Registered name of the target model
	pub to: String,
}

/// Descriptor of one model attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelField {
	/// Attribute name
	pub name: String,
	/// Target model, for relation fields
	pub relation: Option<Relation>,
	/// Whether the field takes part in default serialization
	pub serialize: bool,
	/// Whether this is the model's primary key
	pub primary_key: bool,
}

impl ModelField {
	/// Plain serializable attribute
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			relation: None,
			serialize: true,
			primary_key: false,
		}
	}

	/// Single-valued relation to `to`
	pub fn foreign_key(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			relation: Some(Relation {
				kind: RelationKind::ToOne,
				to: to.into(),
			}),
			..Self::new(name)
		}
	}

	/// Multi-valued relation to `to`
	pub fn many_to_many(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			relation: Some(Relation {
				kind: RelationKind::ToMany,
				to: to.into(),
			}),
			..Self::new(name)
		}
	}

	/// Mark the field as the primary key
	pub fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self
	}

	/// Exclude the field from default serialization
	pub fn not_serialized(mut self) -> Self {
		self.serialize = false;
		self
	}

	/// Whether the field points at another model
	pub fn is_relation(&self) -> bool {
		self.relation.is_some()
	}
}

/// Metadata of an application model.
pub trait ModelMeta: Send + Sync + fmt::Debug {
	/// Registered model name (e.g. `"blog.Post"`)
	fn name(&self) -> &str;

	/// Primary key descriptor, possibly a relation to a parent model
	fn pk(&self) -> &ModelField;

	/// Single-valued fields in declaration order
	fn fields(&self) -> &[ModelField];

	/// Many-to-many relations in declaration order
	fn many_to_many(&self) -> &[ModelField];

	/// Descriptor by attribute name, `None` when the model has no such field
	fn get_field(&self, name: &str) -> Option<&ModelField> {
		std::iter::once(self.pk())
			.chain(self.fields())
			.chain(self.many_to_many())
			.find(|field| field.name == name)
	}
}

/// Follow the primary key through parent relations to the field that holds
/// the actual key value.
///
/// Stops with a warning when a relation names an unregistered model or when
/// the chain loops.
///
/// # Examples
///
/// ```
/// use graphcast_core::{ModelDescriptor, ModelField, resolve_pk};
///
/// ModelDescriptor::new("resolve_doc.Place").register();
/// let restaurant = ModelDescriptor::new("resolve_doc.Restaurant")
///     .with_pk(ModelField::foreign_key("place_ptr", "resolve_doc.Place").primary_key())
///     .into_arc();
///
/// assert_eq!(resolve_pk(restaurant.as_ref()).name, "id");
/// ```
pub fn resolve_pk(model: &dyn ModelMeta) -> ModelField {
	let mut pk = model.pk().clone();
	let mut seen = HashSet::new();
	seen.insert(model.name().to_string());

	while let Some(relation) = pk.relation.clone() {
		if !seen.insert(relation.to.clone()) {
			tracing::warn!(
				model = model.name(),
				target = %relation.to,
				"primary key relation chain loops; using the last key found"
			);
			break;
		}
		match get_model(&relation.to) {
			Some(target) => pk = target.pk().clone(),
			None => {
				tracing::warn!(
					model = model.name(),
					target = %relation.to,
					"primary key relates to an unregistered model"
				);
				break;
			}
		}
	}
	pk
}

/// Global registry of model descriptions.
static MODEL_REGISTRY: Lazy<RwLock<HashMap<String, Arc<dyn ModelMeta>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a model under its own name, replacing any previous registration.
pub fn register_model(model: Arc<dyn ModelMeta>) {
	let name = model.name().to_string();
	MODEL_REGISTRY.write().insert(name, model);
}

/// Look up a registered model.
pub fn get_model(name: &str) -> Option<Arc<dyn ModelMeta>> {
	MODEL_REGISTRY.read().get(name).cloned()
}

/// Builder-style [`ModelMeta`] implementation.
///
/// The primary key defaults to an `id` field excluded from default
/// serialization fields; it is still emitted first by model serializers.
///
/// # Examples
///
/// ```
/// use graphcast_core::{ModelDescriptor, ModelMeta};
///
/// let post = ModelDescriptor::new("descriptor_doc.Post")
///     .field("title")
///     .foreign_key("author", "descriptor_doc.User")
///     .many_to_many("tags", "descriptor_doc.Tag")
///     .into_arc();
///
/// assert_eq!(post.pk().name, "id");
/// assert!(post.get_field("author").unwrap().is_relation());
/// assert!(post.get_field("missing").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
	name: String,
	pk: ModelField,
	fields: Vec<ModelField>,
	many_to_many: Vec<ModelField>,
}

impl ModelDescriptor {
	/// Create a model with an `id` primary key
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			pk: ModelField::new("id").primary_key().not_serialized(),
			fields: Vec::new(),
			many_to_many: Vec::new(),
		}
	}

	/// Use a plain attribute as primary key
	pub fn pk(self, name: impl Into<String>) -> Self {
		self.with_pk(ModelField::new(name).primary_key().not_serialized())
	}

	/// Use a custom descriptor as primary key
	pub fn with_pk(mut self, pk: ModelField) -> Self {
		self.pk = pk;
		self
	}

	/// Add a plain attribute
	pub fn field(self, name: impl Into<String>) -> Self {
		self.with_field(ModelField::new(name))
	}

	/// Add a single-valued relation
	pub fn foreign_key(self, name: impl Into<String>, to: impl Into<String>) -> Self {
		self.with_field(ModelField::foreign_key(name, to))
	}

	/// Add a custom single-valued descriptor
	pub fn with_field(mut self, field: ModelField) -> Self {
		self.fields.push(field);
		self
	}

	/// Add a many-to-many relation
	pub fn many_to_many(mut self, name: impl Into<String>, to: impl Into<String>) -> Self {
		self.many_to_many.push(ModelField::many_to_many(name, to));
		self
	}

	/// Exclude an already added field from default serialization
	pub fn not_serialized(mut self, name: &str) -> Self {
		for field in self.fields.iter_mut().chain(self.many_to_many.iter_mut()) {
			if field.name == name {
				field.serialize = false;
			}
		}
		self
	}

	/// Finish without registering
	pub fn into_arc(self) -> Arc<dyn ModelMeta> {
		Arc::new(self)
	}

	/// Finish and register in the global model registry
	pub fn register(self) -> Arc<dyn ModelMeta> {
		let model = self.into_arc();
		register_model(model.clone());
		model
	}
}

impl ModelMeta for ModelDescriptor {
	fn name(&self) -> &str {
		&self.name
	}

	fn pk(&self) -> &ModelField {
		&self.pk
	}

	fn fields(&self) -> &[ModelField] {
		&self.fields
	}

	fn many_to_many(&self) -> &[ModelField] {
		&self.many_to_many
	}
}
