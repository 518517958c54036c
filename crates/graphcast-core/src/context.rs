//! Call-scoped traversal state
//!
//! A [`Traversal`] is created fresh by every top-level `serialize` or
//! `deserialize` call and threaded through the walk. Child serializers work
//! on a copy taken at the point of descent, so cycle detection is
//! path-sensitive: siblings never see each other's visits.

use std::fmt;
use std::sync::Arc;

use crate::model::ModelMeta;
use crate::source::{ObjectId, ObjectRef, Source};

/// Context for tracking visited objects along the current branch
#[derive(Clone, Default)]
pub struct Traversal {
	/// Identities of the objects being converted, outermost first
	stack: Vec<ObjectId>,
	/// Container object and field name under which the current serializer was entered
	origin: Option<(Source, String)>,
	/// Class resolved by the enclosing serializer during reconstruction
	enclosing_class: Option<Arc<dyn ModelMeta>>,
}

impl Traversal {
	/// Create an empty traversal
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_core::Traversal;
	///
	/// let cx = Traversal::new();
	/// assert_eq!(cx.depth(), 0);
	/// assert!(cx.origin().is_none());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of objects on the current branch
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Whether `obj` is already being converted on this branch
	pub fn is_visiting(&self, obj: &ObjectRef) -> bool {
		self.stack.contains(&ObjectId::of(obj))
	}

	/// Visit an object and execute a function, leaving it again afterwards
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_core::{DynamicObject, ObjectRef, Traversal};
	///
	/// let node: ObjectRef = DynamicObject::new("Node").shared();
	/// let mut cx = Traversal::new();
	///
	/// let inside = cx.visit_with(&node, |cx| cx.is_visiting(&node));
	/// assert!(inside);
	/// assert!(!cx.is_visiting(&node));
	/// ```
	pub fn visit_with<R>(&mut self, obj: &ObjectRef, f: impl FnOnce(&mut Self) -> R) -> R {
		self.stack.push(ObjectId::of(obj));
		let result = f(self);
		self.stack.pop();
		result
	}

	/// Context for a child serializer entered through `field_name` of `container`
	pub fn descend(&self, container: &Source, field_name: &str) -> Self {
		Self {
			stack: self.stack.clone(),
			origin: Some((container.clone(), field_name.to_string())),
			enclosing_class: self.enclosing_class.clone(),
		}
	}

	/// Container and field name the current serializer was entered through
	pub fn origin(&self) -> Option<(&Source, &str)> {
		self.origin
			.as_ref()
			.map(|(container, name)| (container, name.as_str()))
	}

	/// Class resolved by the enclosing serializer
	pub fn enclosing_class(&self) -> Option<&Arc<dyn ModelMeta>> {
		self.enclosing_class.as_ref()
	}

	/// Run `f` with `class` as the enclosing class, restoring the previous one
	pub fn within_class<R>(
		&mut self,
		class: Option<Arc<dyn ModelMeta>>,
		f: impl FnOnce(&mut Self) -> R,
	) -> R {
		let previous = std::mem::replace(&mut self.enclosing_class, class);
		let result = f(self);
		self.enclosing_class = previous;
		result
	}
}

impl fmt::Debug for Traversal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Traversal")
			.field("stack", &self.stack)
			.field("origin", &self.origin.as_ref().map(|(_, name)| name))
			.field(
				"enclosing_class",
				&self.enclosing_class.as_ref().map(|class| class.name()),
			)
			.finish()
	}
}
