//! Integration test utilities for graphcast
//!
//! Shared fixtures: a small blog schema registered in the model registry, and
//! builders for object graphs with and without cycles.

use std::rc::Rc;
use std::sync::Arc;

use graphcast::{DynamicObject, ModelDescriptor, ModelMeta, Source, get_model};

pub const USER: &str = "blog.User";
pub const TAG: &str = "blog.Tag";
pub const POST: &str = "blog.Post";

/// Registered blog models
pub struct BlogModels {
	pub user: Arc<dyn ModelMeta>,
	pub tag: Arc<dyn ModelMeta>,
	pub post: Arc<dyn ModelMeta>,
}

/// Register the blog schema, once per process
pub fn blog_models() -> BlogModels {
	if let (Some(user), Some(tag), Some(post)) = (get_model(USER), get_model(TAG), get_model(POST)) {
		return BlogModels { user, tag, post };
	}

	BlogModels {
		user: ModelDescriptor::new(USER)
			.field("username")
			.field("password")
			.not_serialized("password")
			.foreign_key("latest_post", POST)
			.register(),
		tag: ModelDescriptor::new(TAG).pk("slug").field("label").register(),
		post: ModelDescriptor::new(POST)
			.field("title")
			.foreign_key("author", USER)
			.many_to_many("tags", TAG)
			.register(),
	}
}

/// Object graph of one post with its author and two tags
pub struct Blog {
	pub models: BlogModels,
	pub author: Rc<DynamicObject>,
	pub post: Rc<DynamicObject>,
}

pub fn tag(models: &BlogModels, slug: &str, label: &str) -> Rc<DynamicObject> {
	DynamicObject::new("Tag")
		.with("slug", slug)
		.with("label", label)
		.with_model(models.tag.clone())
		.with_display(label)
		.shared()
}

/// A post by `alice` tagged `rust` and `serde`.
///
/// With `cyclic`, the author's `latest_post` points back at the post;
/// otherwise it is null.
pub fn blog(cyclic: bool) -> Blog {
	let models = blog_models();
	let author = DynamicObject::new("User")
		.with("id", 7)
		.with("username", "alice")
		.with("password", "hunter2")
		.with_model(models.user.clone())
		.with_display("alice")
		.shared();
	let post = DynamicObject::new("Post")
		.with("id", 1)
		.with("title", "Hello")
		.with("author", author.clone())
		.with(
			"tags",
			vec![
				Source::from(tag(&models, "rust", "Rust")),
				Source::from(tag(&models, "serde", "Serde")),
			],
		)
		.with_model(models.post.clone())
		.with_display("Hello")
		.shared();
	if cyclic {
		author.set("latest_post", post.clone());
	} else {
		author.set("latest_post", Source::null());
	}

	Blog {
		models,
		author,
		post,
	}
}

/// Nodes `names[0] -> names[1] -> ...` linked through `next`; the last node
/// links back to the first when `closed`
pub fn chain(names: &[&str], closed: bool) -> Vec<Rc<DynamicObject>> {
	let nodes: Vec<_> = names
		.iter()
		.map(|name| {
			DynamicObject::new("Node")
				.with("name", *name)
				.with_display(*name)
				.shared()
		})
		.collect();

	for pair in nodes.windows(2) {
		pair[0].set("next", pair[1].clone());
	}
	if let Some(last) = nodes.last() {
		let next = if closed {
			Source::from(nodes[0].clone())
		} else {
			Source::null()
		};
		last.set("next", next);
	}
	nodes
}
