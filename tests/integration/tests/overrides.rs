//! Integration tests for field selection and root fields
//!
//! These tests verify allowlist ordering, exclusion, root flattening and the
//! routing of per-call overrides to a root field.

use graphcast::prelude::*;
use graphcast_integration_tests::blog;
use rstest::{fixture, rstest};
use serde_json::json;
use std::rc::Rc;

fn native(serializer: &Serializer, obj: impl Into<Source>, options: SerializeOptions) -> serde_json::Value {
	serializer
		.serialize(STRUCTURED_VALUE, obj, options)
		.unwrap()
		.into_native()
		.unwrap()
		.into_json()
		.unwrap()
}

#[fixture]
fn item() -> Rc<DynamicObject> {
	DynamicObject::new("Item")
		.with("id", 1)
		.with("name", "a")
		.with("tags", vec![Source::from("x"), Source::from("y")])
		.shared()
}

#[fixture]
fn item_serializer() -> Serializer {
	let class = SerializerClass::builder("ItemSerializer")
		.field("id", ValueField::new())
		.field("name", ValueField::new())
		.field("tags", ValueField::new())
		.build();
	Serializer::new(&class)
}

// ============================================================================
// Allowlist and exclusion
// ============================================================================

#[rstest]
fn test_item_scenario(item: Rc<DynamicObject>, item_serializer: Serializer) {
	let full = native(&item_serializer, item.clone(), SerializeOptions::new());
	assert_eq!(full, json!({"id": 1, "name": "a", "tags": ["x", "y"]}));
	assert_eq!(
		full.as_object().unwrap().keys().collect::<Vec<_>>(),
		vec!["id", "name", "tags"]
	);

	let named = native(
		&item_serializer,
		item,
		SerializeOptions::new().with_fields(["name"]),
	);
	assert_eq!(named, json!({"name": "a"}));
}

#[rstest]
#[case(&["tags", "id"], &["tags", "id"])]
#[case(&["name", "name", "id"], &["name", "id"])]
fn test_allowlist_order(
	item: Rc<DynamicObject>,
	item_serializer: Serializer,
	#[case] fields: &[&str],
	#[case] expected: &[&str],
) {
	let out = native(
		&item_serializer,
		item,
		SerializeOptions::new().with_fields(fields.iter().copied()),
	);
	assert_eq!(out.as_object().unwrap().keys().collect::<Vec<_>>(), expected);
}

#[rstest]
fn test_exclusion_after_allowlist(item: Rc<DynamicObject>, item_serializer: Serializer) {
	let out = native(
		&item_serializer,
		item,
		SerializeOptions::new()
			.with_fields(["tags", "name", "id"])
			.with_exclude(["name", "unknown"]),
	);
	assert_eq!(
		out.as_object().unwrap().keys().collect::<Vec<_>>(),
		vec!["tags", "id"]
	);
}

#[rstest]
fn test_model_serializer_exclude_relation() {
	let blog = blog(false);
	let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_exclude(["tags", "author"]));

	let out = native(&serializer, blog.post, SerializeOptions::new());
	assert_eq!(out, json!({"id": 1, "title": "Hello"}));
}

// ============================================================================
// Root fields
// ============================================================================

fn wrapper(detail: &std::sync::Arc<SerializerClass>) -> Serializer {
	let class = SerializerClass::builder("Envelope")
		.field("detail", detail.instantiate(&Meta::new().with_is_root(true)))
		.build();
	Serializer::new(&class)
}

#[rstest]
fn test_root_field_output_is_flattened(item: Rc<DynamicObject>) {
	let detail = SerializerClass::builder("ItemDetail")
		.field("id", ValueField::new())
		.field("name", ValueField::new())
		.build();

	let wrapped = native(&wrapper(&detail), item.clone(), SerializeOptions::new());
	let direct = native(&Serializer::new(&detail), item, SerializeOptions::new());
	assert_eq!(wrapped, direct);
	assert_eq!(wrapped, json!({"id": 1, "name": "a"}));
}

#[rstest]
fn test_overrides_routed_to_root_field(item: Rc<DynamicObject>) {
	let detail = SerializerClass::builder("ItemDetail")
		.field("id", ValueField::new())
		.field("name", ValueField::new())
		.field("tags", ValueField::new())
		.build();
	let serializer = wrapper(&detail);

	let out = native(
		&serializer,
		item.clone(),
		SerializeOptions::new().with_fields(["tags", "id"]),
	);
	assert_eq!(out, json!({"tags": ["x", "y"], "id": 1}));

	let again = native(&serializer, item, SerializeOptions::new());
	assert_eq!(again, json!({"id": 1, "name": "a", "tags": ["x", "y"]}));
}

#[rstest]
fn test_nested_override_routed_to_root_model_field() {
	let blog = blog(false);
	let class = SerializerClass::builder("PostEnvelope")
		.field(
			"post",
			MODEL_SERIALIZER.instantiate(&Meta::new().with_is_root(true)),
		)
		.build();
	let serializer = Serializer::new(&class);

	let flat = native(&serializer, blog.post.clone(), SerializeOptions::new());
	assert_eq!(flat["author"], json!(7));

	let nested = native(
		&serializer,
		blog.post,
		SerializeOptions::new().with_nested(Nested::Depth(1)),
	);
	assert_eq!(
		nested["author"],
		json!({"id": 7, "username": "alice", "latest_post": null})
	);
}
