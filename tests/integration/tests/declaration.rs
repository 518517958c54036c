//! Integration tests for field declaration and option resolution
//!
//! These tests verify declaration order across inheritance and how class
//! configuration, keyword overrides and per-call overrides combine.

use graphcast::prelude::*;
use graphcast::{FieldKind, PrimaryKeyRelatedField};
use rstest::rstest;
use serde_json::json;

fn native(serializer: &Serializer, obj: impl Into<Source>, options: SerializeOptions) -> serde_json::Value {
	serializer
		.serialize(STRUCTURED_VALUE, obj, options)
		.unwrap()
		.into_native()
		.unwrap()
		.into_json()
		.unwrap()
}

// ============================================================================
// Declaration order
// ============================================================================

#[rstest]
fn test_redeclared_field_keeps_base_position() {
	let base = SerializerClass::builder("Base")
		.field("a", ValueField::new())
		.field("b", ValueField::new())
		.field("c", ValueField::new())
		.build();
	let derived = SerializerClass::builder("Derived")
		.extends(&base)
		.field("d", ValueField::new())
		.field("b", ValueField::new().with_label("B"))
		.build();

	let names: Vec<_> = derived.base_fields().names().collect();
	assert_eq!(names, vec!["a", "b", "c", "d"]);

	let obj = DynamicObject::new("Obj")
		.with("a", 1)
		.with("b", 2)
		.with("c", 3)
		.with("d", 4)
		.shared();
	let out = native(&Serializer::new(&derived), obj, SerializeOptions::new());
	assert_eq!(
		out.as_object().unwrap().keys().collect::<Vec<_>>(),
		vec!["a", "B", "c", "d"]
	);
}

#[rstest]
fn test_base_class_untouched_by_subclass() {
	let base = SerializerClass::builder("Base")
		.field("author", ValueField::new())
		.build();
	let _derived = SerializerClass::builder("Derived")
		.extends(&base)
		.field("author", PrimaryKeyRelatedField::new())
		.build();

	assert_eq!(
		base.base_fields().get("author").unwrap().kind(),
		FieldKind::Value
	);
}

#[rstest]
fn test_instances_do_not_share_field_state() {
	let class = SerializerClass::builder("Doc")
		.field("title", ValueField::new())
		.build();
	let first = Serializer::new(&class);
	let second = Serializer::new(&class);
	let doc = DynamicObject::new("Doc").with("title", "Hi").shared();

	assert_eq!(
		native(&first, doc.clone(), SerializeOptions::new()),
		native(&second, doc, SerializeOptions::new())
	);
	assert!(class.base_fields().get("title").unwrap().core().binding().is_none());
}

// ============================================================================
// Option resolution
// ============================================================================

#[rstest]
fn test_keyword_overrides_beat_meta() {
	let class = SerializerClass::builder("Doc")
		.field("id", ValueField::new())
		.field("title", ValueField::new())
		.field("body", ValueField::new())
		.meta(Meta::new().with_exclude(["body"]))
		.build();
	let doc = DynamicObject::new("Doc")
		.with("id", 1)
		.with("title", "Hi")
		.with("body", "...")
		.shared();

	let from_meta = native(&Serializer::new(&class), doc.clone(), SerializeOptions::new());
	assert_eq!(from_meta, json!({"id": 1, "title": "Hi"}));

	let keyword = class.instantiate(&Meta::new().with_exclude(["id"]));
	assert_eq!(
		native(&keyword, doc, SerializeOptions::new()),
		json!({"title": "Hi", "body": "..."})
	);
}

#[rstest]
fn test_meta_loaded_from_settings_document() {
	let meta: Meta = serde_json::from_value(json!({
		"fields": ["title", "id"],
		"nested": 2
	}))
	.unwrap();
	let class = SerializerClass::builder("Doc")
		.field("id", ValueField::new())
		.field("title", ValueField::new())
		.meta(meta)
		.build();

	let serializer = Serializer::new(&class);
	assert_eq!(serializer.options().nested, Nested::Depth(2));

	let doc = DynamicObject::new("Doc").with("id", 1).with("title", "Hi").shared();
	let out = native(&serializer, doc, SerializeOptions::new());
	assert_eq!(
		out.as_object().unwrap().keys().collect::<Vec<_>>(),
		vec!["title", "id"]
	);
}

#[rstest]
fn test_unknown_allowlisted_field_is_configuration_error() {
	let class = SerializerClass::builder("Doc")
		.field("id", ValueField::new())
		.build();
	let doc = DynamicObject::new("Doc").with("id", 1).shared();

	let err = Serializer::new(&class)
		.serialize(
			STRUCTURED_VALUE,
			doc,
			SerializeOptions::new().with_fields(["id", "slug"]),
		)
		.unwrap_err();

	assert_eq!(
		err.to_string(),
		"Field 'slug' is listed in `fields` but is not present on serializer 'Doc'"
	);
}
