//! Integration tests for reconstruction
//!
//! These tests verify that serializing and then deserializing acyclic scalar
//! graphs restores the original attributes, and how model reconstruction
//! separates many-to-many values.

use graphcast::prelude::*;
use graphcast::{Attributes, Payload};
use graphcast_integration_tests::blog;
use rstest::rstest;
use serde_json::json;

fn reverted_attributes(serializer: &Serializer, obj: impl Into<Source>, format: &str) -> Attributes {
	let data = serializer
		.serialize(format, obj, SerializeOptions::new())
		.unwrap();
	let reverted = match data {
		graphcast::Serialized::Native(tree) => serializer.deserialize(format, tree),
		graphcast::Serialized::Rendered(bytes) => serializer.deserialize(format, &bytes),
	};
	reverted.unwrap().into_attributes().unwrap()
}

fn scalar_class() -> std::sync::Arc<SerializerClass> {
	SerializerClass::builder("Reading")
		.field("sensor", ValueField::new())
		.field("value", ValueField::new())
		.field("count", ValueField::new())
		.field("active", ValueField::new())
		.field("note", ValueField::new().with_label("Note"))
		.build()
}

#[rstest]
#[case(STRUCTURED_VALUE)]
#[case("json")]
#[case("yaml")]
fn test_scalar_round_trip(#[case] format: &str) {
	let reading = DynamicObject::new("Reading")
		.with("sensor", "t-1")
		.with("value", 21.5)
		.with("count", 3)
		.with("active", true)
		.with("note", Source::null())
		.shared();

	let attrs = reverted_attributes(&Serializer::new(&scalar_class()), reading.clone(), format);

	assert_eq!(
		attrs.keys().collect::<Vec<_>>(),
		vec!["sensor", "value", "count", "active", "note"]
	);
	for (name, value) in &attrs {
		let Some(Source::Scalar(original)) = reading.attribute(name) else {
			panic!("{name} is not a scalar attribute");
		};
		assert_eq!(value.as_scalar(), Some(&original), "attribute {name}");
	}
}

#[rstest]
fn test_nested_declared_round_trip() {
	let point = SerializerClass::builder("Point")
		.field("x", ValueField::new())
		.field("y", ValueField::new())
		.build();
	let segment = SerializerClass::builder("Segment")
		.field("start", Serializer::new(&point))
		.field("end", Serializer::new(&point))
		.build();
	let serializer = Serializer::new(&segment);

	let data = Primitive::from_json(json!({
		"start": {"x": 0, "y": 0},
		"end": {"x": 3, "y": 4}
	}));
	let reverted = serializer.deserialize(STRUCTURED_VALUE, data).unwrap();

	assert_eq!(
		reverted.into_json().unwrap(),
		json!({"start": {"x": 0, "y": 0}, "end": {"x": 3, "y": 4}})
	);
}

#[rstest]
fn test_sequence_reconstruction_is_lazy() {
	let class = SerializerClass::builder("Point")
		.field("x", ValueField::new())
		.build();
	let serializer = Serializer::new(&class);

	let data = Primitive::from_json(json!([{"x": 1}, {"x": 2}]));
	let mut items = serializer
		.deserialize(STRUCTURED_VALUE, data)
		.unwrap()
		.into_sequence()
		.unwrap();

	let first = items.next().unwrap().unwrap().into_attributes().unwrap();
	assert_eq!(first["x"].as_scalar(), Some(&Scalar::Int(1)));
	assert!(items.next().is_some());
	assert!(items.next().is_none());
}

#[rstest]
fn test_model_reconstruction_splits_many_to_many() {
	let blog = blog(false);
	let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_model(blog.models.post.clone()));

	let rendered = serializer
		.serialize("json", blog.post, SerializeOptions::new())
		.unwrap();
	assert_eq!(
		rendered.as_str(),
		Some(r#"{"id":1,"title":"Hello","author":7,"tags":["rust","serde"]}"#)
	);

	let bytes = rendered.into_bytes().unwrap();
	let obj = serializer
		.deserialize("json", &bytes)
		.unwrap()
		.into_object()
		.unwrap();

	assert_eq!(obj.model.name(), "blog.Post");
	assert_eq!(
		obj.attributes.keys().collect::<Vec<_>>(),
		vec!["id", "title", "author"]
	);
	assert_eq!(obj.many_to_many.keys().collect::<Vec<_>>(), vec!["tags"]);
}

#[rstest]
fn test_reconstruction_from_reader() {
	let serializer = Serializer::new(&scalar_class());
	let mut input = r#"{"sensor": "t-2", "Note": "calibrated"}"#.as_bytes();

	let attrs = serializer
		.deserialize("json", Payload::reader(&mut input))
		.unwrap()
		.into_attributes()
		.unwrap();

	assert_eq!(attrs["sensor"].as_scalar(), Some(&Scalar::from("t-2")));
	assert_eq!(attrs["note"].as_scalar(), Some(&Scalar::from("calibrated")));
	assert!(attrs["count"].as_scalar().unwrap().is_null());
}

#[rstest]
fn test_object_serializer_cannot_reconstruct() {
	let err = Serializer::new(&OBJECT_SERIALIZER)
		.deserialize("json", r#"{"name": "x"}"#)
		.unwrap_err();

	assert!(matches!(
		err,
		SerializerError::Configuration(ConfigurationError::DeserializationUnsupported { .. })
	));
}
