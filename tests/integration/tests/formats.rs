//! Integration tests for wire formats
//!
//! These tests verify that serializers dispatch to the registered renderers
//! and parsers, and that faults surfacing while a renderer drains a lazy
//! sequence are reported as configuration errors.

use graphcast::prelude::*;
use graphcast::{RenderOptions, Renderer, RendererRegistry};
use graphcast_integration_tests::blog;
use rstest::rstest;
use std::io::Write;
use std::sync::Arc;

fn flat_post(format: &str) -> String {
	let blog = blog(false);
	let rendered = Serializer::new(&MODEL_SERIALIZER)
		.serialize(format, blog.post, SerializeOptions::new())
		.unwrap();
	rendered.as_str().unwrap().to_string()
}

// ============================================================================
// Renderers
// ============================================================================

#[rstest]
fn test_json_renderer() {
	assert_eq!(
		flat_post("json"),
		r#"{"id":1,"title":"Hello","author":7,"tags":["rust","serde"]}"#
	);
}

#[rstest]
fn test_json_renderer_indent() {
	let blog = blog(false);
	let rendered = Serializer::new(&MODEL_SERIALIZER)
		.serialize(
			"json",
			blog.post,
			SerializeOptions::new().with_fields(["id", "title"]).with_indent(2),
		)
		.unwrap();

	assert_eq!(
		rendered.as_str().unwrap(),
		"{\n  \"id\": 1,\n  \"title\": \"Hello\"\n}"
	);
}

#[rstest]
fn test_yaml_renderer() {
	let yaml = flat_post("yaml");
	assert!(yaml.starts_with("id: 1\ntitle: Hello\nauthor: 7\n"));
	assert!(yaml.contains("- rust"));
	assert!(yaml.contains("- serde"));
}

#[rstest]
fn test_xml_renderer() {
	let xml = flat_post("xml");
	assert!(xml.contains("<root><id>1</id><title>Hello</title><author>7</author>"));
	assert!(xml.contains("<tags><list-item>rust</list-item><list-item>serde</list-item></tags>"));
}

#[rstest]
fn test_csv_renderer() {
	let csv = flat_post("csv");
	let mut lines = csv.lines();
	assert_eq!(lines.next(), Some("id,title,author,tags"));
	assert!(lines.next().unwrap().starts_with("1,Hello,7,"));
}

#[rstest]
fn test_csv_renderer_aligns_rows_with_differing_fields() {
	let rows = vec![
		Source::from(DynamicObject::new("Row").with("id", 1).with("name", "a").shared()),
		Source::from(DynamicObject::new("Row").with("name", "b").shared()),
	];
	let rendered = Serializer::new(&OBJECT_SERIALIZER)
		.serialize("csv", rows, SerializeOptions::new())
		.unwrap();
	assert_eq!(rendered.as_str(), Some("id,name\n1,a\n,b\n"));
}

#[rstest]
fn test_csv_renderer_rejects_column_outside_header() {
	let rows = vec![
		Source::from(DynamicObject::new("Row").with("id", 1).shared()),
		Source::from(DynamicObject::new("Row").with("id", 2).with("zzz", "extra").shared()),
	];
	let err = Serializer::new(&OBJECT_SERIALIZER)
		.serialize("csv", rows, SerializeOptions::new())
		.unwrap_err();
	assert!(matches!(err, SerializerError::Render(_)));
}

#[rstest]
fn test_xml_renderer_free_text_label() {
	let class = SerializerClass::builder("Person")
		.field("name", ValueField::new().with_label("Full Name"))
		.build();
	let person = DynamicObject::new("Person").with("name", "a").shared();

	let rendered = Serializer::new(&class)
		.serialize("xml", person, SerializeOptions::new())
		.unwrap();
	assert!(
		rendered
			.as_str()
			.unwrap()
			.ends_with(r#"<root><field name="Full Name">a</field></root>"#)
	);
}

#[rstest]
fn test_html_renderer() {
	let html = flat_post("html");
	assert!(html.starts_with("<dl><dt>id</dt><dd>1</dd><dt>title</dt><dd>Hello</dd>"));
	assert!(html.contains("<dt>tags</dt><dd><ul><li>rust</li><li>serde</li></ul></dd>"));
}

#[rstest]
fn test_serialize_to_writer() {
	let blog = blog(false);
	let mut out = Vec::new();
	Serializer::new(&MODEL_SERIALIZER)
		.serialize_to(
			"json",
			blog.post,
			&mut out,
			SerializeOptions::new().with_fields(["title"]),
		)
		.unwrap();
	assert_eq!(out, br#"{"title":"Hello"}"#);
}

#[rstest]
fn test_unknown_format() {
	let blog = blog(false);
	let err = Serializer::new(&MODEL_SERIALIZER)
		.serialize("toml", blog.post, SerializeOptions::new())
		.unwrap_err();
	assert_eq!(err.to_string(), "Unknown format: toml");
}

#[rstest]
fn test_fault_while_rendering_lazy_sequence() {
	let blog = blog(false);
	let items = vec![Source::from(blog.post.clone()), Source::from(blog.post)];
	let err = Serializer::new(&MODEL_SERIALIZER)
		.serialize("json", items, SerializeOptions::new().with_fields(["slug"]))
		.unwrap_err();

	assert!(matches!(
		err,
		SerializerError::Configuration(ConfigurationError::UnknownField { .. })
	));
}

#[derive(Debug)]
struct KeysRenderer;

impl Renderer for KeysRenderer {
	fn format(&self) -> &str {
		"keys"
	}

	fn media_type(&self) -> &str {
		"text/plain"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		_options: &RenderOptions,
	) -> graphcast::formats::RenderResult<()> {
		if let Some(map) = data.as_mapping() {
			let keys: Vec<_> = map.keys().collect();
			out.write_all(keys.join(" ").as_bytes())?;
		}
		Ok(())
	}
}

#[rstest]
fn test_custom_renderer_registry() {
	let blog = blog(false);
	let registry = RendererRegistry::builtin().with(Arc::new(KeysRenderer));
	let serializer =
		MODEL_SERIALIZER.instantiate(&Meta::new().with_renderers(registry));

	let rendered = serializer
		.serialize("keys", blog.post, SerializeOptions::new())
		.unwrap();
	assert_eq!(rendered.as_str(), Some("id title author tags"));
}

// ============================================================================
// Parsers
// ============================================================================

#[rstest]
#[case("json", r#"{"x": 1, "y": [2, 3]}"#)]
#[case("yaml", "x: 1\ny:\n  - 2\n  - 3\n")]
fn test_parsers(#[case] format: &str, #[case] input: &str) {
	let class = SerializerClass::builder("Point")
		.field("x", ValueField::new())
		.field("y", ValueField::new())
		.build();

	let reverted = Serializer::new(&class).deserialize(format, input).unwrap();
	assert_eq!(
		reverted.into_json().unwrap(),
		serde_json::json!({"x": 1, "y": [2, 3]})
	);
}

#[rstest]
fn test_no_parser_for_format() {
	let class = SerializerClass::builder("Point").build();
	let err = Serializer::new(&class)
		.deserialize("xml", "<root/>")
		.unwrap_err();
	assert!(matches!(err, SerializerError::UnknownFormat(ref format) if format == "xml"));
}
