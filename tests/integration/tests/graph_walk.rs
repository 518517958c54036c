//! Integration tests for the graph walker
//!
//! These tests verify cycle termination, the nesting budget and
//! path-sensitive visit tracking on object and model graphs.

use graphcast::prelude::*;
use graphcast_integration_tests::{blog, chain};
use rstest::rstest;
use serde_json::json;

fn native(serializer: &Serializer, obj: impl Into<Source>) -> serde_json::Value {
	serializer
		.serialize(STRUCTURED_VALUE, obj, SerializeOptions::new())
		.unwrap()
		.into_native()
		.unwrap()
		.into_json()
		.unwrap()
}

fn objects(nested: Nested) -> Serializer {
	OBJECT_SERIALIZER.instantiate(&Meta::new().with_nested(nested))
}

// ============================================================================
// Cycles
// ============================================================================

#[rstest]
fn test_closed_chain_terminates_with_flat_second_occurrence() {
	let nodes = chain(&["a", "b", "c"], true);

	let out = native(&objects(Nested::Unlimited), nodes[0].clone());
	assert_eq!(
		out,
		json!({
			"name": "a",
			"next": {"name": "b", "next": {"name": "c", "next": "a"}}
		})
	);
}

#[rstest]
fn test_cycle_in_sequence_element() {
	let nodes = chain(&["a"], false);
	let a = nodes[0].clone();
	a.set("children", vec![Source::from(a.clone())]);

	// The revisited element falls back to the flat form of the whole field
	let out = native(&objects(Nested::Unlimited), a);
	assert_eq!(out["children"], json!([["a"]]));
}

#[rstest]
fn test_model_cycle_falls_back_to_primary_key() {
	let blog = blog(true);
	let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_nested(true));

	let out = native(&serializer, blog.post);
	assert_eq!(
		out["author"],
		json!({"id": 7, "username": "alice", "latest_post": 1})
	);
}

#[rstest]
fn test_serializer_is_reusable_after_cycle() {
	let nodes = chain(&["x", "y"], true);
	let serializer = objects(Nested::Unlimited);

	let first = native(&serializer, nodes[0].clone());
	let second = native(&serializer, nodes[0].clone());
	assert_eq!(first, second);
	assert_eq!(
		first,
		json!({"name": "x", "next": {"name": "y", "next": "x"}})
	);
}

// ============================================================================
// Nesting budget
// ============================================================================

#[rstest]
#[case(Nested::Flat, json!({"name": "a", "next": "b"}))]
#[case(Nested::Depth(1), json!({"name": "a", "next": {"name": "b", "next": "c"}}))]
#[case(
	Nested::Depth(2),
	json!({"name": "a", "next": {"name": "b", "next": {"name": "c", "next": "d"}}})
)]
#[case(
	Nested::Unlimited,
	json!({"name": "a", "next": {"name": "b", "next": {"name": "c", "next": {"name": "d", "next": null}}}})
)]
fn test_depth_budget(#[case] nested: Nested, #[case] expected: serde_json::Value) {
	let nodes = chain(&["a", "b", "c", "d"], false);
	assert_eq!(native(&objects(nested), nodes[0].clone()), expected);
}

#[rstest]
fn test_budget_override_per_call() {
	let nodes = chain(&["a", "b", "c"], false);
	let serializer = objects(Nested::Unlimited);

	let out = serializer
		.serialize(
			STRUCTURED_VALUE,
			nodes[0].clone(),
			SerializeOptions::new().with_nested(false),
		)
		.unwrap()
		.into_native()
		.unwrap()
		.into_json()
		.unwrap();
	assert_eq!(out, json!({"name": "a", "next": "b"}));
	assert_eq!(serializer.options().nested, Nested::Unlimited);
}

#[rstest]
fn test_model_relations_beyond_budget_are_primary_keys() {
	let blog = blog(false);
	let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_nested(Nested::Depth(1)));

	let out = native(&serializer, blog.author);
	assert_eq!(
		out,
		json!({"id": 7, "username": "alice", "latest_post": null})
	);

	let out = native(&serializer, blog.post);
	assert_eq!(
		out,
		json!({
			"id": 1,
			"title": "Hello",
			"author": {"id": 7, "username": "alice", "latest_post": null},
			"tags": [{"slug": "rust", "label": "Rust"}, {"slug": "serde", "label": "Serde"}]
		})
	);
}

// ============================================================================
// Path sensitivity
// ============================================================================

#[rstest]
fn test_shared_object_expanded_on_each_branch() {
	let shared = chain(&["s"], false).remove(0);
	let root = DynamicObject::new("Root")
		.with("first", shared.clone())
		.with("second", shared.clone())
		.with("all", vec![Source::from(shared.clone()), Source::from(shared)])
		.shared();

	let out = native(&objects(Nested::Unlimited), root);
	let expanded = json!({"name": "s", "next": null});
	assert_eq!(
		out,
		json!({
			"all": [expanded.clone(), expanded.clone()],
			"first": expanded.clone(),
			"second": expanded
		})
	);
}
