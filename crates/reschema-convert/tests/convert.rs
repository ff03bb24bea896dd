//! Emission scenarios over resolved graphs.

use pretty_assertions::assert_eq;
use reschema_convert::{
    ConversionContext, ConvertError, ConvertOptions, Converted, SchemaExt, Target, Validator,
    ValidatorKind, json_schema,
};
use reschema_core::{MapLoader, Meta, Schema, SchemaOptions, TypeDescriptor, create};
use rstest::rstest;
use serde_json::{Value, json};

fn type2_loader() -> MapLoader {
    MapLoader::new().with(
        TypeDescriptor::new("type2", json!({"validation": {"type": "integer"}}))
            .with_meta(Meta::with_description("type2")),
    )
}

async fn resolve(raw: Value) -> Schema {
    create(&raw, &SchemaOptions::default()).await.unwrap()
}

async fn resolve_with(raw: Value, loader: MapLoader) -> Schema {
    create(&raw, &SchemaOptions::default().with_loader(loader))
        .await
        .unwrap()
}

fn to_json(schema: &Schema, options: ConvertOptions) -> (Value, ConversionContext<Value>) {
    let mut context = ConversionContext::new();
    let out = schema.to_json_schema(&options, &mut context).unwrap();
    (out, context)
}

fn errors(document: &Value, instance: &Value) -> Vec<String> {
    let validator = jsonschema::validator_for(document).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

// ── JSON-Schema ────────────────────────────────────────────────────

#[tokio::test]
async fn simple_value() {
    let schema = resolve(json!({"validation": {"type": "string"}})).await;
    let (out, context) = to_json(&schema, ConvertOptions::default());
    assert_eq!(out, json!({"type": "string"}));
    assert!(context.is_empty());
}

#[tokio::test]
async fn object_with_nested_properties() {
    let schema = resolve(json!({
        "properties": {
            "prop1": {"meta": {"description": "prop1"}, "schema": {"validation": {"type": "string"}}},
            "prop2": {
                "meta": {"description": "prop2"},
                "schema": {
                    "properties": {
                        "subprop1": {"meta": {"description": "subprop1"}, "schema": {"validation": {"type": "integer"}}}
                    }
                }
            }
        }
    }))
    .await;

    let (out, _) = to_json(&schema, ConvertOptions::default());
    assert_eq!(
        out,
        json!({
            "type": "object",
            "properties": {
                "prop1": {"type": "string", "description": "prop1"},
                "prop2": {
                    "type": "object",
                    "description": "prop2",
                    "properties": {
                        "subprop1": {"type": "integer", "description": "subprop1"}
                    }
                }
            }
        })
    );
}

#[tokio::test]
async fn referenced_type_becomes_definition() {
    let schema = resolve_with(json!({"properties": {"prop1": "type2"}}), type2_loader()).await;
    let (out, context) = to_json(&schema, ConvertOptions::default());

    assert_eq!(
        out,
        json!({
            "type": "object",
            "properties": {
                "prop1": {"$ref": "#/definitions/type2", "description": "type2"}
            }
        })
    );
    assert_eq!(
        serde_json::to_value(&context).unwrap(),
        json!({"definitions": {"type2": {"type": "integer", "description": "type2"}}})
    );
}

#[tokio::test]
async fn deref_inlines_types() {
    let schema = resolve_with(json!({"properties": {"prop1": "type2"}}), type2_loader()).await;
    let (out, context) = to_json(&schema, ConvertOptions::default().with_deref(true));

    assert_eq!(
        out,
        json!({
            "type": "object",
            "properties": {"prop1": {"type": "integer", "description": "type2"}}
        })
    );
    assert!(context.is_empty());
}

#[tokio::test]
async fn array_wraps_items() {
    let schema = resolve(json!({"items": {"validation": {"type": "integer"}}})).await;
    let (out, _) = to_json(&schema, ConvertOptions::default());
    assert_eq!(out, json!({"type": "array", "items": {"type": "integer"}}));
}

#[tokio::test]
async fn alternatives_keep_order() {
    let schema = resolve(json!([
        {"validation": {"type": "string"}},
        {"validation": {"type": "integer"}}
    ]))
    .await;
    let (out, _) = to_json(&schema, ConvertOptions::default());
    assert_eq!(out, json!({"anyOf": [{"type": "string"}, {"type": "integer"}]}));
}

#[tokio::test]
async fn repeated_reference_yields_one_definition() {
    let loader = MapLoader::new().with(TypeDescriptor::new(
        "common/id",
        json!({"validation": {"type": "string"}}),
    ));
    let schema = resolve_with(
        json!({"properties": {"a": "common/id", "b": {"items": "common/id"}}}),
        loader,
    )
    .await;
    let (out, context) = to_json(&schema, ConvertOptions::default());

    assert_eq!(context.len(), 1);
    assert_eq!(
        out["properties"]["a"]["$ref"],
        out["properties"]["b"]["items"]["$ref"]
    );
    assert_eq!(out["properties"]["a"]["$ref"], "#/definitions/common.id");
}

#[tokio::test]
async fn divergent_definition_in_shared_context_fails() {
    let first = resolve_with(json!("type2"), type2_loader()).await;
    let other = MapLoader::new().with(TypeDescriptor::new(
        "type2",
        json!({"validation": {"type": "string"}}),
    ));
    let second = resolve_with(json!("type2"), other).await;

    let mut context = ConversionContext::new();
    first
        .to_json_schema(&ConvertOptions::default(), &mut context)
        .unwrap();
    let err = second
        .to_json_schema(&ConvertOptions::default(), &mut context)
        .unwrap_err();
    assert!(matches!(err, ConvertError::ConflictingDefinition { ref key } if key == "type2"));
}

#[tokio::test]
async fn titled_enumeration_validates_each_value() {
    let schema = resolve(json!({
        "validation": {"type": "string", "values": ["sm", "lg"]},
        "meta": {"values": [{"name": "Small"}, {"name": "Large"}]}
    }))
    .await;
    let (out, _) = to_json(&schema, ConvertOptions::default());

    assert_eq!(
        out,
        json!({
            "type": "string",
            "anyOf": [
                {"type": "string", "enum": ["sm"], "title": "Small"},
                {"type": "string", "enum": ["lg"], "title": "Large"}
            ]
        })
    );
    assert!(errors(&out, &json!("lg")).is_empty());
    assert!(!errors(&out, &json!("md")).is_empty());
}

#[tokio::test]
async fn emitted_document_validates_instances() {
    let loader = MapLoader::new()
        .with(TypeDescriptor::new(
            "money",
            json!({"validation": {"type": "integer"}}),
        ))
        .with(TypeDescriptor::new(
            "billing/line",
            json!({"properties": {"sku": {"validation": {"type": "string"}}, "amount": "money"}}),
        ));
    let schema = resolve_with(
        json!({
            "properties": {
                "lines": {"items": "billing/line"},
                "total": "money",
                "note": [{"validation": {"type": "string"}}, {"validation": {"type": "null"}}]
            }
        }),
        loader,
    )
    .await;

    let (root, context) = to_json(&schema, ConvertOptions::default());
    let document = json_schema::document(root, context);
    assert!(document["definitions"]["billing.line"].is_object());

    let good = json!({"lines": [{"sku": "a-1", "amount": 300}], "total": 300, "note": null});
    assert!(errors(&document, &good).is_empty());

    let bad = json!({"lines": [{"sku": 7, "amount": 1.5}], "total": "300", "note": 3});
    assert_eq!(errors(&document, &bad).len(), 4);
}

// ── Validator DSL ──────────────────────────────────────────────────

#[tokio::test]
async fn validator_for_object_with_reference() {
    let schema = resolve_with(
        json!({"properties": {"count": "type2", "name": {"validation": {"type": "string"}}}}),
        type2_loader(),
    )
    .await;

    let mut context = ConversionContext::new();
    let out = schema
        .to_validator(&ConvertOptions::default(), &mut context)
        .unwrap();

    assert_eq!(
        out.describe().unwrap(),
        json!({
            "type": "object",
            "keys": {
                "count": {"type": "link", "reference": "#type2", "description": "type2"},
                "name": {"type": "string"}
            }
        })
    );
    assert_eq!(
        context.get("type2"),
        Some(&Validator::number().integer().description("type2"))
    );
}

#[tokio::test]
async fn validator_embed_mode_rejects_alternatives_type() {
    let loader = MapLoader::new().with(TypeDescriptor::new(
        "either",
        json!([{"validation": {"type": "string"}}, {"validation": {"type": "integer"}}]),
    ));
    let schema = resolve_with(json!("either"), loader).await;

    let err = schema
        .to_validator(
            &ConvertOptions::default().with_embed_types(true),
            &mut ConversionContext::new(),
        )
        .unwrap_err();
    match err {
        ConvertError::UnsupportedKind { kind, .. } => assert_eq!(kind, "alternatives"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn validator_deref_with_embedded_tag() {
    let schema = resolve_with(json!({"items": "type2"}), type2_loader()).await;
    let out = schema
        .to_validator(
            &ConvertOptions::default()
                .with_deref(true)
                .with_embed_types(true),
            &mut ConversionContext::new(),
        )
        .unwrap();

    let ValidatorKind::Array { items } = out.kind() else {
        panic!("expected array validator, got {out:?}");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].type_tag(), Some("type2"));
    assert_eq!(items[0].description_text(), Some("type2"));
}

// ── Dynamic dispatch ───────────────────────────────────────────────

#[rstest]
#[case("JsonSchema", Target::JsonSchema)]
#[case("jsonschema", Target::JsonSchema)]
#[case("JOI", Target::Validator)]
#[case("Validator", Target::Validator)]
#[tokio::test]
async fn to_dispatches_by_name(#[case] name: &str, #[case] target: Target) {
    let schema = resolve_with(json!({"properties": {"p": "type2"}}), type2_loader()).await;
    let mut context = ConversionContext::new();

    let out = schema
        .to(name, &ConvertOptions::default(), &mut context)
        .unwrap();
    assert_eq!(out.target(), target);
    assert_eq!(context.get("type2").map(Converted::target), Some(target));
}

#[tokio::test]
async fn to_unknown_target_fails() {
    let schema = resolve(json!({"validation": {"type": "string"}})).await;
    let err = schema
        .to("nope", &ConvertOptions::default(), &mut ConversionContext::new())
        .unwrap_err();
    assert!(matches!(err, ConvertError::UnknownConverter(ref name) if name == "nope"));
    assert_eq!(err.to_string(), "converter not implemented: nope");
}

#[tokio::test]
async fn to_keeps_targets_apart_in_one_context() {
    let schema = resolve_with(json!("type2"), type2_loader()).await;
    let mut context = ConversionContext::new();

    schema
        .to("jsonschema", &ConvertOptions::default(), &mut context)
        .unwrap();
    let err = schema
        .to("joi", &ConvertOptions::default(), &mut context)
        .unwrap_err();
    assert!(matches!(err, ConvertError::ConflictingDefinition { .. }));

    let json = context.get("type2").and_then(Converted::as_json).unwrap();
    assert_eq!(json, &json!({"type": "integer", "description": "type2"}));
}
