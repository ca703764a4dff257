//! Schema document loading

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SchemaError;
use crate::types::{ChildRef, ChildrenSpec, Meta, NodeSpec, Schema, VariantPayload};

/// Control keys recognized inside an entry mapping. Everything else in the
/// mapping is a field or a variant, except keys whose value shape fits
/// neither (those are ignored as unknown control keys).
const CONTROL_KEYS: &[&str] = &["as", "derive", "span", "node", "identity", "children"];

pub fn parse_schema_file<P: AsRef<Path>>(path: P) -> Result<Schema, SchemaError> {
    let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::Io {
        path: format!("{:?}", path.as_ref()),
        source: e,
    })?;

    parse_schema_content(&content)
}

pub fn parse_schema_content(content: &str) -> Result<Schema, SchemaError> {
    let document: Value = serde_json::from_str(content)?;

    let root = match document {
        Value::Object(map) => map,
        _ => {
            return Err(SchemaError::InvalidEntry {
                node: "<document>".to_string(),
                reason: "schema document must be a mapping of node names".to_string(),
            })
        }
    };

    let mut entries = IndexMap::with_capacity(root.len());
    let mut identity_entry: Option<String> = None;

    for (name, value) in &root {
        let spec = interpret_entry(name, value)?;

        if spec
            .meta()
            .map(|m| m.is_schema_identity_type)
            .unwrap_or(false)
        {
            if let Some(previous) = &identity_entry {
                return Err(SchemaError::InvalidEntry {
                    node: name.clone(),
                    reason: format!(
                        "`identity: true` already declared by `{previous}`; only one entry may be the identity type"
                    ),
                });
            }
            identity_entry = Some(name.clone());
        }

        entries.insert(name.clone(), spec);
    }

    tracing::debug!(entries = entries.len(), "loaded grammar schema");

    Ok(Schema { entries })
}

fn interpret_entry(name: &str, value: &Value) -> Result<NodeSpec, SchemaError> {
    match value {
        Value::String(target) => Ok(NodeSpec::Alias {
            target: target.clone(),
        }),
        Value::Object(map) => interpret_mapping(name, map),
        _ => Err(SchemaError::InvalidEntry {
            node: name.to_string(),
            reason: "entry must be an alias string or a mapping".to_string(),
        }),
    }
}

fn interpret_mapping(
    name: &str,
    map: &serde_json::Map<String, Value>,
) -> Result<NodeSpec, SchemaError> {
    let meta = interpret_meta(name, map)?;
    let children = interpret_children(name, map)?;
    let is_enum = matches!(map.get("as"), Some(Value::String(s)) if s == "Enum");

    if is_enum {
        let mut variants = IndexMap::new();
        for (key, value) in member_keys(map) {
            match value {
                Value::Null => {
                    variants.insert(key.clone(), VariantPayload::Empty);
                }
                Value::String(ty) => {
                    variants.insert(key.clone(), VariantPayload::Single(ty.clone()));
                }
                Value::Object(fields) => {
                    variants.insert(
                        key.clone(),
                        VariantPayload::Struct(interpret_fields(name, key, fields)?),
                    );
                }
                // Any other value shape is an unknown control key.
                _ => {}
            }
        }
        Ok(NodeSpec::Sum {
            variants,
            meta,
            children,
        })
    } else {
        let mut fields = IndexMap::new();
        for (key, value) in member_keys(map) {
            if let Value::String(ty) = value {
                fields.insert(key.clone(), ty.clone());
            }
            // Non-string values under non-control keys are unknown control
            // keys in a product entry; ignored.
        }
        Ok(NodeSpec::Product {
            fields,
            meta,
            children,
        })
    }
}

fn member_keys<'a>(
    map: &'a serde_json::Map<String, Value>,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    map.iter()
        .filter(|(key, _)| !CONTROL_KEYS.contains(&key.as_str()))
}

fn interpret_meta(
    name: &str,
    map: &serde_json::Map<String, Value>,
) -> Result<Meta, SchemaError> {
    let mut meta = Meta::default();

    if let Some(value) = map.get("derive") {
        let list = value.as_array().ok_or_else(|| SchemaError::InvalidEntry {
            node: name.to_string(),
            reason: "`derive` must be an array of trait names".to_string(),
        })?;
        for item in list {
            let trait_name = item.as_str().ok_or_else(|| SchemaError::InvalidEntry {
                node: name.to_string(),
                reason: "`derive` entries must be strings".to_string(),
            })?;
            meta.derive_extra.push(trait_name.to_string());
        }
    }

    meta.has_explicit_span = control_flag(name, map, "span", false)?;
    meta.excluded_from_generic_traversal = !control_flag(name, map, "node", true)?;
    meta.is_schema_identity_type = control_flag(name, map, "identity", false)?;

    Ok(meta)
}

fn control_flag(
    name: &str,
    map: &serde_json::Map<String, Value>,
    key: &str,
    default: bool,
) -> Result<bool, SchemaError> {
    match map.get(key) {
        None => Ok(default),
        Some(Value::Bool(value)) => Ok(*value),
        Some(_) => Err(SchemaError::InvalidEntry {
            node: name.to_string(),
            reason: format!("`{key}` must be a boolean"),
        }),
    }
}

fn interpret_children(
    name: &str,
    map: &serde_json::Map<String, Value>,
) -> Result<Option<ChildrenSpec>, SchemaError> {
    match map.get("children") {
        None => Ok(None),
        Some(Value::String(tag)) if tag == "self" => Ok(Some(ChildrenSpec::SelfRecursive)),
        Some(Value::Array(refs)) => {
            let mut fields = Vec::with_capacity(refs.len());
            for item in refs {
                let raw = item.as_str().ok_or_else(|| SchemaError::InvalidEntry {
                    node: name.to_string(),
                    reason: "`children` entries must be field names".to_string(),
                })?;
                fields.push(ChildRef::parse(raw));
            }
            Ok(Some(ChildrenSpec::Fields(fields)))
        }
        Some(_) => Err(SchemaError::InvalidEntry {
            node: name.to_string(),
            reason: "`children` must be \"self\" or a list of field names".to_string(),
        }),
    }
}

fn interpret_fields(
    node: &str,
    variant: &str,
    map: &serde_json::Map<String, Value>,
) -> Result<IndexMap<String, String>, SchemaError> {
    let mut fields = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let ty = value.as_str().ok_or_else(|| SchemaError::InvalidEntry {
            node: node.to_string(),
            reason: format!("variant `{variant}` field `{key}` must be a type expression"),
        })?;
        fields.insert(key.clone(), ty.to_string());
    }
    Ok(fields)
}
