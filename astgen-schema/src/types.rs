//! Core type definitions for the grammar schema

use indexmap::IndexMap;
use serde::Serialize;

/// The loaded grammar schema: an ordered mapping of node name to node
/// specification. Insertion order is significant and drives emission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub entries: IndexMap<String, NodeSpec>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&NodeSpec> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, NodeSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Alias target for `name`, if `name` names an alias entry.
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(NodeSpec::Alias { target }) => Some(target),
            _ => None,
        }
    }
}

/// One schema entry.
#[derive(Debug, Clone, Serialize)]
pub enum NodeSpec {
    /// A pure rename. Excluded from every emitter; field types naming an
    /// alias are expanded to its target.
    Alias { target: String },
    /// A struct-like entry with named fields in declaration order.
    Product {
        fields: IndexMap<String, String>,
        meta: Meta,
        children: Option<ChildrenSpec>,
    },
    /// A tagged-union entry with one payload per variant.
    Sum {
        variants: IndexMap<String, VariantPayload>,
        meta: Meta,
        children: Option<ChildrenSpec>,
    },
}

impl NodeSpec {
    pub fn is_alias(&self) -> bool {
        matches!(self, NodeSpec::Alias { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, NodeSpec::Sum { .. })
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            NodeSpec::Alias { .. } => None,
            NodeSpec::Product { meta, .. } | NodeSpec::Sum { meta, .. } => Some(meta),
        }
    }

    pub fn children(&self) -> Option<&ChildrenSpec> {
        match self {
            NodeSpec::Alias { .. } => None,
            NodeSpec::Product { children, .. } | NodeSpec::Sum { children, .. } => {
                children.as_ref()
            }
        }
    }
}

/// Payload carried by one variant of a `Sum` entry.
#[derive(Debug, Clone, Serialize)]
pub enum VariantPayload {
    /// No payload; a unit case.
    Empty,
    /// Exactly one payload of the given type expression.
    Single(String),
    /// An inline record payload. Receives its own implicit identity and span
    /// fields, distinct from the parent enum's.
    Struct(IndexMap<String, String>),
}

/// Per-entry controls gathered from the document's control keys.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    /// Derived capabilities beyond the default `Debug, Clone, PartialEq` set.
    pub derive_extra: Vec<String>,
    /// Entry declares its own span field (`span: true`).
    pub has_explicit_span: bool,
    /// Entry must not appear in the node-kind wrapper (`node: false`).
    /// Used for leaf value types never walked as standalone nodes.
    pub excluded_from_generic_traversal: bool,
    /// Entry is the identity/index primitive itself (`identity: true`).
    /// It must not recursively derive its own identity accessor.
    pub is_schema_identity_type: bool,
}

/// Declared rule for enumerating an entry's structurally-owned children.
#[derive(Debug, Clone, Serialize)]
pub enum ChildrenSpec {
    /// `children: "self"` — recurse directly into each variant's payload.
    SelfRecursive,
    /// An ordered list of field references.
    Fields(Vec<ChildRef>),
}

/// One field reference inside a `ChildrenSpec` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildRef {
    pub field: String,
    /// The field was suffixed with `?`: may be absent, skip silently.
    pub skip_if_absent: bool,
}

impl ChildRef {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix('?') {
            Some(field) => ChildRef {
                field: field.to_string(),
                skip_if_absent: true,
            },
            None => ChildRef {
                field: raw.to_string(),
                skip_if_absent: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_ref_optional_marker() {
        let plain = ChildRef::parse("statements");
        assert_eq!(plain.field, "statements");
        assert!(!plain.skip_if_absent);

        let optional = ChildRef::parse("default?");
        assert_eq!(optional.field, "default");
        assert!(optional.skip_if_absent);
    }

    #[test]
    fn test_alias_target_lookup() {
        let mut entries = IndexMap::new();
        entries.insert(
            "Block".to_string(),
            NodeSpec::Alias {
                target: "Vec<Statement>".to_string(),
            },
        );
        let schema = Schema { entries };

        assert_eq!(schema.alias_target("Block"), Some("Vec<Statement>"));
        assert_eq!(schema.alias_target("Statement"), None);
    }
}
