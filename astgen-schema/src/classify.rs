//! Type-expression classification
//!
//! Classification is purely syntactic: only the outer wrapper of a type
//! expression is inspected, never the inner type. Anything unrecognized is
//! `Plain`, the most permissive fallback, so new primitive types can be
//! added to the schema without touching the classifier.

use serde::Serialize;

use crate::types::{NodeSpec, Schema, VariantPayload};

/// Container shape of one field type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeShape {
    /// Exactly one value of the named type.
    Plain(String),
    /// `Option<T>` — zero or one.
    Optional(String),
    /// `Vec<T>` — zero or more, order-preserving.
    Sequence(String),
    /// `Box<T>` — exactly one, heap-owned.
    Indirection(String),
    /// `CommaSeparated<T>` — ordered elements with non-structural
    /// interleaved separators; only the elements count as children.
    SeparatedList(String),
    /// The literal `Span` token. Never traversable.
    SpanMarker,
    /// The literal `Token` token. Never traversable.
    TokenMarker,
}

impl TypeShape {
    /// Inner type name, when the shape carries one.
    pub fn inner(&self) -> Option<&str> {
        match self {
            TypeShape::Plain(t)
            | TypeShape::Optional(t)
            | TypeShape::Sequence(t)
            | TypeShape::Indirection(t)
            | TypeShape::SeparatedList(t) => Some(t),
            TypeShape::SpanMarker | TypeShape::TokenMarker => None,
        }
    }
}

/// Classify a type expression by its outer wrapper.
pub fn classify(expr: &str) -> TypeShape {
    let expr = expr.trim();

    if expr == "Span" {
        return TypeShape::SpanMarker;
    }
    if expr == "Token" {
        return TypeShape::TokenMarker;
    }
    if let Some(inner) = unwrap_outer(expr, "Vec") {
        return TypeShape::Sequence(inner);
    }
    if let Some(inner) = unwrap_outer(expr, "Option") {
        return TypeShape::Optional(inner);
    }
    if let Some(inner) = unwrap_outer(expr, "Box") {
        return TypeShape::Indirection(inner);
    }
    if let Some(inner) = unwrap_outer(expr, "CommaSeparated") {
        return TypeShape::SeparatedList(inner);
    }

    TypeShape::Plain(expr.to_string())
}

fn unwrap_outer(expr: &str, wrapper: &str) -> Option<String> {
    expr.strip_prefix(wrapper)?
        .strip_prefix('<')?
        .strip_suffix('>')
        .map(|inner| inner.trim().to_string())
}

/// Whether a field of this shape is structurally descendable. Markers are
/// never traversable; everything else is.
pub fn is_traversable(shape: &TypeShape) -> bool {
    !matches!(shape, TypeShape::SpanMarker | TypeShape::TokenMarker)
}

/// Like [`classify`], but follows alias entries: a field typed by an alias
/// of `Vec<T>` resolves to `Sequence(T)`. Alias chains are bounded by the
/// schema size, so alias cycles terminate.
pub fn resolve_shape(schema: &Schema, expr: &str) -> TypeShape {
    let mut shape = classify(expr);
    let mut hops = 0;

    while let TypeShape::Plain(name) = &shape {
        match schema.alias_target(name) {
            Some(target) if hops < schema.len() => {
                hops += 1;
                shape = classify(target);
            }
            _ => break,
        }
    }

    shape
}

/// Expand alias names inside a type expression to their targets, rebuilding
/// the outer wrapper around the expanded inner type. Aliases are excluded
/// from every emitter, so emitted field types must not mention them.
pub fn expand_aliases(schema: &Schema, expr: &str) -> String {
    expand_aliases_bounded(schema, expr, schema.len())
}

fn expand_aliases_bounded(schema: &Schema, expr: &str, budget: usize) -> String {
    if budget == 0 {
        return expr.trim().to_string();
    }

    match classify(expr) {
        TypeShape::Plain(name) => match schema.alias_target(&name) {
            Some(target) => expand_aliases_bounded(schema, target, budget - 1),
            None => name,
        },
        TypeShape::Optional(inner) => {
            format!("Option<{}>", expand_aliases_bounded(schema, &inner, budget - 1))
        }
        TypeShape::Sequence(inner) => {
            format!("Vec<{}>", expand_aliases_bounded(schema, &inner, budget - 1))
        }
        TypeShape::Indirection(inner) => {
            format!("Box<{}>", expand_aliases_bounded(schema, &inner, budget - 1))
        }
        TypeShape::SeparatedList(inner) => format!(
            "CommaSeparated<{}>",
            expand_aliases_bounded(schema, &inner, budget - 1)
        ),
        TypeShape::SpanMarker => "Span".to_string(),
        TypeShape::TokenMarker => "Token".to_string(),
    }
}

/// How an entry's span accessor is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStrategy {
    /// The entry declares its own span field; return it.
    ExplicitField,
    /// Every variant is either `Single(Span)` (returned verbatim) or a
    /// struct payload (own span field); dispatch per variant.
    PerVariant,
}

/// Span derivability for an entry. `None` means span-less by design, never
/// an error. The explicit-span control only applies to product entries;
/// a sum has no field to store one in.
pub fn span_strategy(spec: &NodeSpec) -> Option<SpanStrategy> {
    match spec {
        NodeSpec::Alias { .. } => None,
        NodeSpec::Product { meta, .. } => {
            meta.has_explicit_span.then_some(SpanStrategy::ExplicitField)
        }
        NodeSpec::Sum { variants, .. } => {
            let derivable = !variants.is_empty()
                && variants.values().all(|payload| match payload {
                    VariantPayload::Single(ty) => classify(ty) == TypeShape::SpanMarker,
                    VariantPayload::Struct(_) => true,
                    VariantPayload::Empty => false,
                });
            derivable.then_some(SpanStrategy::PerVariant)
        }
    }
}

/// Whether the entry has any structurally-descendable content; decides if a
/// visitor method gets a walk-delegating default body or an empty one.
pub fn has_traversable_content(spec: &NodeSpec) -> bool {
    match spec {
        NodeSpec::Alias { .. } => false,
        NodeSpec::Product { fields, .. } => fields
            .values()
            .any(|ty| is_traversable(&classify(ty))),
        NodeSpec::Sum { variants, .. } => variants.values().any(|payload| match payload {
            VariantPayload::Empty => false,
            VariantPayload::Single(ty) => is_traversable(&classify(ty)),
            VariantPayload::Struct(fields) => fields
                .values()
                .any(|ty| is_traversable(&classify(ty))),
        }),
    }
}

/// The node-kind wrapper's variant set: every entry that is not an alias,
/// not excluded from generic traversal, and not the identity type.
pub fn wrapper_entries(schema: &Schema) -> Vec<(&str, &NodeSpec)> {
    schema
        .iter()
        .filter(|(_, spec)| {
            spec.meta().is_some_and(|meta| {
                !meta.excluded_from_generic_traversal && !meta.is_schema_identity_type
            })
        })
        .map(|(name, spec)| (name.as_str(), spec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_schema_content;

    #[test]
    fn test_classify_outer_wrappers() {
        assert_eq!(
            classify("Vec<Statement>"),
            TypeShape::Sequence("Statement".to_string())
        );
        assert_eq!(
            classify("Option<Expression>"),
            TypeShape::Optional("Expression".to_string())
        );
        assert_eq!(
            classify("Box<Expression>"),
            TypeShape::Indirection("Expression".to_string())
        );
        assert_eq!(
            classify("CommaSeparated<Parameter>"),
            TypeShape::SeparatedList("Parameter".to_string())
        );
        assert_eq!(classify("Span"), TypeShape::SpanMarker);
        assert_eq!(classify("Token"), TypeShape::TokenMarker);
    }

    #[test]
    fn test_classify_is_outer_only() {
        // Only the outer wrapper is inspected; the inner expression is kept
        // verbatim, wrappers and all.
        assert_eq!(
            classify("Vec<Box<Expression>>"),
            TypeShape::Sequence("Box<Expression>".to_string())
        );
    }

    #[test]
    fn test_unrecognized_expression_falls_back_to_plain() {
        assert_eq!(
            classify("ByteString"),
            TypeShape::Plain("ByteString".to_string())
        );
        assert_eq!(
            classify("Arc<Statement>"),
            TypeShape::Plain("Arc<Statement>".to_string())
        );
    }

    #[test]
    fn test_markers_are_not_traversable() {
        assert!(!is_traversable(&classify("Span")));
        assert!(!is_traversable(&classify("Token")));
        assert!(is_traversable(&classify("Vec<Statement>")));
        assert!(is_traversable(&classify("ByteString")));
    }

    #[test]
    fn test_resolve_shape_follows_aliases() {
        let schema = parse_schema_content(
            r#"{
                "Block": "Vec<Statement>",
                "Body": "Block",
                "Statement": { "kind": "Token" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            resolve_shape(&schema, "Block"),
            TypeShape::Sequence("Statement".to_string())
        );
        assert_eq!(
            resolve_shape(&schema, "Body"),
            TypeShape::Sequence("Statement".to_string())
        );
        assert_eq!(
            resolve_shape(&schema, "Statement"),
            TypeShape::Plain("Statement".to_string())
        );
    }

    #[test]
    fn test_resolve_shape_survives_alias_cycles() {
        let schema = parse_schema_content(r#"{ "A": "B", "B": "A" }"#).unwrap();
        // Terminates; the unresolved name stays plain.
        assert!(matches!(resolve_shape(&schema, "A"), TypeShape::Plain(_)));
    }

    #[test]
    fn test_expand_aliases_rebuilds_wrappers() {
        let schema = parse_schema_content(
            r#"{
                "Block": "Vec<Statement>",
                "Statement": { "kind": "Token" }
            }"#,
        )
        .unwrap();

        assert_eq!(expand_aliases(&schema, "Block"), "Vec<Statement>");
        assert_eq!(expand_aliases(&schema, "Option<Block>"), "Option<Vec<Statement>>");
        assert_eq!(expand_aliases(&schema, "Statement"), "Statement");
    }

    #[test]
    fn test_span_strategy_dispatch() {
        let schema = parse_schema_content(
            r#"{
                "Statement": { "span": true, "kind": "Token" },
                "Program": { "statements": "Vec<Statement>" },
                "ExpressionKind": {
                    "as": "Enum",
                    "Literal": "Span",
                    "Binary": { "lhs": "Box<Expression>", "rhs": "Box<Expression>" }
                },
                "Mixed": { "as": "Enum", "Missing": null, "Literal": "Span" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            span_strategy(schema.get("Statement").unwrap()),
            Some(SpanStrategy::ExplicitField)
        );
        assert_eq!(span_strategy(schema.get("Program").unwrap()), None);
        assert_eq!(
            span_strategy(schema.get("ExpressionKind").unwrap()),
            Some(SpanStrategy::PerVariant)
        );
        // A unit variant has no span source; the entry is span-less.
        assert_eq!(span_strategy(schema.get("Mixed").unwrap()), None);
    }

    #[test]
    fn test_traversable_content_judgment() {
        let schema = parse_schema_content(
            r#"{
                "Literal": { "value": "Token", "position": "Span" },
                "Program": { "statements": "Vec<Statement>" },
                "Markers": { "as": "Enum", "Missing": null, "Spanned": "Span" },
                "Walkable": { "as": "Enum", "One": "Box<Expression>" }
            }"#,
        )
        .unwrap();

        assert!(!has_traversable_content(schema.get("Literal").unwrap()));
        assert!(has_traversable_content(schema.get("Program").unwrap()));
        assert!(!has_traversable_content(schema.get("Markers").unwrap()));
        assert!(has_traversable_content(schema.get("Walkable").unwrap()));
    }

    #[test]
    fn test_wrapper_entries_exclusions() {
        let schema = parse_schema_content(
            r#"{
                "NodeId": { "identity": true, "node": false, "value": "u32" },
                "Block": "Vec<Statement>",
                "Comment": { "node": false, "text": "ByteString" },
                "Statement": { "kind": "Token" },
                "Program": { "statements": "Vec<Statement>" }
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = wrapper_entries(&schema)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["Statement", "Program"]);
    }
}
