//! Visitor interface emission
//!
//! One overridable method per node type with a structural-walk default. The
//! mutating variant differs from the read-only variant solely in reference
//! exclusivity; there is no other behavioral difference.

use astgen_schema::{has_traversable_content, to_snake_case, Schema};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::path_tokens;
use crate::ir::{Declaration, TraitDecl, TraitMethodDecl};
use crate::GenerateConfig;

/// The grammar's two recursive join points and their tag-only counterparts.
/// Their entry points are hard-wired rather than derived from the schema.
const SPECIAL_PAIRS: &[(&str, &str)] = &[
    ("Statement", "StatementKind"),
    ("Expression", "ExpressionKind"),
];

pub fn generate_visitor(
    schema: &Schema,
    config: &GenerateConfig,
    mutable: bool,
) -> Vec<Declaration> {
    let active_pairs: Vec<(&str, &str)> = SPECIAL_PAIRS
        .iter()
        .copied()
        .filter(|&(concrete, kind)| schema.get(concrete).is_some() && schema.get(kind).is_some())
        .collect();

    let mut methods = Vec::new();
    for &(concrete, kind) in &active_pairs {
        methods.extend(entry_point_methods(concrete, kind, mutable));
    }

    for (name, spec) in schema.iter() {
        if spec.is_alias() {
            continue;
        }
        if active_pairs
            .iter()
            .any(|&(concrete, kind)| name == concrete || name == kind)
        {
            continue;
        }
        methods.push(visit_method(name, has_traversable_content(spec), mutable));
    }

    let (trait_name, docs) = if mutable {
        (
            format_ident!("VisitorMut"),
            vec![
                "Mutating tree visitor with one overridable method per node".to_string(),
                "type; defaults delegate to the structural walk functions.".to_string(),
            ],
        )
    } else {
        (
            format_ident!("Visitor"),
            vec![
                "Read-only tree visitor with one overridable method per node".to_string(),
                "type; defaults delegate to the structural walk functions.".to_string(),
            ],
        )
    };

    vec![
        Declaration::Imports(imports(config)),
        Declaration::Trait(TraitDecl {
            docs,
            name: trait_name,
            methods,
        }),
    ]
}

fn imports(config: &GenerateConfig) -> TokenStream {
    let ast = path_tokens(&config.ast_import);
    let walk = path_tokens(&config.walk_import);
    quote! {
        #[allow(unused_imports)]
        use #ast::*;
        #[allow(unused_imports)]
        use #walk::*;
    }
}

fn reference(mutable: bool) -> TokenStream {
    if mutable {
        quote! { &mut }
    } else {
        quote! { & }
    }
}

fn walk_ident(snake: &str, mutable: bool) -> proc_macro2::Ident {
    if mutable {
        format_ident!("walk_{snake}_mut")
    } else {
        format_ident!("walk_{snake}")
    }
}

/// The hard-wired pair: the concrete node forwards into its tag enum, the
/// tag enum delegates to its walk function.
fn entry_point_methods(concrete: &str, kind: &str, mutable: bool) -> Vec<TraitMethodDecl> {
    let concrete_snake = to_snake_case(concrete);
    let kind_snake = to_snake_case(kind);

    let concrete_ident = format_ident!("{concrete}");
    let kind_ident = format_ident!("{kind}");
    let visit_concrete = format_ident!("visit_{concrete_snake}");
    let visit_kind = format_ident!("visit_{kind_snake}");
    let walk_kind = walk_ident(&kind_snake, mutable);
    let reference = reference(mutable);

    let kind_access = if mutable {
        quote! { &mut node.kind }
    } else {
        quote! { &node.kind }
    };

    vec![
        TraitMethodDecl {
            signature: quote! {
                fn #visit_concrete(&mut self, node: #reference #concrete_ident)
            },
            default_body: Some(quote! { self.#visit_kind(#kind_access); }),
        },
        TraitMethodDecl {
            signature: quote! {
                fn #visit_kind(&mut self, node: #reference #kind_ident)
            },
            default_body: Some(quote! { #walk_kind(self, node); }),
        },
    ]
}

fn visit_method(name: &str, traversable: bool, mutable: bool) -> TraitMethodDecl {
    let snake = to_snake_case(name);
    let method = format_ident!("visit_{snake}");
    let ty = format_ident!("{name}");
    let reference = reference(mutable);

    if traversable {
        let walk = walk_ident(&snake, mutable);
        TraitMethodDecl {
            signature: quote! { fn #method(&mut self, node: #reference #ty) },
            default_body: Some(quote! { #walk(self, node); }),
        }
    } else {
        TraitMethodDecl {
            signature: quote! { fn #method(&mut self, _node: #reference #ty) },
            default_body: Some(quote! {}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Artifact;
    use crate::render::{generated_header, render_artifact};
    use astgen_schema::parse_schema_content;

    const GRAMMAR: &str = r#"{
        "Block": "Vec<Statement>",
        "Statement": { "span": true, "kind": "StatementKind" },
        "StatementKind": { "as": "Enum", "Noop": null, "Expression": "Box<Expression>" },
        "Expression": { "span": true, "kind": "ExpressionKind" },
        "ExpressionKind": { "as": "Enum", "Literal": "Span" },
        "Program": { "statements": "Vec<Statement>" },
        "Literal": { "value": "Token", "position": "Span" }
    }"#;

    fn render(mutable: bool) -> String {
        let schema = parse_schema_content(GRAMMAR).unwrap();
        render_artifact(&Artifact {
            header: generated_header(),
            declarations: generate_visitor(&schema, &GenerateConfig::all(), mutable),
        })
        .unwrap()
    }

    #[test]
    fn test_entry_points_are_hard_wired() {
        let code = render(false);

        assert!(code.contains("fn visit_statement(&mut self, node: &Statement)"));
        assert!(code.contains("self.visit_statement_kind(&node.kind);"));
        assert!(code.contains("fn visit_statement_kind(&mut self, node: &StatementKind)"));
        assert!(code.contains("walk_statement_kind(self, node);"));
        assert!(code.contains("fn visit_expression(&mut self, node: &Expression)"));
        assert!(code.contains("self.visit_expression_kind(&node.kind);"));
    }

    #[test]
    fn test_traversable_entries_delegate_to_walk() {
        let code = render(false);
        assert!(code.contains("fn visit_program(&mut self, node: &Program)"));
        assert!(code.contains("walk_program(self, node);"));
    }

    #[test]
    fn test_marker_only_entries_get_empty_defaults() {
        let code = render(false);
        assert!(code.contains("fn visit_literal(&mut self, _node: &Literal) {}"));
        assert!(!code.contains("walk_literal"));
    }

    #[test]
    fn test_aliases_get_no_method() {
        let code = render(false);
        assert!(!code.contains("visit_block"));
    }

    #[test]
    fn test_mutating_variant_differs_only_in_references() {
        let code = render(true);

        assert!(code.contains("pub trait VisitorMut"));
        assert!(code.contains("fn visit_program(&mut self, node: &mut Program)"));
        assert!(code.contains("walk_program_mut(self, node);"));
        assert!(code.contains("self.visit_statement_kind(&mut node.kind);"));
        assert!(code.contains("walk_statement_kind_mut(self, node);"));
    }
}
