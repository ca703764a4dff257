//! Structural child enumeration emission
//!
//! Per entry carrying a children declaration, a `children()` function that
//! enumerates the entry's structurally-owned child nodes in declaration
//! order. Ordering is load-bearing for downstream passes that rely on
//! source-position-ordered traversal.

use astgen_schema::{
    classify, resolve_shape, suggest_similar, ChildRef, ChildrenSpec, NodeSpec, Schema, TypeShape,
    VariantPayload,
};
use indexmap::IndexMap;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::error::GenerateError;
use crate::ir::{Declaration, FnDecl, ImplDecl};

pub fn generate_children(schema: &Schema) -> Result<Vec<Declaration>, GenerateError> {
    let mut declarations = Vec::new();

    for (name, spec) in schema.iter() {
        let Some(children) = spec.children() else {
            continue;
        };

        let body = match children {
            ChildrenSpec::SelfRecursive => self_children_body(schema, name, spec)?,
            ChildrenSpec::Fields(refs) => match spec {
                NodeSpec::Product { fields, .. } => {
                    product_children_body(schema, name, fields, refs)?
                }
                NodeSpec::Sum { variants, .. } => {
                    sum_children_body(schema, name, variants, refs)?
                }
                NodeSpec::Alias { .. } => continue,
            },
        };

        let body = if body.is_empty() {
            quote! { Vec::new() }
        } else {
            quote! {
                let mut children = Vec::new();
                #body
                children
            }
        };

        let ident = format_ident!("{name}");
        declarations.push(Declaration::Impl(ImplDecl {
            generics: quote! {},
            target: quote! { #ident },
            functions: vec![FnDecl {
                docs: vec![
                    "Structurally-owned child nodes, in declaration order.".to_string(),
                ],
                signature: quote! { pub fn children(&self) -> Vec<Node<'_>> },
                body,
            }],
        }));
    }

    Ok(declarations)
}

fn product_children_body(
    schema: &Schema,
    node: &str,
    fields: &IndexMap<String, String>,
    refs: &[ChildRef],
) -> Result<TokenStream, GenerateError> {
    let mut statements = Vec::with_capacity(refs.len());

    for child_ref in refs {
        let ty = fields.get(&child_ref.field).ok_or_else(|| {
            unresolved(node, &child_ref.field, fields.keys().map(String::as_str))
        })?;
        let field = format_ident!("{}", child_ref.field);
        statements.push(push_from_place(schema, quote! { self.#field }, ty));
    }

    Ok(quote! { #(#statements)* })
}

fn sum_children_body(
    schema: &Schema,
    node: &str,
    variants: &IndexMap<String, VariantPayload>,
    refs: &[ChildRef],
) -> Result<TokenStream, GenerateError> {
    // Each reference is scoped to the one struct variant declaring it.
    let mut by_variant: IndexMap<&str, Vec<(&ChildRef, &str)>> = IndexMap::new();

    for child_ref in refs {
        let mut owners: Vec<(&str, &str)> = Vec::new();
        for (variant, payload) in variants {
            if let VariantPayload::Struct(fields) = payload {
                if let Some(ty) = fields.get(&child_ref.field) {
                    owners.push((variant.as_str(), ty.as_str()));
                }
            }
        }

        match owners.as_slice() {
            [] => {
                let candidates: Vec<&str> = variants
                    .values()
                    .filter_map(|payload| match payload {
                        VariantPayload::Struct(fields) => Some(fields.keys()),
                        _ => None,
                    })
                    .flatten()
                    .map(String::as_str)
                    .collect();
                return Err(unresolved(node, &child_ref.field, candidates));
            }
            [(variant, ty)] => {
                by_variant.entry(*variant).or_default().push((child_ref, *ty));
            }
            many => {
                return Err(GenerateError::AmbiguousChild {
                    node: node.to_string(),
                    field: child_ref.field.clone(),
                    variants: many.iter().map(|(v, _)| v.to_string()).collect(),
                });
            }
        }
    }

    let mut arms = Vec::new();
    for (variant, scoped) in &by_variant {
        let vident = format_ident!("{variant}");
        let bindings: Vec<Ident> = scoped
            .iter()
            .map(|(child_ref, _)| format_ident!("{}", child_ref.field))
            .collect();
        let statements: Vec<TokenStream> = scoped
            .iter()
            .map(|(child_ref, ty)| {
                let binding = format_ident!("{}", child_ref.field);
                push_from_binding(schema, &binding, ty)
            })
            .collect();

        arms.push(quote! {
            Self::#vident { #(#bindings,)* .. } => {
                #(#statements)*
            }
        });
    }

    // Variants not named by any reference contribute nothing.
    let catchall = if by_variant.len() < variants.len() {
        quote! { _ => {} }
    } else {
        quote! {}
    };

    Ok(quote! {
        match self {
            #(#arms)*
            #catchall
        }
    })
}

fn self_children_body(
    schema: &Schema,
    node: &str,
    spec: &NodeSpec,
) -> Result<TokenStream, GenerateError> {
    let NodeSpec::Sum { variants, .. } = spec else {
        return Err(GenerateError::InvalidSelfChildren {
            node: node.to_string(),
            reason: "only enum entries can recurse into their own variants".to_string(),
        });
    };

    let mut arms = Vec::new();
    let mut skipped = false;

    for (variant, payload) in variants {
        let vident = format_ident!("{variant}");
        match payload {
            VariantPayload::Empty => skipped = true,
            VariantPayload::Single(ty) => {
                let binding = format_ident!("node");
                let statement = push_from_binding(schema, &binding, ty);
                if statement.is_empty() {
                    // Marker payloads contribute nothing.
                    skipped = true;
                } else {
                    arms.push(quote! {
                        Self::#vident(node) => {
                            #statement
                        }
                    });
                }
            }
            VariantPayload::Struct(fields) => {
                let traversable: Vec<(&String, &String)> = fields
                    .iter()
                    .filter(|(_, ty)| !push_from_place_is_empty(ty))
                    .collect();
                if traversable.is_empty() {
                    skipped = true;
                    continue;
                }
                let bindings: Vec<Ident> = traversable
                    .iter()
                    .map(|(field, _)| format_ident!("{field}"))
                    .collect();
                let statements: Vec<TokenStream> = traversable
                    .iter()
                    .map(|(field, ty)| {
                        let binding = format_ident!("{field}");
                        push_from_binding(schema, &binding, ty)
                    })
                    .collect();
                arms.push(quote! {
                    Self::#vident { #(#bindings,)* .. } => {
                        #(#statements)*
                    }
                });
            }
        }
    }

    let catchall = if skipped {
        quote! { _ => {} }
    } else {
        quote! {}
    };

    Ok(quote! {
        match self {
            #(#arms)*
            #catchall
        }
    })
}

fn push_from_place_is_empty(ty: &str) -> bool {
    matches!(classify(ty), TypeShape::SpanMarker | TypeShape::TokenMarker)
}

/// Push statements for a field accessed through `self` (product entries).
fn push_from_place(schema: &Schema, place: TokenStream, ty: &str) -> TokenStream {
    match resolve_shape(schema, ty) {
        TypeShape::Sequence(_) | TypeShape::SeparatedList(_) => quote! {
            for item in #place.iter() {
                children.push(Node::from(item));
            }
        },
        TypeShape::Indirection(_) => quote! {
            children.push(Node::from(#place.as_ref()));
        },
        TypeShape::Optional(inner) => {
            let access = optional_access(&inner);
            quote! {
                if let Some(item) = #place.#access {
                    children.push(Node::from(item));
                }
            }
        }
        TypeShape::Plain(_) => quote! {
            children.push(Node::from(&#place));
        },
        TypeShape::SpanMarker | TypeShape::TokenMarker => quote! {},
    }
}

/// Push statements for a field bound by a match arm (sum entries and the
/// self-recursive shape), where the binding is already a reference.
fn push_from_binding(schema: &Schema, binding: &Ident, ty: &str) -> TokenStream {
    match resolve_shape(schema, ty) {
        TypeShape::Sequence(_) | TypeShape::SeparatedList(_) => quote! {
            for item in #binding.iter() {
                children.push(Node::from(item));
            }
        },
        TypeShape::Indirection(_) => quote! {
            children.push(Node::from(#binding.as_ref()));
        },
        TypeShape::Optional(inner) => {
            let access = optional_access(&inner);
            quote! {
                if let Some(item) = #binding.#access {
                    children.push(Node::from(item));
                }
            }
        }
        TypeShape::Plain(_) => quote! {
            children.push(Node::from(#binding));
        },
        TypeShape::SpanMarker | TypeShape::TokenMarker => quote! {},
    }
}

/// `Option<Box<T>>` needs one more dereference than `Option<T>`.
fn optional_access(inner: &str) -> TokenStream {
    match classify(inner) {
        TypeShape::Indirection(_) => quote! { as_deref() },
        _ => quote! { as_ref() },
    }
}

fn unresolved<'a>(
    node: &str,
    field: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> GenerateError {
    let candidates: Vec<&str> = candidates.into_iter().collect();
    GenerateError::UnresolvedChild {
        node: node.to_string(),
        field: field.to_string(),
        suggestions: suggest_similar(field, &candidates, 2),
    }
}
