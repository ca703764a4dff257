//! AST node type emission
//!
//! One concrete type per non-alias entry, with identity and (where
//! derivable) span accessors.

use astgen_schema::{
    expand_aliases, resolve_shape, span_strategy, Meta, NodeSpec, Schema, SpanStrategy, TypeShape,
    VariantPayload,
};
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::type_tokens;
use crate::ir::{
    Declaration, EnumDecl, FieldDecl, FnDecl, ImplDecl, StructDecl, VariantBody, VariantDecl,
};

const DEFAULT_DERIVES: &[&str] = &["Debug", "Clone", "PartialEq"];

pub fn generate_node_types(schema: &Schema) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for (name, spec) in schema.iter() {
        match spec {
            NodeSpec::Alias { .. } => {}
            NodeSpec::Product { fields, meta, .. } => {
                declarations.push(product_decl(schema, name, fields, meta));
                push_accessor_impl(&mut declarations, schema, name, spec, meta);
            }
            NodeSpec::Sum { variants, meta, .. } => {
                declarations.push(sum_decl(schema, name, variants, meta));
                push_accessor_impl(&mut declarations, schema, name, spec, meta);
            }
        }
    }

    declarations
}

fn derive_idents(meta: &Meta) -> Vec<proc_macro2::Ident> {
    DEFAULT_DERIVES
        .iter()
        .copied()
        .chain(meta.derive_extra.iter().map(String::as_str))
        .map(|name| format_ident!("{name}"))
        .collect()
}

fn product_decl(
    schema: &Schema,
    name: &str,
    fields: &IndexMap<String, String>,
    meta: &Meta,
) -> Declaration {
    let mut decls = Vec::with_capacity(fields.len() + 2);

    if !meta.is_schema_identity_type {
        decls.push(FieldDecl {
            name: format_ident!("id"),
            ty: quote! { NodeId },
        });
    }
    if meta.has_explicit_span {
        decls.push(FieldDecl {
            name: format_ident!("span"),
            ty: quote! { Span },
        });
    }
    for (field, ty) in fields {
        decls.push(FieldDecl {
            name: format_ident!("{field}"),
            ty: type_tokens(&expand_aliases(schema, ty)),
        });
    }

    Declaration::Struct(StructDecl {
        docs: Vec::new(),
        name: format_ident!("{name}"),
        generics: quote! {},
        derives: derive_idents(meta),
        fields: decls,
    })
}

fn sum_decl(
    schema: &Schema,
    name: &str,
    variants: &IndexMap<String, VariantPayload>,
    meta: &Meta,
) -> Declaration {
    let variants = variants
        .iter()
        .map(|(variant, payload)| VariantDecl {
            name: format_ident!("{variant}"),
            body: match payload {
                VariantPayload::Empty => VariantBody::Unit,
                VariantPayload::Single(ty) => {
                    VariantBody::Tuple(vec![type_tokens(&expand_aliases(schema, ty))])
                }
                VariantPayload::Struct(fields) => {
                    // Struct payloads carry their own identity and span,
                    // distinct from the parent enum's.
                    let mut decls = vec![
                        FieldDecl {
                            name: format_ident!("id"),
                            ty: quote! { NodeId },
                        },
                        FieldDecl {
                            name: format_ident!("span"),
                            ty: quote! { Span },
                        },
                    ];
                    decls.extend(fields.iter().map(|(field, ty)| FieldDecl {
                        name: format_ident!("{field}"),
                        ty: type_tokens(&expand_aliases(schema, ty)),
                    }));
                    VariantBody::Struct(decls)
                }
            },
        })
        .collect();

    Declaration::Enum(EnumDecl {
        docs: Vec::new(),
        name: format_ident!("{name}"),
        generics: quote! {},
        derives: derive_idents(meta),
        variants,
    })
}

fn push_accessor_impl(
    declarations: &mut Vec<Declaration>,
    schema: &Schema,
    name: &str,
    spec: &NodeSpec,
    meta: &Meta,
) {
    let mut functions = Vec::new();

    if !meta.is_schema_identity_type {
        functions.push(id_accessor(schema, spec));
    }
    match span_strategy(spec) {
        Some(SpanStrategy::ExplicitField) => functions.push(FnDecl {
            docs: Vec::new(),
            signature: quote! { pub fn span(&self) -> Span },
            body: quote! { self.span },
        }),
        Some(SpanStrategy::PerVariant) => functions.push(span_accessor_per_variant(spec)),
        None => {}
    }

    if !functions.is_empty() {
        declarations.push(Declaration::Impl(ImplDecl {
            generics: quote! {},
            target: {
                let ident = format_ident!("{name}");
                quote! { #ident }
            },
            functions,
        }));
    }
}

fn id_accessor(schema: &Schema, spec: &NodeSpec) -> FnDecl {
    match spec {
        NodeSpec::Alias { .. } => unreachable!("aliases are excluded from emission"),
        NodeSpec::Product { .. } => FnDecl {
            docs: Vec::new(),
            signature: quote! { pub fn id(&self) -> NodeId },
            body: quote! { self.id },
        },
        NodeSpec::Sum { variants, .. } => {
            let mut has_sentinel = false;
            let arms: Vec<TokenStream> = variants
                .iter()
                .map(|(variant, payload)| {
                    let vident = format_ident!("{variant}");
                    match payload {
                        VariantPayload::Empty => {
                            has_sentinel = true;
                            quote! { Self::#vident => NodeId::default(), }
                        }
                        VariantPayload::Single(ty) => {
                            match resolve_shape(schema, ty) {
                                TypeShape::SpanMarker | TypeShape::TokenMarker => {
                                    has_sentinel = true;
                                    quote! { Self::#vident(_) => NodeId::default(), }
                                }
                                _ => quote! { Self::#vident(inner) => inner.id(), },
                            }
                        }
                        VariantPayload::Struct(_) => {
                            quote! { Self::#vident { id, .. } => *id, }
                        }
                    }
                })
                .collect();

            let docs = if has_sentinel {
                vec![
                    "Marker-payload and unit variants carry no intrinsic identity".to_string(),
                    "and yield the default sentinel.".to_string(),
                ]
            } else {
                Vec::new()
            };

            let body = if arms.is_empty() {
                quote! { match *self {} }
            } else {
                quote! { match self { #(#arms)* } }
            };

            FnDecl {
                docs,
                signature: quote! { pub fn id(&self) -> NodeId },
                body,
            }
        }
    }
}

fn span_accessor_per_variant(spec: &NodeSpec) -> FnDecl {
    let NodeSpec::Sum { variants, .. } = spec else {
        unreachable!("per-variant span derivation only applies to sum entries");
    };

    let arms: Vec<TokenStream> = variants
        .iter()
        .map(|(variant, payload)| {
            let vident = format_ident!("{variant}");
            match payload {
                // Derivability guarantees every variant is a span payload
                // or a struct payload with its own span field.
                VariantPayload::Single(_) => quote! { Self::#vident(span) => *span, },
                VariantPayload::Struct(_) => quote! { Self::#vident { span, .. } => *span, },
                VariantPayload::Empty => {
                    unreachable!("unit variants have no span source")
                }
            }
        })
        .collect();

    FnDecl {
        docs: Vec::new(),
        signature: quote! { pub fn span(&self) -> Span },
        body: quote! { match self { #(#arms)* } },
    }
}
