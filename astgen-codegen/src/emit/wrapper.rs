//! Node-kind wrapper emission
//!
//! The closed, type-erased reference type enabling uniform traversal and
//! downcasting across all generically-traversable node types.

use astgen_schema::{span_strategy, to_snake_case, wrapper_entries, NodeSpec, Schema};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::ir::{Declaration, EnumDecl, FieldDecl, FnDecl, ImplDecl, StructDecl, VariantDecl};

pub fn generate_node_wrapper(schema: &Schema) -> Vec<Declaration> {
    let entries = wrapper_entries(schema);

    let mut declarations = vec![kind_enum(&entries), node_struct(), node_impl()];
    declarations.push(kind_impl(&entries));
    declarations.extend(from_impls(&entries));
    declarations
}

fn kind_enum(entries: &[(&str, &NodeSpec)]) -> Declaration {
    let variants = entries
        .iter()
        .map(|(name, _)| {
            let ident = format_ident!("{name}");
            VariantDecl {
                name: ident.clone(),
                body: crate::ir::VariantBody::Tuple(vec![quote! { &'a #ident }]),
            }
        })
        .collect();

    Declaration::Enum(EnumDecl {
        docs: vec![
            "Reference to one concrete node type; the closed set of everything".to_string(),
            "that can be walked as a standalone node.".to_string(),
        ],
        name: format_ident!("NodeKind"),
        generics: quote! { <'a> },
        derives: vec![
            format_ident!("Debug"),
            format_ident!("Clone"),
            format_ident!("Copy"),
        ],
        variants,
    })
}

fn node_struct() -> Declaration {
    Declaration::Struct(StructDecl {
        docs: vec![
            "Type-erased node reference with a uniform identity and span".to_string(),
            "surface.".to_string(),
        ],
        name: format_ident!("Node"),
        generics: quote! { <'a> },
        derives: vec![
            format_ident!("Debug"),
            format_ident!("Clone"),
            format_ident!("Copy"),
        ],
        fields: vec![
            FieldDecl {
                name: format_ident!("id"),
                ty: quote! { NodeId },
            },
            FieldDecl {
                name: format_ident!("span"),
                ty: quote! { Span },
            },
            FieldDecl {
                name: format_ident!("kind"),
                ty: quote! { NodeKind<'a> },
            },
        ],
    })
}

fn node_impl() -> Declaration {
    Declaration::Impl(ImplDecl {
        generics: quote! { <'a> },
        target: quote! { Node<'a> },
        functions: vec![FnDecl {
            docs: Vec::new(),
            signature: quote! { pub fn new(id: NodeId, span: Span, kind: NodeKind<'a>) -> Self },
            body: quote! { Node { id, span, kind } },
        }],
    })
}

fn kind_impl(entries: &[(&str, &NodeSpec)]) -> Declaration {
    let mut functions = Vec::new();

    for (name, _) in entries {
        let ident = format_ident!("{name}");
        let snake = to_snake_case(name);
        let as_name = format_ident!("as_{snake}");
        let is_name = format_ident!("is_{snake}");

        functions.push(FnDecl {
            docs: Vec::new(),
            signature: quote! { pub fn #as_name(&self) -> Option<&'a #ident> },
            body: quote! {
                if let NodeKind::#ident(node) = self {
                    Some(node)
                } else {
                    None
                }
            },
        });
        functions.push(FnDecl {
            docs: Vec::new(),
            signature: quote! { pub fn #is_name(&self) -> bool },
            body: quote! { matches!(self, NodeKind::#ident(_)) },
        });
    }

    functions.push(name_fn(entries));
    functions.push(as_ptr_fn(entries));

    Declaration::Impl(ImplDecl {
        generics: quote! { <'a> },
        target: quote! { NodeKind<'a> },
        functions,
    })
}

fn name_fn(entries: &[(&str, &NodeSpec)]) -> FnDecl {
    let arms: Vec<TokenStream> = entries
        .iter()
        .map(|(name, _)| {
            let ident = format_ident!("{name}");
            quote! { NodeKind::#ident(_) => #name, }
        })
        .collect();

    let body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! { match self { #(#arms)* } }
    };

    FnDecl {
        docs: vec!["The node type's literal name.".to_string()],
        signature: quote! { pub fn name(&self) -> &'static str },
        body,
    }
}

fn as_ptr_fn(entries: &[(&str, &NodeSpec)]) -> FnDecl {
    let arms: Vec<TokenStream> = entries
        .iter()
        .map(|(name, _)| {
            let ident = format_ident!("{name}");
            quote! { NodeKind::#ident(node) => *node as *const #ident as *const (), }
        })
        .collect();

    let body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! { match self { #(#arms)* } }
    };

    FnDecl {
        docs: vec![
            "Address of the underlying concrete value, for physical node".to_string(),
            "identity (memoization, cycle detection).".to_string(),
        ],
        signature: quote! { pub fn as_ptr(&self) -> *const () },
        body,
    }
}

fn from_impls(entries: &[(&str, &NodeSpec)]) -> Vec<Declaration> {
    entries
        .iter()
        .map(|(name, spec)| {
            let ident = format_ident!("{name}");
            let span = if span_strategy(spec).is_some() {
                quote! { node.span() }
            } else {
                quote! { Span::default() }
            };

            Declaration::Impl(ImplDecl {
                generics: quote! { <'a> },
                target: quote! { From<&'a #ident> for Node<'a> },
                functions: vec![FnDecl {
                    docs: Vec::new(),
                    signature: quote! { fn from(node: &'a #ident) -> Self },
                    body: quote! { Node::new(node.id(), #span, NodeKind::#ident(node)) },
                }],
            })
        })
        .collect()
}
