//! Rendering the declaration IR to formatted source text

use proc_macro2::TokenStream;
use quote::quote;

use crate::error::GenerateError;
use crate::ir::{Artifact, Declaration, FnDecl, VariantBody};

/// Header comment prepended to every generated artifact.
pub fn generated_header() -> String {
    "// @generated by astgen from the grammar schema.\n\
     // Do not edit by hand; regenerate instead.\n\n"
        .to_string()
}

/// Render one artifact: declarations become a single token stream, parsed
/// back as a file and pretty-printed. Parsing here is a structural check on
/// the emitters' output, not a user-facing failure mode.
pub fn render_artifact(artifact: &Artifact) -> Result<String, GenerateError> {
    let tokens: TokenStream = artifact
        .declarations
        .iter()
        .map(declaration_tokens)
        .collect();

    let file =
        syn::parse2::<syn::File>(tokens).map_err(|e| GenerateError::Render(e.to_string()))?;

    let mut out = String::with_capacity(4096);
    out.push_str(&artifact.header);
    out.push_str(&prettyplease::unparse(&file));
    Ok(out)
}

fn declaration_tokens(decl: &Declaration) -> TokenStream {
    match decl {
        Declaration::Imports(tokens) => tokens.clone(),
        Declaration::Struct(s) => {
            let docs = doc_attrs(&s.docs);
            let derives = derive_attr(&s.derives);
            let name = &s.name;
            let generics = &s.generics;
            let fields = s.fields.iter().map(|f| {
                let fname = &f.name;
                let fty = &f.ty;
                quote! { pub #fname: #fty }
            });
            quote! {
                #docs
                #derives
                pub struct #name #generics {
                    #(#fields,)*
                }
            }
        }
        Declaration::Enum(e) => {
            let docs = doc_attrs(&e.docs);
            let derives = derive_attr(&e.derives);
            let name = &e.name;
            let generics = &e.generics;
            let variants = e.variants.iter().map(|v| {
                let vname = &v.name;
                match &v.body {
                    VariantBody::Unit => quote! { #vname },
                    VariantBody::Tuple(types) => quote! { #vname(#(#types),*) },
                    VariantBody::Struct(fields) => {
                        let fields = fields.iter().map(|f| {
                            let fname = &f.name;
                            let fty = &f.ty;
                            quote! { #fname: #fty }
                        });
                        quote! { #vname { #(#fields,)* } }
                    }
                }
            });
            quote! {
                #docs
                #derives
                pub enum #name #generics {
                    #(#variants,)*
                }
            }
        }
        Declaration::Impl(i) => {
            let generics = &i.generics;
            let target = &i.target;
            let functions = i.functions.iter().map(fn_tokens);
            quote! {
                impl #generics #target {
                    #(#functions)*
                }
            }
        }
        Declaration::Trait(t) => {
            let docs = doc_attrs(&t.docs);
            let name = &t.name;
            let methods = t.methods.iter().map(|m| {
                let signature = &m.signature;
                match &m.default_body {
                    Some(body) => quote! { #signature { #body } },
                    None => quote! { #signature; },
                }
            });
            quote! {
                #docs
                pub trait #name {
                    #(#methods)*
                }
            }
        }
    }
}

fn fn_tokens(f: &FnDecl) -> TokenStream {
    let docs = doc_attrs(&f.docs);
    let signature = &f.signature;
    let body = &f.body;
    quote! {
        #docs
        #signature {
            #body
        }
    }
}

fn doc_attrs(docs: &[String]) -> TokenStream {
    let lines = docs.iter().map(|line| {
        let text = format!(" {line}");
        quote! { #[doc = #text] }
    });
    quote! { #(#lines)* }
}

fn derive_attr(derives: &[proc_macro2::Ident]) -> TokenStream {
    if derives.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derives),*)] }
    }
}
