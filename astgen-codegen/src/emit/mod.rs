//! Schema-driven emitters
//!
//! Each emitter is a pure function from the classified schema to a list of
//! declarations; rendering is the printer's job.

pub mod children;
pub mod nodes;
pub mod visitor;
pub mod wrapper;

use proc_macro2::TokenStream;
use quote::quote;

/// Parse a type expression into tokens. Expressions come from the schema
/// and are expected to be well-formed; anything unparseable degrades to the
/// unit type rather than failing the run.
pub(crate) fn type_tokens(expr: &str) -> TokenStream {
    expr.parse().unwrap_or_else(|_| quote! { () })
}

/// Parse a module path from configuration into tokens.
pub(crate) fn path_tokens(path: &str) -> TokenStream {
    syn::parse_str::<syn::Path>(path)
        .map(|p| quote! { #p })
        .unwrap_or_else(|_| quote! { crate })
}
