//! Declaration-level intermediate representation
//!
//! Emitters describe *what* to emit as a flat list of typed declarations;
//! only the printer in [`crate::render`] knows how a declaration becomes
//! text. Signatures and bodies are carried as token streams so a
//! declaration stays small without modeling the whole language.

use proc_macro2::{Ident, TokenStream};

/// One output artifact: a header comment followed by declarations.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub header: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    /// Verbatim `use` items (and any attributes on them).
    Imports(TokenStream),
    Struct(StructDecl),
    Enum(EnumDecl),
    Impl(ImplDecl),
    Trait(TraitDecl),
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub docs: Vec<String>,
    pub name: Ident,
    /// Generic parameters, e.g. `<'a>`; empty for none.
    pub generics: TokenStream,
    pub derives: Vec<Ident>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TokenStream,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub docs: Vec<String>,
    pub name: Ident,
    pub generics: TokenStream,
    pub derives: Vec<Ident>,
    pub variants: Vec<VariantDecl>,
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: Ident,
    pub body: VariantBody,
}

#[derive(Debug, Clone)]
pub enum VariantBody {
    Unit,
    Tuple(Vec<TokenStream>),
    Struct(Vec<FieldDecl>),
}

/// `impl #generics #target { #functions }` — covers both inherent impls
/// (`target` is a type) and trait impls (`target` is `Trait for Type`).
#[derive(Debug, Clone)]
pub struct ImplDecl {
    pub generics: TokenStream,
    pub target: TokenStream,
    pub functions: Vec<FnDecl>,
}

/// A function with its full signature (including visibility and `fn`) and
/// its body.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub docs: Vec<String>,
    pub signature: TokenStream,
    pub body: TokenStream,
}

#[derive(Debug, Clone)]
pub struct TraitDecl {
    pub docs: Vec<String>,
    pub name: Ident,
    pub methods: Vec<TraitMethodDecl>,
}

/// A trait method; `default_body: None` renders a required method.
#[derive(Debug, Clone)]
pub struct TraitMethodDecl {
    pub signature: TokenStream,
    pub default_body: Option<TokenStream>,
}
