//! # astgen-codegen
//!
//! Code generation for the astgen grammar schema: AST node types with
//! identity and span accessors, the type-erased node-kind wrapper,
//! structural child enumeration, and the read-only/mutating visitor pair.
//!
//! Generation is a pure function from `(schema, config)` to artifact text;
//! all path concerns are lifted to the caller via [`OutputTargets`].
//!
//! ```rust,ignore
//! use astgen_codegen::{generate_artifacts, write_artifacts, GenerateConfig, OutputTargets};
//! use astgen_schema::parse_schema_file;
//!
//! let schema = parse_schema_file("grammar.json")?;
//! let artifacts = generate_artifacts(&schema, &GenerateConfig::all())?;
//! write_artifacts(&artifacts, &OutputTargets {
//!     ast: "src/ast/generated.rs".into(),
//!     visitor: "src/visitor.rs".into(),
//!     visitor_mut: "src/visitor_mut.rs".into(),
//! })?;
//! ```

pub mod emit;
pub mod error;
pub mod ir;
pub mod render;
pub mod writer;

pub use error::GenerateError;
pub use writer::{write_artifacts, OutputTargets};

use astgen_schema::Schema;
use proc_macro2::TokenStream;
use quote::quote;

use crate::ir::{Artifact, Declaration};

/// Controls which components are generated and where the generated code
/// finds its collaborators.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Module providing `NodeId`, `Span`, `Token`, `ByteString`, and
    /// `CommaSeparated`.
    pub shared_import: String,
    /// Module the generated AST lands in; imported by the visitor artifacts.
    pub ast_import: String,
    /// Module providing the `walk_*` functions the visitor defaults
    /// delegate to.
    pub walk_import: String,
    /// Generate the concrete node types with their accessors.
    pub node_types: bool,
    /// Generate the node-kind wrapper.
    pub node_wrapper: bool,
    /// Generate the child-enumeration functions.
    pub children: bool,
    /// Generate the visitor pair.
    pub visitors: bool,
}

impl GenerateConfig {
    /// Generate every component, with the default import layout.
    pub fn all() -> Self {
        Self {
            shared_import: "crate::shared".to_string(),
            ast_import: "crate::ast".to_string(),
            walk_import: "crate::traverse".to_string(),
            node_types: true,
            node_wrapper: true,
            children: true,
            visitors: true,
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self::all()
    }
}

/// The rendered output artifacts. Each is fully self-contained generated
/// text; regeneration is the only supported update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// AST types, accessors, node-kind wrapper, and children functions.
    pub ast: String,
    /// The read-only visitor trait.
    pub visitor: String,
    /// The mutating visitor trait.
    pub visitor_mut: String,
}

/// Generate all artifacts from a loaded schema. Pure: no filesystem access.
pub fn generate_artifacts(
    schema: &Schema,
    config: &GenerateConfig,
) -> Result<GeneratedArtifacts, GenerateError> {
    let mut declarations = vec![Declaration::Imports(shared_imports(config))];
    if config.node_types {
        declarations.extend(emit::nodes::generate_node_types(schema));
    }
    if config.node_wrapper {
        declarations.extend(emit::wrapper::generate_node_wrapper(schema));
    }
    if config.children {
        declarations.extend(emit::children::generate_children(schema)?);
    }

    let ast = render::render_artifact(&Artifact {
        header: render::generated_header(),
        declarations,
    })?;

    let (visitor, visitor_mut) = if config.visitors {
        let visitor = render::render_artifact(&Artifact {
            header: render::generated_header(),
            declarations: emit::visitor::generate_visitor(schema, config, false),
        })?;
        let visitor_mut = render::render_artifact(&Artifact {
            header: render::generated_header(),
            declarations: emit::visitor::generate_visitor(schema, config, true),
        })?;
        (visitor, visitor_mut)
    } else {
        (String::new(), String::new())
    };

    tracing::debug!(
        entries = schema.len(),
        ast_bytes = ast.len(),
        "generated artifacts"
    );

    Ok(GeneratedArtifacts {
        ast,
        visitor,
        visitor_mut,
    })
}

fn shared_imports(config: &GenerateConfig) -> TokenStream {
    let shared = emit::path_tokens(&config.shared_import);
    quote! {
        #[allow(unused_imports)]
        use #shared::{ByteString, CommaSeparated, NodeId, Span, Token};
    }
}
