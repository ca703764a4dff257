//! Error types for code generation
//!
//! An unresolved or ambiguous child reference aborts the run: silently
//! skipping a child would emit incomplete traversal code with no symptom
//! until much later.

use astgen_schema::Suggestion;

#[derive(Debug, Clone)]
pub enum GenerateError {
    /// A ChildrenSpec names a field absent from its entry.
    UnresolvedChild {
        node: String,
        field: String,
        suggestions: Vec<Suggestion>,
    },
    /// A ChildrenSpec field name is declared by more than one struct
    /// variant of the owning sum entry.
    AmbiguousChild {
        node: String,
        field: String,
        variants: Vec<String>,
    },
    /// `children: self` on an entry it is not legal for.
    InvalidSelfChildren { node: String, reason: String },
    /// The assembled declarations failed to parse as a source file.
    Render(String),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::UnresolvedChild {
                node,
                field,
                suggestions,
            } => {
                write!(f, "unresolved child reference `{field}` on `{node}`")?;
                if let Some(best) = suggestions.first() {
                    write!(f, ". Did you mean `{}`?", best.candidate)?;
                }
                Ok(())
            }
            GenerateError::AmbiguousChild {
                node,
                field,
                variants,
            } => write!(
                f,
                "ambiguous child reference `{field}` on `{node}`: declared by variants {}",
                variants.join(", ")
            ),
            GenerateError::InvalidSelfChildren { node, reason } => {
                write!(f, "`children: self` is not legal on `{node}`: {reason}")
            }
            GenerateError::Render(source) => {
                write!(f, "generated artifact failed to parse: {source}")
            }
        }
    }
}

impl std::error::Error for GenerateError {}
