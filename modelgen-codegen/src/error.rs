//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Declaration parsing error.
    #[error("declaration parse error: {0}")]
    Parse(#[from] modelgen_schema::ParseError),

    /// IR validation error.
    #[error("schema error: {0}")]
    Schema(#[from] modelgen_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writer error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A field type cannot be represented for the requested target.
    #[error("unsupported type {kind} for field '{field}' of model '{model}' ({target}): {reason}")]
    UnsupportedType {
        /// Model holding the field.
        model: String,
        /// Offending field.
        field: String,
        /// Structural description of the field type.
        kind: String,
        /// Requested target, e.g. `rust/xml` or `xsd`.
        target: String,
        /// Why the type was rejected.
        reason: String,
    },

    /// The language is declared but has no adapter.
    #[error("unsupported language '{language}'")]
    UnsupportedLanguage {
        /// Requested language.
        language: String,
    },

    /// A reference cycle cannot be expressed in the target language.
    #[error("cannot represent reference cycle through {models} in {language}")]
    CycleHandling {
        /// Requested language.
        language: String,
        /// Cycle participants, comma separated.
        models: String,
    },

    /// A type mapping table lacks an entry for a primitive kind.
    #[error("type mapping for {language} has no entry for primitive '{kind}'")]
    IncompleteMapping {
        /// Mapping table language.
        language: String,
        /// Missing primitive kind.
        kind: String,
    },

    /// Two IR names map onto the same native identifier.
    #[error("name collision in {scope} for {language}: '{name}' is generated more than once")]
    NameCollision {
        /// Target language.
        language: String,
        /// Where the collision happened (model or field list).
        scope: String,
        /// Colliding native identifier.
        name: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(
        model: impl Into<String>,
        field: impl Into<String>,
        kind: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedType {
            model: model.into(),
            field: field.into(),
            kind: kind.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}
