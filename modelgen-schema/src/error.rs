//! Error types for model declaration parsing and IR validation.

use thiserror::Error;

/// Error type for declaration parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Malformed field type expression.
    #[error("invalid type expression '{expr}' at position {position}: {message}")]
    TypeExpression {
        /// The full expression text.
        expr: String,
        /// Byte position of the problem.
        position: usize,
        /// What was expected.
        message: String,
    },

    /// Invalid document structure.
    #[error("invalid declaration structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for IR validation.
///
/// Every variant names the model (and field, where one is involved) so the
/// caller can point at the offending declaration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two fields of one model share a name.
    #[error("duplicate field '{field}' in model '{model}'")]
    DuplicateField {
        /// Owning model.
        model: String,
        /// Repeated field name.
        field: String,
    },

    /// Two models share a name.
    #[error("duplicate model '{name}'")]
    DuplicateModel {
        /// Repeated model name.
        name: String,
    },

    /// A reference names a model outside the model set.
    #[error("field '{field}' of model '{model}' references unknown model '{target}'")]
    UnresolvedReference {
        /// Model holding the reference.
        model: String,
        /// Field holding the reference.
        field: String,
        /// Name that failed to resolve.
        target: String,
    },

    /// A model or field name is not a portable identifier.
    #[error("invalid {kind} name '{name}'")]
    InvalidIdentifier {
        /// What was being named ("model", "field", ...).
        kind: String,
        /// Offending name.
        name: String,
    },

    /// A model is named after a primitive kind and could never be referenced.
    #[error("model name '{name}' is reserved for a primitive type")]
    ReservedName {
        /// Offending name.
        name: String,
    },

    /// Requested model does not exist.
    #[error("model '{name}' not found")]
    ModelNotFound {
        /// Model name.
        name: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates a type expression error.
    pub fn type_expr(expr: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::TypeExpression {
            expr: expr.into(),
            position,
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates an invalid identifier error.
    pub fn invalid_identifier(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
