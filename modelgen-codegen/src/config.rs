//! Generator configuration.

use crate::error::CodegenError;
use modelgen_schema::{SchemaError, is_identifier};

/// Options shared by every adapter and the XSD generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    emit_docs: bool,
    cpp_namespace: Option<String>,
    xsd_target_namespace: Option<String>,
    file_stem: String,
}

impl GeneratorOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            emit_docs: true,
            cpp_namespace: None,
            xsd_target_namespace: None,
            file_stem: "models".to_string(),
        }
    }

    /// Sets whether model and field documentation is copied into the output.
    #[must_use]
    pub fn emit_docs(mut self, emit: bool) -> Self {
        self.emit_docs = emit;
        self
    }

    /// Wraps generated C++ in the given namespace (`acme` or `acme::model`).
    #[must_use]
    pub fn cpp_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cpp_namespace = Some(namespace.into());
        self
    }

    /// Declares a target namespace in generated XSD documents.
    #[must_use]
    pub fn xsd_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.xsd_target_namespace = Some(namespace.into());
        self
    }

    /// Sets the file name stem used when writing definitions to disk.
    #[must_use]
    pub fn file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Returns true if documentation is emitted.
    #[must_use]
    pub fn docs_enabled(&self) -> bool {
        self.emit_docs
    }

    /// Returns the C++ namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.cpp_namespace.as_deref()
    }

    /// Returns the XSD target namespace, if any.
    #[must_use]
    pub fn target_namespace(&self) -> Option<&str> {
        self.xsd_target_namespace.as_deref()
    }

    /// Returns the output file stem.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.file_stem
    }

    /// Checks the options before any generation starts.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` with an `InvalidIdentifier` if the C++
    /// namespace or file stem is not a usable identifier, or if the XSD target
    /// namespace cannot be embedded verbatim in a quoted attribute or literal.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if let Some(namespace) = &self.cpp_namespace {
            if !namespace.split("::").all(is_identifier) {
                return Err(SchemaError::invalid_identifier("namespace", namespace).into());
            }
        }
        if let Some(uri) = &self.xsd_target_namespace {
            let uri_ok = !uri.is_empty()
                && !uri
                    .chars()
                    .any(|c| c.is_whitespace() || c.is_control() || "\"'<>&\\".contains(c));
            if !uri_ok {
                return Err(SchemaError::invalid_identifier("target namespace", uri).into());
            }
        }
        let stem_ok = !self.file_stem.is_empty()
            && self
                .file_stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !stem_ok {
            return Err(SchemaError::invalid_identifier("file stem", &self.file_stem).into());
        }
        Ok(())
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert!(options.docs_enabled());
        assert_eq!(options.namespace(), None);
        assert_eq!(options.target_namespace(), None);
        assert_eq!(options.stem(), "models");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = GeneratorOptions::new()
            .emit_docs(false)
            .cpp_namespace("acme::model")
            .xsd_target_namespace("urn:acme:model")
            .file_stem("people");
        assert!(!options.docs_enabled());
        assert_eq!(options.namespace(), Some("acme::model"));
        assert_eq!(options.target_namespace(), Some("urn:acme:model"));
        assert_eq!(options.stem(), "people");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_namespace() {
        for bad in ["acme model", "acme::", "::acme", "9acme"] {
            let options = GeneratorOptions::new().cpp_namespace(bad);
            assert!(options.validate().is_err(), "{bad}");
        }
        assert!(GeneratorOptions::new().file_stem("../x").validate().is_err());
        assert!(GeneratorOptions::new().file_stem("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_target_namespace() {
        for bad in ["", "urn:a b", "urn:\"x\"", "urn:<x>", "urn:a&b", "urn:a\\b"] {
            let options = GeneratorOptions::new().xsd_target_namespace(bad);
            assert!(options.validate().is_err(), "{bad}");
        }
        for good in ["urn:acme:model", "http://example.com/ns?v=1#frag"] {
            assert!(GeneratorOptions::new().xsd_target_namespace(good).validate().is_ok());
        }
    }
}
