//! Rust serializer and deserializer generation.
//!
//! Each routine is an inherent method delegating to the format crate; the
//! serde attributes on the struct carry the absence and default rules. Every
//! string routine has a `*_file` twin reporting failures as `std::io::Error`.
//! When an XSD target namespace is configured, `to_xml` declares it as the
//! root element's default namespace so documents validate against the XSD.

use crate::error::CodegenError;
use crate::language::{Format, Language};
use crate::resolve::check_representable;
use modelgen_schema::Model;

/// Generator for per-format `to_*`/`from_*` methods.
pub struct FormatGenerator<'a> {
    type_name: &'a str,
    xml_namespace: Option<&'a str>,
}

impl<'a> FormatGenerator<'a> {
    /// Creates a generator for the named struct.
    #[must_use]
    pub fn new(type_name: &'a str) -> Self {
        Self {
            type_name,
            xml_namespace: None,
        }
    }

    /// Sets the default namespace declared on the XML root element.
    #[must_use]
    pub fn xml_namespace(mut self, namespace: Option<&'a str>) -> Self {
        self.xml_namespace = namespace;
        self
    }

    /// Generates the serializer method for `format`.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` if a field cannot round-trip
    /// through `format`.
    pub fn serializer(&self, model: &Model, format: Format) -> Result<String, CodegenError> {
        check_model(model, format)?;

        let (doc, signature, body) = match format {
            Format::Json => (
                "Serializes to a JSON string.",
                "pub fn to_json(&self) -> Result<String, serde_json::Error>",
                "serde_json::to_string(self)".to_string(),
            ),
            Format::Yaml => (
                "Serializes to a YAML document.",
                "pub fn to_yaml(&self) -> Result<String, serde_yaml::Error>",
                "serde_yaml::to_string(self)".to_string(),
            ),
            Format::Xml => (
                "Serializes to an XML document; elements follow field order.",
                "pub fn to_xml(&self) -> Result<String, quick_xml::SeError>",
                match self.xml_namespace {
                    Some(namespace) => format!(
                        r#"quick_xml::se::to_string_with_root("{0}", self).map(|xml| xml.replacen("<{0}", "<{0} xmlns=\"{1}\"", 1))"#,
                        model.name, namespace
                    ),
                    None => format!("quick_xml::se::to_string_with_root(\"{}\", self)", model.name),
                },
            ),
        };
        let file = format!(
            "pub fn to_{0}_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()>",
            format
        );
        let file_body = format!(
            "std::fs::write(path, self.to_{}().map_err(std::io::Error::other)?)",
            format
        );
        Ok(self.methods(&[
            (doc, signature, &body),
            ("Writes the serialized form to `path`.", &file, &file_body),
        ]))
    }

    /// Generates the deserializer method for `format`.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` if a field cannot round-trip
    /// through `format`.
    pub fn deserializer(&self, model: &Model, format: Format) -> Result<String, CodegenError> {
        check_model(model, format)?;

        let (doc, signature, body) = match format {
            Format::Json => (
                "Parses a JSON string.",
                "pub fn from_json(input: &str) -> Result<Self, serde_json::Error>",
                "serde_json::from_str(input)",
            ),
            Format::Yaml => (
                "Parses a YAML document.",
                "pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error>",
                "serde_yaml::from_str(input)",
            ),
            Format::Xml => (
                "Parses an XML document.",
                "pub fn from_xml(input: &str) -> Result<Self, quick_xml::DeError>",
                "quick_xml::de::from_str(input)",
            ),
        };
        let file = format!(
            "pub fn from_{}_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self>",
            format
        );
        let file_body = format!(
            "Self::from_{}(&std::fs::read_to_string(path)?).map_err(std::io::Error::other)",
            format
        );
        Ok(self.methods(&[
            (doc, signature, body),
            ("Reads and parses the file at `path`.", &file, &file_body),
        ]))
    }

    fn methods(&self, methods: &[(&str, &str, &str)]) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl {} {{\n", self.type_name));
        for (i, (doc, signature, body)) in methods.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&format!("    /// {}\n", doc));
            output.push_str(&format!("    {} {{\n", signature));
            output.push_str(&format!("        {}\n", body));
            output.push_str("    }\n");
        }
        output.push_str("}\n\n");
        output
    }
}

fn check_model(model: &Model, format: Format) -> Result<(), CodegenError> {
    let target = format!("{}/{}", Language::Rust, format);
    model
        .fields
        .iter()
        .try_for_each(|field| check_representable(model, field, Some(format), &target))
}
