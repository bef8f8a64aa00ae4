//! # Modelgen Codegen
//!
//! Multi-language code generation from the model IR.
//!
//! This crate provides:
//! - The per-language type mapping registry
//! - Language adapters for Rust (serde) and C++ (nlohmann/json, yaml-cpp,
//!   rapidxml), each emitting structures plus JSON/YAML/XML routines
//! - XSD generation for the XML encoding
//! - The emission driver tying them together

pub mod adapter;
pub mod config;
pub mod cpp;
pub mod error;
pub mod generator;
pub mod language;
pub mod registry;
pub mod resolve;
pub mod rust;
pub mod xsd;

pub use adapter::{LanguageAdapter, adapter_for};
pub use config::GeneratorOptions;
pub use error::CodegenError;
pub use generator::{Definition, Generator, Omission};
pub use language::{Format, Language};
pub use registry::{NativeType, native_spelling, verify_registry};
pub use xsd::XsdGenerator;

use modelgen_schema::{ModelSet, SchemaIr};

/// Generates the definition of every model in `models` for `language`.
///
/// # Errors
/// Returns `CodegenError` if the set is invalid or generation fails.
pub fn generate_definition(
    models: &ModelSet,
    language: Language,
) -> Result<Definition, CodegenError> {
    let ir = SchemaIr::new(models.clone())?;
    Generator::new(&ir).generate_definition(language)
}

/// Generates the XSD document for the models reachable from `root`.
///
/// # Errors
/// Returns `CodegenError` if the set is invalid, `root` is unknown, or a
/// reachable field has no XML form.
pub fn to_xsd(models: &ModelSet, root: &str) -> Result<String, CodegenError> {
    let ir = SchemaIr::new(models.clone())?;
    Generator::new(&ir).to_xsd(root)
}

/// Generates source for `language` from a model declaration string.
///
/// # Arguments
/// * `xml` - Model declaration content
/// * `language` - Target language
///
/// # Returns
/// The rendered source file.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, or generation fails.
pub fn generate_from_xml(xml: &str, language: Language) -> Result<String, CodegenError> {
    let models = modelgen_schema::parse_models(xml)?;
    let ir = SchemaIr::new(models)?;
    let definition = Generator::new(&ir).generate_definition(language)?;
    Ok(definition.render())
}

/// Generates source for `language` from a model declaration file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation, or generation
/// fails.
pub fn generate_from_file(path: &std::path::Path, language: Language) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_schema::{FieldType, Model, PrimitiveKind};

    const POINT: &str = r#"<models>
    <model name="Point">
        <field name="x" type="int"/>
        <field name="y" type="int"/>
    </model>
</models>"#;

    #[test]
    fn test_generate_from_xml() {
        let rust = generate_from_xml(POINT, Language::Rust).expect("rust");
        // Width-less integers default to 64-bit signed.
        assert!(rust.contains("pub x: i64,"));

        let cpp = generate_from_xml(POINT, Language::Cpp).expect("cpp");
        assert!(cpp.contains("std::int64_t x{};"));

        assert!(matches!(
            generate_from_xml(POINT, Language::Java),
            Err(CodegenError::UnsupportedLanguage { .. })
        ));
        assert!(matches!(
            generate_from_xml("<models><model/></models>", Language::Rust),
            Err(CodegenError::Parse(_))
        ));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("point.xml");
        std::fs::write(&path, POINT).expect("written");
        assert!(generate_from_file(&path, Language::Rust)
            .expect("generated")
            .contains("pub struct Point {"));
        assert!(matches!(
            generate_from_file(&dir.path().join("missing.xml"), Language::Rust),
            Err(CodegenError::Io(_))
        ));
    }

    #[test]
    fn test_to_xsd_over_model_set() {
        let set = ModelSet::new()
            .with_model(Model::new("Person").with_field("address", FieldType::reference("Address")))
            .with_model(Model::new("Address").with_field("city", PrimitiveKind::String.into()));
        let xsd = to_xsd(&set, "Person").expect("xsd");
        assert!(xsd.contains("<xs:element name=\"address\" type=\"AddressType\"/>"));

        let broken = ModelSet::new()
            .with_model(Model::new("Person").with_field("address", FieldType::reference("Address")));
        assert!(matches!(to_xsd(&broken, "Person"), Err(CodegenError::Schema(_))));
    }

    #[test]
    fn test_registry_is_complete() {
        assert!(verify_registry().is_ok());
    }
}
