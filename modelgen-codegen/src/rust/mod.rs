//! Rust code generation (serde family).
//!
//! Structures derive `Serialize`/`Deserialize`; the per-format routines are
//! thin wrappers over `serde_json`, `serde_yaml` and `quick_xml`.

pub mod formats;
pub mod structs;
pub mod support;

pub use formats::FormatGenerator;
pub use structs::StructGenerator;

use crate::adapter::{FieldPlan, LanguageAdapter, plan_fields};
use crate::config::GeneratorOptions;
use crate::error::CodegenError;
use crate::language::{Format, Language};
use crate::registry::RUST_MAPPING;
use crate::resolve::IndirectionStrategy;
use modelgen_schema::ir::{to_pascal_case, to_snake_case};
use modelgen_schema::{Model, PrimitiveKind, SchemaIr};
use std::collections::BTreeSet;

/// Keywords usable as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers; these get a trailing underscore.
const PLAIN_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Names the generated file defines or takes from the prelude and imports.
const RESERVED_TYPES: &[&str] = &[
    "HexBytes",
    "Option",
    "Vec",
    "String",
    "Box",
    "Result",
    "Serialize",
    "Deserialize",
];

/// Adapter emitting Rust.
pub struct RustAdapter<'a> {
    ir: &'a SchemaIr,
    options: &'a GeneratorOptions,
}

impl<'a> RustAdapter<'a> {
    /// Creates a new Rust adapter.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, options: &'a GeneratorOptions) -> Self {
        Self { ir, options }
    }

    fn plan<'m>(&self, model: &'m Model) -> Result<Vec<FieldPlan<'m>>, CodegenError> {
        plan_fields(self, self.ir, &RUST_MAPPING, model)
    }
}

/// Strips the raw identifier prefix, giving the name serde sees.
pub(crate) fn serde_name(member: &str) -> &str {
    member.strip_prefix("r#").unwrap_or(member)
}

impl LanguageAdapter for RustAdapter<'_> {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn indirection(&self) -> IndirectionStrategy {
        IndirectionStrategy::Boxed
    }

    fn type_name(&self, model: &str) -> String {
        let name = to_pascal_case(model);
        if name.is_empty() || name == "Self" {
            format!("{name}_")
        } else {
            name
        }
    }

    fn field_name(&self, field: &str) -> String {
        let name = to_snake_case(field);
        if PLAIN_KEYWORDS.contains(&name.as_str()) {
            format!("{name}_")
        } else if RAW_KEYWORDS.contains(&name.as_str()) {
            format!("r#{name}")
        } else {
            name
        }
    }

    fn reserved_type_names(&self) -> &'static [&'static str] {
        RESERVED_TYPES
    }

    fn generate_prelude(&self, models: &[&Model]) -> Result<String, CodegenError> {
        let mut imports = BTreeSet::new();
        let mut needs_hex = false;
        for model in models {
            for plan in self.plan(model)? {
                imports.extend(plan.native.imports.iter().copied());
                needs_hex |= plan.shape.contains_primitive(PrimitiveKind::Bytes);
            }
        }

        let mut output = String::new();
        output.push_str("// Generated by modelgen. Do not edit.\n");
        output.push_str("//\n");
        output.push_str(
            "// Requires serde (derive), serde_json, serde_yaml and quick-xml (serialize).\n\n",
        );
        output.push_str("use serde::{Deserialize, Serialize};\n");
        for import in imports {
            output.push_str(&format!("use {};\n", import));
        }
        output.push('\n');

        if needs_hex {
            output.push_str(support::HEX_BYTES);
            output.push('\n');
        }
        Ok(output)
    }

    fn generate_structure(&self, model: &Model) -> Result<String, CodegenError> {
        let plans = self.plan(model)?;
        Ok(StructGenerator::new(self.options).generate(
            model,
            &self.type_name(&model.name),
            &plans,
        ))
    }

    fn generate_serializer(&self, model: &Model, format: Format) -> Result<String, CodegenError> {
        FormatGenerator::new(&self.type_name(&model.name))
            .xml_namespace(self.options.target_namespace())
            .serializer(model, format)
    }

    fn generate_deserializer(
        &self,
        model: &Model,
        format: Format,
    ) -> Result<String, CodegenError> {
        FormatGenerator::new(&self.type_name(&model.name)).deserializer(model, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_schema::{FieldType, ModelSet};

    fn adapter_over(ir: &SchemaIr, options: &GeneratorOptions) -> String {
        let adapter = RustAdapter::new(ir, options);
        let models: Vec<&Model> = ir.models().iter().collect();
        let mut output = adapter.generate_prelude(&models).expect("prelude");
        for model in &models {
            output.push_str(&adapter.generate_structure(model).expect("structure"));
        }
        output
    }

    #[test]
    fn test_field_names() {
        let ir = SchemaIr::new(ModelSet::new()).expect("valid IR");
        let options = GeneratorOptions::default();
        let adapter = RustAdapter::new(&ir, &options);
        assert_eq!(adapter.field_name("firstName"), "first_name");
        assert_eq!(adapter.field_name("type"), "r#type");
        assert_eq!(adapter.field_name("self"), "self_");
        assert_eq!(adapter.field_name("_"), "__");
        assert_eq!(adapter.type_name("line_item"), "LineItem");
        assert_eq!(adapter.type_name("self"), "Self_");
        assert_eq!(serde_name("r#type"), "type");
    }

    #[test]
    fn test_hex_bytes_only_when_used() {
        let options = GeneratorOptions::default();
        let plain = SchemaIr::new(
            ModelSet::new().with_model(Model::new("Point").with_field("x", PrimitiveKind::I32.into())),
        )
        .expect("valid IR");
        assert!(!adapter_over(&plain, &options).contains("struct HexBytes"));

        let blob = SchemaIr::new(ModelSet::new().with_model(
            Model::new("Blob").with_field("data", FieldType::optional(PrimitiveKind::Bytes.into())),
        ))
        .expect("valid IR");
        let output = adapter_over(&blob, &options);
        assert!(output.contains("pub struct HexBytes(pub Vec<u8>);"));
        assert!(output.contains("pub data: Option<HexBytes>,"));
    }

    #[test]
    fn test_self_reference_is_boxed() {
        let ir = SchemaIr::new(ModelSet::new().with_model(
            Model::new("Node")
                .with_field("next", FieldType::optional(FieldType::reference("Node")))
                .with_field("children", FieldType::list(FieldType::reference("Node"))),
        ))
        .expect("valid IR");
        let options = GeneratorOptions::default();
        let output = adapter_over(&ir, &options);
        assert!(output.contains("pub next: Option<Box<Node>>,"));
        assert!(output.contains("pub children: Vec<Node>,"));
    }
}
