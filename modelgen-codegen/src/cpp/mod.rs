//! C++17 code generation (nlohmann/json, yaml-cpp, rapidxml).
//!
//! Output is a single header. Shared helpers live in `modelgen_detail` behind
//! an include guard so several generated headers can be included together.

pub mod json;
pub mod structs;
pub mod support;
pub mod xml;
pub mod yaml;

pub use structs::StructGenerator;

use crate::adapter::{FieldPlan, LanguageAdapter, plan_fields};
use crate::config::GeneratorOptions;
use crate::error::CodegenError;
use crate::language::{Format, Language};
use crate::registry::CPP_MAPPING;
use crate::resolve::{IndirectionStrategy, Shape, check_representable};
use modelgen_schema::{Model, SchemaIr};
use std::collections::BTreeSet;

/// C++17 keywords and alternative tokens.
const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Namespaces the generated header refers to and the free functions it
/// defines next to every struct.
const RESERVED_TYPES: &[&str] = &[
    "modelgen_detail",
    "std",
    "nlohmann",
    "YAML",
    "rapidxml",
    "to_json",
    "from_json",
    "to_yaml",
    "from_yaml",
    "to_xml",
    "from_xml",
    "to_xml_string",
    "to_xml_file",
];

/// Headers every generated file includes after the standard ones.
const LIBRARY_INCLUDES: &[&str] = &[
    "<nlohmann/json.hpp>",
    "<yaml-cpp/yaml.h>",
    "<rapidxml/rapidxml.hpp>",
];

/// Adapter emitting a C++17 header.
pub struct CppAdapter<'a> {
    ir: &'a SchemaIr,
    options: &'a GeneratorOptions,
}

impl<'a> CppAdapter<'a> {
    /// Creates a new C++ adapter.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, options: &'a GeneratorOptions) -> Self {
        Self { ir, options }
    }

    fn plan<'m>(&self, model: &'m Model) -> Result<Vec<FieldPlan<'m>>, CodegenError> {
        plan_fields(self, self.ir, &CPP_MAPPING, model)
    }

    fn check(&self, model: &Model, format: Format) -> Result<(), CodegenError> {
        let target = format!("{}/{}", Language::Cpp, format);
        model
            .fields
            .iter()
            .try_for_each(|field| check_representable(model, field, Some(format), &target))
    }
}

/// Spells a nested shape for use inside generated expressions.
pub(crate) fn native(shape: &Shape) -> Result<String, CodegenError> {
    CPP_MAPPING.spell(shape).map(|n| n.text).map_err(|kind| {
        CodegenError::generation(format!("no C++ spelling for primitive '{kind}'"))
    })
}

/// Statement silencing unused-parameter warnings for field-less models.
pub(crate) fn unused(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("    (void){};\n", name))
        .collect()
}

impl LanguageAdapter for CppAdapter<'_> {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn indirection(&self) -> IndirectionStrategy {
        IndirectionStrategy::SharedPointer
    }

    fn type_name(&self, model: &str) -> String {
        if KEYWORDS.contains(&model) {
            format!("{model}_")
        } else {
            model.to_string()
        }
    }

    fn field_name(&self, field: &str) -> String {
        // A member named after a type in scope changes that name's meaning.
        if KEYWORDS.contains(&field) || self.ir.get_model(field).is_some() {
            format!("{field}_")
        } else {
            field.to_string()
        }
    }

    fn reserved_type_names(&self) -> &'static [&'static str] {
        RESERVED_TYPES
    }

    fn orders_by_dependency(&self) -> bool {
        true
    }

    fn generate_prelude(&self, models: &[&Model]) -> Result<String, CodegenError> {
        let mut includes: BTreeSet<&str> = support::STANDARD_INCLUDES.iter().copied().collect();
        for model in models {
            for plan in self.plan(model)? {
                includes.extend(plan.native.imports.iter().copied());
            }
        }

        let mut output = String::new();
        output.push_str("// Generated by modelgen. Do not edit.\n");
        output.push_str("//\n");
        output.push_str("// Requires C++17, nlohmann/json, yaml-cpp and rapidxml.\n\n");
        output.push_str("#pragma once\n\n");
        for include in includes {
            output.push_str(&format!("#include {}\n", include));
        }
        output.push('\n');
        for include in LIBRARY_INCLUDES {
            output.push_str(&format!("#include {}\n", include));
        }
        output.push('\n');
        output.push_str(support::DETAIL);
        output.push('\n');

        if let Some(namespace) = self.options.namespace() {
            output.push_str(&format!("namespace {} {{\n\n", namespace));
        }
        Ok(output)
    }

    fn generate_structure_header(&self, models: &[&Model]) -> Result<String, CodegenError> {
        Ok(StructGenerator::new(self.options).forward_declarations(self, self.ir, models))
    }

    fn generate_structure(&self, model: &Model) -> Result<String, CodegenError> {
        let plans = self.plan(model)?;
        Ok(StructGenerator::new(self.options).generate(model, &self.type_name(&model.name), &plans))
    }

    fn generate_structure_footer(&self, models: &[&Model]) -> Result<String, CodegenError> {
        let mut output = String::new();
        for model in models {
            let plans = self.plan(model)?;
            output.push_str(&structs::equality(&self.type_name(&model.name), &plans));
        }
        Ok(output)
    }

    fn generate_format_header(
        &self,
        models: &[&Model],
        format: Format,
    ) -> Result<String, CodegenError> {
        let mut output = String::new();
        for model in models {
            let name = self.type_name(&model.name);
            let prototypes = match format {
                Format::Json => json::prototypes(&name),
                Format::Yaml => yaml::prototypes(&name),
                Format::Xml => xml::prototypes(&name),
            };
            output.push_str(&prototypes);
        }
        output.push('\n');
        Ok(output)
    }

    fn generate_serializer(&self, model: &Model, format: Format) -> Result<String, CodegenError> {
        self.check(model, format)?;
        let plans = self.plan(model)?;
        let name = self.type_name(&model.name);
        match format {
            Format::Json => json::serializer(&name, &plans),
            Format::Yaml => yaml::serializer(&name, &plans),
            Format::Xml => Ok(xml::serializer(&name, &plans)?
                + &xml::document_writers(&name, &model.name, self.options.target_namespace())),
        }
    }

    fn generate_deserializer(
        &self,
        model: &Model,
        format: Format,
    ) -> Result<String, CodegenError> {
        self.check(model, format)?;
        let plans = self.plan(model)?;
        let name = self.type_name(&model.name);
        match format {
            Format::Json => json::deserializer(&name, &plans),
            Format::Yaml => yaml::deserializer(&name, &plans),
            Format::Xml => xml::deserializer(&name, &plans),
        }
    }

    fn generate_epilogue(&self) -> String {
        match self.options.namespace() {
            Some(namespace) => format!("}}  // namespace {}\n", namespace),
            None => String::new(),
        }
    }
}
