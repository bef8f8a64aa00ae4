//! C++ structure generation.

use crate::adapter::{FieldPlan, LanguageAdapter, doc_lines};
use crate::config::GeneratorOptions;
use modelgen_schema::{Model, SchemaIr};

/// Generator for plain aggregate structs.
pub struct StructGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// Forward declarations for every cycle participant among `models`.
    #[must_use]
    pub fn forward_declarations(
        &self,
        adapter: &dyn LanguageAdapter,
        ir: &SchemaIr,
        models: &[&Model],
    ) -> String {
        let mut output = String::new();
        for model in models {
            if ir.cycles().is_cycle_participant(&model.name) {
                output.push_str(&format!("struct {};\n", adapter.type_name(&model.name)));
            }
        }
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }

    /// Generates the struct for one model plus its equality declarations.
    #[must_use]
    pub fn generate(&self, model: &Model, type_name: &str, fields: &[FieldPlan<'_>]) -> String {
        let mut output = String::new();

        if self.options.docs_enabled() {
            if let Some(doc) = &model.doc {
                output.push_str(&doc_lines(doc, "/// "));
            }
        }
        output.push_str(&format!("struct {} {{\n", type_name));
        for plan in fields {
            if self.options.docs_enabled() {
                if let Some(doc) = &plan.field.doc {
                    output.push_str(&doc_lines(doc, "    /// "));
                }
            }
            output.push_str(&format!("    {} {}{{}};\n", plan.native.text, plan.member));
        }
        output.push_str("};\n\n");

        output.push_str(&format!(
            "inline bool operator==(const {0}& lhs, const {0}& rhs);\n",
            type_name
        ));
        output.push_str(&format!(
            "inline bool operator!=(const {0}& lhs, const {0}& rhs);\n\n",
            type_name
        ));
        output
    }
}

/// Out-of-line equality for one model, comparing members through
/// `modelgen_detail::deep_equal`.
#[must_use]
pub fn equality(type_name: &str, fields: &[FieldPlan<'_>]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "inline bool operator==(const {0}& lhs, const {0}& rhs) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&super::unused(&["lhs", "rhs"]));
        output.push_str("    return true;\n");
    } else {
        let terms: Vec<String> = fields
            .iter()
            .map(|plan| {
                format!(
                    "::modelgen_detail::deep_equal(lhs.{0}, rhs.{0})",
                    plan.member
                )
            })
            .collect();
        output.push_str(&format!("    return {};\n", terms.join("\n        && ")));
    }
    output.push_str("}\n\n");

    output.push_str(&format!(
        "inline bool operator!=(const {0}& lhs, const {0}& rhs) {{\n",
        type_name
    ));
    output.push_str("    return !(lhs == rhs);\n");
    output.push_str("}\n\n");
    output
}
