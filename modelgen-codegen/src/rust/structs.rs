//! Rust structure generation.

use super::serde_name;
use crate::adapter::{FieldPlan, doc_lines};
use crate::config::GeneratorOptions;
use crate::resolve::Shape;
use modelgen_schema::Model;

/// Generator for serde-derived structs.
pub struct StructGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generates the struct for one model.
    #[must_use]
    pub fn generate(&self, model: &Model, type_name: &str, fields: &[FieldPlan<'_>]) -> String {
        let mut output = String::new();

        if self.options.docs_enabled() {
            if let Some(doc) = &model.doc {
                output.push_str(&doc_lines(doc, "/// "));
            }
        }
        output.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        if serde_name(type_name) != model.name {
            output.push_str(&format!("#[serde(rename = \"{}\")]\n", model.name));
        }
        output.push_str(&format!("pub struct {} {{\n", type_name));

        for plan in fields {
            output.push_str(&self.generate_field(plan));
        }

        output.push_str("}\n\n");
        output
    }

    fn generate_field(&self, plan: &FieldPlan<'_>) -> String {
        let mut output = String::new();

        if self.options.docs_enabled() {
            if let Some(doc) = &plan.field.doc {
                output.push_str(&doc_lines(doc, "    /// "));
            }
        }
        if serde_name(&plan.member) != plan.wire_name() {
            output.push_str(&format!("    #[serde(rename = \"{}\")]\n", plan.wire_name()));
        }
        match plan.shape {
            Shape::Optional(_) => output.push_str(
                "    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n",
            ),
            Shape::List(_) => output.push_str("    #[serde(default)]\n"),
            Shape::Primitive(_) | Shape::Model { .. } => {}
        }
        output.push_str(&format!("    pub {}: {},\n", plan.member, plan.native.text));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::LanguageAdapter;
    use crate::rust::RustAdapter;
    use modelgen_schema::{Field, FieldType, ModelSet, PrimitiveKind, SchemaIr};

    fn person() -> SchemaIr {
        let set = ModelSet::new().with_model(
            Model::new("Person")
                .with_doc("A person.")
                .with_field("name", PrimitiveKind::String.into())
                .with_field("age", PrimitiveKind::I32.into())
                .with_field("tags", FieldType::list(PrimitiveKind::String.into()))
                .with_field("nickname", FieldType::optional(PrimitiveKind::String.into())),
        );
        SchemaIr::new(set).expect("valid IR")
    }

    #[test]
    fn test_person_struct() {
        let ir = person();
        let options = GeneratorOptions::default();
        let adapter = RustAdapter::new(&ir, &options);
        let code = adapter
            .generate_structure(ir.get_model("Person").expect("model"))
            .expect("structure");

        assert!(code.starts_with("/// A person.\n"));
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]"));
        assert!(code.contains("pub struct Person {"));
        assert!(code.contains("    pub name: String,\n    pub age: i32,\n"));
        assert!(code.contains("    #[serde(default)]\n    pub tags: Vec<String>,"));
        assert!(code.contains(
            "    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub nickname: Option<String>,"
        ));
        assert!(!code.contains("rename"));
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let ir = person();
        let options = GeneratorOptions::default();
        let code = RustAdapter::new(&ir, &options)
            .generate_structure(ir.get_model("Person").expect("model"))
            .expect("structure");
        let positions: Vec<usize> = ["pub name", "pub age", "pub tags", "pub nickname"]
            .iter()
            .map(|needle| code.find(needle).expect("field present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_renamed_members_keep_wire_names() {
        let mut model = Model::new("order_entry");
        model.add_field(Field::new("orderId", PrimitiveKind::U64.into()).with_doc("Exchange id."));
        model.add_field(Field::new("type", PrimitiveKind::String.into()));
        model.add_field(Field::new("self", PrimitiveKind::Bool.into()));
        let ir = SchemaIr::new(ModelSet::new().with_model(model)).expect("valid IR");

        let options = GeneratorOptions::default();
        let code = RustAdapter::new(&ir, &options)
            .generate_structure(ir.get_model("order_entry").expect("model"))
            .expect("structure");

        assert!(code.contains("#[serde(rename = \"order_entry\")]\npub struct OrderEntry {"));
        assert!(code.contains(
            "    /// Exchange id.\n    #[serde(rename = \"orderId\")]\n    pub order_id: u64,"
        ));
        // serde strips the raw prefix on its own.
        assert!(code.contains("    pub r#type: String,"));
        assert!(!code.contains("rename = \"type\""));
        assert!(code.contains("    #[serde(rename = \"self\")]\n    pub self_: bool,"));
    }

    #[test]
    fn test_docs_can_be_disabled() {
        let ir = person();
        let options = GeneratorOptions::new().emit_docs(false);
        let code = RustAdapter::new(&ir, &options)
            .generate_structure(ir.get_model("Person").expect("model"))
            .expect("structure");
        assert!(!code.contains("///"));
    }
}
