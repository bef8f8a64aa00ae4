//! yaml-cpp routines.
//!
//! Scalars are written and read as text through `modelgen_detail` so that
//! 8-bit integers are never treated as characters and floats keep full
//! precision.

use super::{native, unused};
use crate::adapter::FieldPlan;
use crate::error::CodegenError;
use crate::resolve::Shape;
use modelgen_schema::PrimitiveKind;

/// Declarations of both routines for one struct.
#[must_use]
pub fn prototypes(type_name: &str) -> String {
    format!(
        "inline void to_yaml(YAML::Node& node, const {0}& value);\n\
         inline void from_yaml(const YAML::Node& node, {0}& value);\n",
        type_name
    )
}

/// Generates `to_yaml`, filling a map node.
///
/// # Errors
/// Returns `CodegenError` if a nested shape cannot be spelled.
pub fn serializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void to_yaml(YAML::Node& node, const {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["node", "value"]));
    }

    for plan in fields {
        let member = format!("value.{}", plan.member);
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!("    if ({}) {{\n", member));
                output.push_str(&format!(
                    "        node[\"{}\"] = {};\n",
                    plan.wire_name(),
                    encode(inner, &format!("*{member}"), 0)?
                ));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!(
                "    node[\"{}\"] = {};\n",
                plan.wire_name(),
                encode(shape, &member, 0)?
            )),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Generates `from_yaml`.
///
/// # Errors
/// Returns `CodegenError` if a nested shape cannot be spelled.
pub fn deserializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void from_yaml(const YAML::Node& node, {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["node", "value"]));
    }

    for plan in fields {
        let member = format!("value.{}", plan.member);
        let key = plan.wire_name();
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!(
                    "    if (const YAML::Node child = node[\"{}\"]; child && !child.IsNull()) {{\n",
                    key
                ));
                output.push_str(&format!("        {} = {};\n", member, decode(inner, "child", 0)?));
                output.push_str("    } else {\n");
                output.push_str(&format!("        {}.reset();\n", member));
                output.push_str("    }\n");
            }
            shape @ Shape::List(_) => {
                output.push_str(&format!(
                    "    if (const YAML::Node child = node[\"{}\"]; child) {{\n",
                    key
                ));
                output.push_str(&format!("        {} = {};\n", member, decode(shape, "child", 0)?));
                output.push_str("    } else {\n");
                output.push_str(&format!("        {}.clear();\n", member));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!(
                "    {} = {};\n",
                member,
                decode(shape, &format!("node[\"{key}\"]"), 0)?
            )),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Expression converting `expr` to a `YAML::Node`.
fn encode(shape: &Shape, expr: &str, depth: usize) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => {
            format!("YAML::Node(::modelgen_detail::to_hex({expr}))")
        }
        Shape::Primitive(_) => format!("YAML::Node(::modelgen_detail::format_value({expr}))"),
        Shape::Model { indirect: false, .. } => {
            format!("::modelgen_detail::to_yaml_node({expr})")
        }
        Shape::Model { indirect: true, .. } => {
            format!("::modelgen_detail::to_yaml_node(::modelgen_detail::deref({expr}))")
        }
        Shape::Optional(inner) => format!(
            "({expr} ? {} : YAML::Node(YAML::NodeType::Null))",
            encode(inner, &format!("*{expr}"), depth)?
        ),
        Shape::List(inner) => {
            let item = format!("item{depth}");
            let items = format!("items{depth}");
            format!(
                "[&] {{ YAML::Node {items}(YAML::NodeType::Sequence); \
                 for (const auto& {item} : {expr}) {{ {items}.push_back({}); }} \
                 return {items}; }}()",
                encode(inner, &item, depth + 1)?
            )
        }
    })
}

/// Expression converting the node `expr` to the shape's native type.
fn decode(shape: &Shape, expr: &str, depth: usize) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => {
            format!("::modelgen_detail::from_hex({expr}.Scalar())")
        }
        Shape::Primitive(_) => format!(
            "::modelgen_detail::parse_value<{}>({expr}.Scalar())",
            native(shape)?
        ),
        Shape::Model {
            native: name,
            indirect: false,
            ..
        } => format!("::modelgen_detail::from_yaml_node<{name}>({expr})"),
        Shape::Model {
            native: name,
            indirect: true,
            ..
        } => format!("std::make_shared<{name}>(::modelgen_detail::from_yaml_node<{name}>({expr}))"),
        Shape::Optional(inner) => {
            let optional = native(shape)?;
            format!(
                "({expr}.IsNull() ? {optional}() : {optional}({}))",
                decode(inner, expr, depth)?
            )
        }
        Shape::List(inner) => {
            let item = format!("item{depth}");
            let items = format!("items{depth}");
            format!(
                "[&] {{ {} {items}; for (const auto& {item} : {expr}) {{ {items}.push_back({}); }} \
                 return {items}; }}()",
                native(shape)?,
                decode(inner, &item, depth + 1)?
            )
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::LanguageAdapter;
    use crate::config::GeneratorOptions;
    use crate::cpp::CppAdapter;
    use crate::language::Format;
    use modelgen_schema::{FieldType, Model, ModelSet, SchemaIr};

    fn ir() -> SchemaIr {
        let set = ModelSet::new().with_model(
            Model::new("Reading")
                .with_field("sensor", PrimitiveKind::I8.into())
                .with_field("value", PrimitiveKind::F64.into())
                .with_field("note", FieldType::optional(PrimitiveKind::String.into()))
                .with_field("samples", FieldType::list(PrimitiveKind::U16.into())),
        );
        SchemaIr::new(set).expect("valid IR")
    }

    #[test]
    fn test_to_yaml() {
        let ir = ir();
        let options = GeneratorOptions::default();
        let code = CppAdapter::new(&ir, &options)
            .generate_serializer(ir.get_model("Reading").expect("model"), Format::Yaml)
            .expect("serializer");

        assert!(code.contains("inline void to_yaml(YAML::Node& node, const Reading& value) {"));
        assert!(code.contains(
            "    node[\"sensor\"] = YAML::Node(::modelgen_detail::format_value(value.sensor));"
        ));
        assert!(code.contains("    if (value.note) {\n        node[\"note\"] ="));
        assert!(code.contains("YAML::Node items0(YAML::NodeType::Sequence);"));
    }

    #[test]
    fn test_from_yaml() {
        let ir = ir();
        let options = GeneratorOptions::default();
        let code = CppAdapter::new(&ir, &options)
            .generate_deserializer(ir.get_model("Reading").expect("model"), Format::Yaml)
            .expect("deserializer");

        assert!(code.contains(
            "    value.sensor = ::modelgen_detail::parse_value<std::int8_t>(node[\"sensor\"].Scalar());"
        ));
        assert!(code.contains(
            "    value.value = ::modelgen_detail::parse_value<double>(node[\"value\"].Scalar());"
        ));
        assert!(code.contains("child && !child.IsNull()) {\n        value.note ="));
        assert!(code.contains("        value.note.reset();"));
        assert!(code.contains("        value.samples.clear();"));
    }

    #[test]
    fn test_nested_models() {
        let shape = Shape::List(Box::new(Shape::Model {
            model: "Tag".to_string(),
            native: "Tag".to_string(),
            indirect: false,
        }));
        assert!(encode(&shape, "value.tags", 0)
            .expect("encoded")
            .contains("items0.push_back(::modelgen_detail::to_yaml_node(item0));"));
        assert!(decode(&shape, "child", 0)
            .expect("decoded")
            .contains("items0.push_back(::modelgen_detail::from_yaml_node<Tag>(item0));"));
    }

    #[test]
    fn test_null_list_elements() {
        let shape = Shape::List(Box::new(Shape::Optional(Box::new(Shape::Primitive(
            PrimitiveKind::Bool,
        )))));
        let encoded = encode(&shape, "value.flags", 0).expect("encoded");
        assert!(encoded.contains("YAML::Node(YAML::NodeType::Null)"));
        let decoded = decode(&shape, "child", 0).expect("decoded");
        assert!(decoded.contains("item0.IsNull() ? std::optional<bool>()"));
    }
}
