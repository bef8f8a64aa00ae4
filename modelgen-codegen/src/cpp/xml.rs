//! rapidxml routines.
//!
//! Every field becomes a child element named after the field, appended in
//! declaration order. Lists are runs of sibling elements with the same name;
//! optionals are simply missing when absent. The root element carries the
//! XSD target namespace as its default `xmlns` when one is configured.

use super::{native, unused};
use crate::adapter::FieldPlan;
use crate::error::CodegenError;
use crate::resolve::Shape;
use modelgen_schema::PrimitiveKind;

/// Declarations of both routines for one struct.
#[must_use]
pub fn prototypes(type_name: &str) -> String {
    format!(
        "inline void to_xml(rapidxml::xml_document<>& doc, rapidxml::xml_node<>* node, const {0}& value);\n\
         inline void from_xml(const rapidxml::xml_node<>* node, {0}& value);\n",
        type_name
    )
}

/// Generates `to_xml`, appending one child per field to `node`.
///
/// # Errors
/// Returns `CodegenError::Generation` for shapes the representability check
/// should already have rejected.
pub fn serializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void to_xml(rapidxml::xml_document<>& doc, rapidxml::xml_node<>* node, const {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["doc", "node", "value"]));
    }

    for plan in fields {
        let member = format!("value.{}", plan.member);
        let name = plan.wire_name();
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!("    if ({}) {{\n", member));
                output.push_str(&format!(
                    "        {}\n",
                    put(inner, &format!("*{member}"), name)?
                ));
                output.push_str("    }\n");
            }
            Shape::List(inner) => {
                output.push_str(&format!("    for (const auto& item : {}) {{\n", member));
                output.push_str(&format!("        {}\n", put(inner, "item", name)?));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!("    {}\n", put(shape, &member, name)?)),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Generates `from_xml`.
///
/// # Errors
/// Returns `CodegenError::Generation` for shapes the representability check
/// should already have rejected.
pub fn deserializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void from_xml(const rapidxml::xml_node<>* node, {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["node", "value"]));
    }

    for plan in fields {
        let member = format!("value.{}", plan.member);
        let name = plan.wire_name();
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!(
                    "    if (const rapidxml::xml_node<>* child = node->first_node(\"{}\")) {{\n",
                    name
                ));
                output.push_str(&format!("        {} = {};\n", member, take(inner, "child")?));
                output.push_str("    } else {\n");
                output.push_str(&format!("        {}.reset();\n", member));
                output.push_str("    }\n");
            }
            Shape::List(inner) => {
                output.push_str(&format!("    {}.clear();\n", member));
                output.push_str(&format!(
                    "    for (const rapidxml::xml_node<>* child = node->first_node(\"{0}\"); child;\n         child = child->next_sibling(\"{0}\")) {{\n",
                    name
                ));
                output.push_str(&format!(
                    "        {}.push_back({});\n",
                    member,
                    take(inner, "child")?
                ));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!(
                "    {} = {};\n",
                member,
                take(
                    shape,
                    &format!("::modelgen_detail::require_child(node, \"{name}\")")
                )?
            )),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Generates the document entry points for one root struct: `to_xml_string`
/// and `to_xml_file` with the root element name and namespace filled in.
#[must_use]
pub fn document_writers(type_name: &str, root: &str, namespace: Option<&str>) -> String {
    let xmlns = namespace.map_or_else(|| "nullptr".to_string(), |ns| format!("\"{ns}\""));
    format!(
        "inline std::string to_xml_string(const {type_name}& value) {{\n\
         \x20   return ::modelgen_detail::to_xml_string(value, \"{root}\", {xmlns});\n\
         }}\n\n\
         inline void to_xml_file(const {type_name}& value, const std::string& path) {{\n\
         \x20   ::modelgen_detail::to_xml_file(value, \"{root}\", path, {xmlns});\n\
         }}\n\n"
    )
}

/// Statement appending `expr` as element `name`.
fn put(shape: &Shape, expr: &str, name: &str) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => format!(
            "::modelgen_detail::append_text(doc, node, \"{name}\", ::modelgen_detail::to_hex({expr}));"
        ),
        Shape::Primitive(_) => format!(
            "::modelgen_detail::append_text(doc, node, \"{name}\", ::modelgen_detail::format_value({expr}));"
        ),
        Shape::Model { indirect, .. } => {
            let value = if *indirect {
                format!("::modelgen_detail::deref({expr})")
            } else {
                expr.to_string()
            };
            format!(
                "to_xml(doc, ::modelgen_detail::append_element(doc, node, \"{name}\"), {value});"
            )
        }
        Shape::Optional(_) | Shape::List(_) => {
            return Err(CodegenError::generation(format!(
                "element '{name}' nests a list or optional, which XML cannot carry"
            )));
        }
    })
}

/// Expression reading the element `expr` as the shape's native type.
fn take(shape: &Shape, expr: &str) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => {
            format!("::modelgen_detail::from_hex(::modelgen_detail::text_of({expr}))")
        }
        Shape::Primitive(_) => format!(
            "::modelgen_detail::parse_value<{}>(::modelgen_detail::text_of({expr}))",
            native(shape)?
        ),
        Shape::Model {
            native: name,
            indirect: false,
            ..
        } => format!("::modelgen_detail::from_xml_node<{name}>({expr})"),
        Shape::Model {
            native: name,
            indirect: true,
            ..
        } => format!("std::make_shared<{name}>(::modelgen_detail::from_xml_node<{name}>({expr}))"),
        Shape::Optional(_) | Shape::List(_) => {
            return Err(CodegenError::generation(
                "nested list or optional reached the XML reader",
            ));
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
        let set = ModelSet::new()
            .with_model(
                Model::new("Point")
                    .with_field("x", PrimitiveKind::I32.into())
                    .with_field("y", PrimitiveKind::I32.into()),
            )
            .with_model(
                Model::new("Shape")
                    .with_field("origin", FieldType::reference("Point"))
                    .with_field("label", FieldType::optional(PrimitiveKind::String.into()))
                    .with_field("vertices", FieldType::list(FieldType::reference("Point")))
                    .with_field("blob", PrimitiveKind::Bytes.into()),
            );
        SchemaIr::new(set).expect("valid IR")
    }

    fn generate(model: &str, serializer: bool) -> String {
        let ir = ir();
        let options = GeneratorOptions::default();
        let adapter = CppAdapter::new(&ir, &options);
        let model = ir.get_model(model).expect("model");
        if serializer {
            adapter.generate_serializer(model, Format::Xml)
        } else {
            adapter.generate_deserializer(model, Format::Xml)
        }
        .expect("generated")
    }

    #[test]
    fn test_point_elements_in_field_order() {
        let code = generate("Point", true);
        let x = code.find("\"x\"").expect("x element");
        let y = code.find("\"y\"").expect("y element");
        assert!(x < y);
        assert!(code.contains(
            "    ::modelgen_detail::append_text(doc, node, \"x\", ::modelgen_detail::format_value(value.x));"
        ));
    }

    #[test]
    fn test_shape_serializer() {
        let code = generate("Shape", true);
        assert!(code.contains(
            "    to_xml(doc, ::modelgen_detail::append_element(doc, node, \"origin\"), value.origin);"
        ));
        assert!(code.contains("    if (value.label) {\n"));
        assert!(code.contains("    for (const auto& item : value.vertices) {\n"));
        assert!(code.contains("::modelgen_detail::to_hex(value.blob)"));
    }

    #[test]
    fn test_shape_deserializer() {
        let code = generate("Shape", false);
        assert!(code.contains(
            "    value.origin = ::modelgen_detail::from_xml_node<Point>(::modelgen_detail::require_child(node, \"origin\"));"
        ));
        assert!(code.contains("node->first_node(\"label\")) {"));
        assert!(code.contains("        value.label.reset();"));
        assert!(code.contains("    value.vertices.clear();"));
        assert!(code.contains("child = child->next_sibling(\"vertices\")) {"));
        assert!(code.contains("::modelgen_detail::from_hex(::modelgen_detail::text_of("));
    }

    #[test]
    fn test_document_writers() {
        let plain = document_writers("Point", "Point", None);
        assert!(plain.contains("inline std::string to_xml_string(const Point& value) {\n"));
        assert!(plain.contains(
            "    return ::modelgen_detail::to_xml_string(value, \"Point\", nullptr);\n"
        ));
        assert!(plain.contains(
            "    ::modelgen_detail::to_xml_file(value, \"Point\", path, nullptr);\n"
        ));

        let qualified = document_writers("union_", "union", Some("urn:acme:shapes"));
        assert!(qualified.contains("inline std::string to_xml_string(const union_& value) {"));
        assert!(qualified.contains(
            "to_xml_string(value, \"union\", \"urn:acme:shapes\");"
        ));
    }

    #[test]
    fn test_serializer_applies_target_namespace() {
        let ir = ir();
        let options = GeneratorOptions::new().xsd_target_namespace("urn:acme:shapes");
        let adapter = CppAdapter::new(&ir, &options);
        let code = adapter
            .generate_serializer(ir.get_model("Point").expect("model"), Format::Xml)
            .expect("serializer");
        assert!(code.contains(
            "return ::modelgen_detail::to_xml_string(value, \"Point\", \"urn:acme:shapes\");"
        ));
        assert!(generate("Point", true).contains("to_xml_string(value, \"Point\", nullptr);"));
    }

    #[test]
    fn test_nested_wrappers_are_refused() {
        let shape = Shape::Optional(Box::new(Shape::Primitive(PrimitiveKind::I32)));
        assert!(put(&shape, "item", "values").is_err());
        assert!(take(&shape, "child").is_err());
    }
}
