//! nlohmann/json routines.
//!
//! `to_json`/`from_json` are found by nlohmann's ADL lookup, so nested
//! models go through `nlohmann::json(value)` and `.get<T>()`. Scalars are read
//! through `modelgen_detail::json_value`, which range-checks narrow integers.

use super::{native, unused};
use crate::adapter::FieldPlan;
use crate::error::CodegenError;
use crate::resolve::Shape;
use modelgen_schema::PrimitiveKind;

/// Declarations of both routines for one struct.
#[must_use]
pub fn prototypes(type_name: &str) -> String {
    format!(
        "inline void to_json(nlohmann::json& j, const {0}& value);\n\
         inline void from_json(const nlohmann::json& j, {0}& value);\n",
        type_name
    )
}

/// Generates `to_json`.
///
/// # Errors
/// Returns `CodegenError` if a nested shape cannot be spelled.
pub fn serializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void to_json(nlohmann::json& j, const {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["value"]));
    }
    output.push_str("    j = nlohmann::json::object();\n");

    for plan in fields {
        let member = format!("value.{}", plan.member);
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!("    if ({}) {{\n", member));
                output.push_str(&format!(
                    "        j[\"{}\"] = {};\n",
                    plan.wire_name(),
                    encode(inner, &format!("*{member}"), 0)?
                ));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!(
                "    j[\"{}\"] = {};\n",
                plan.wire_name(),
                encode(shape, &member, 0)?
            )),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Generates `from_json`.
///
/// An absent or null key leaves an optional member empty; an absent list
/// becomes an empty vector; a missing required key throws from `at`.
///
/// # Errors
/// Returns `CodegenError` if a nested shape cannot be spelled.
pub fn deserializer(type_name: &str, fields: &[FieldPlan<'_>]) -> Result<String, CodegenError> {
    let mut output = String::new();
    output.push_str(&format!(
        "inline void from_json(const nlohmann::json& j, {}& value) {{\n",
        type_name
    ));
    if fields.is_empty() {
        output.push_str(&unused(&["j", "value"]));
    }

    for plan in fields {
        let member = format!("value.{}", plan.member);
        let key = plan.wire_name();
        match &plan.shape {
            Shape::Optional(inner) => {
                output.push_str(&format!(
                    "    if (const auto it = j.find(\"{}\"); it != j.end() && !it->is_null()) {{\n",
                    key
                ));
                output.push_str(&format!("        {} = {};\n", member, decode(inner, "(*it)", 0)?));
                output.push_str("    } else {\n");
                output.push_str(&format!("        {}.reset();\n", member));
                output.push_str("    }\n");
            }
            shape @ Shape::List(_) => {
                output.push_str(&format!(
                    "    if (const auto it = j.find(\"{}\"); it != j.end()) {{\n",
                    key
                ));
                output.push_str(&format!("        {} = {};\n", member, decode(shape, "(*it)", 0)?));
                output.push_str("    } else {\n");
                output.push_str(&format!("        {}.clear();\n", member));
                output.push_str("    }\n");
            }
            shape => output.push_str(&format!(
                "    {} = {};\n",
                member,
                decode(shape, &format!("j.at(\"{key}\")"), 0)?
            )),
        }
    }

    output.push_str("}\n\n");
    Ok(output)
}

/// Expression converting `expr` (of the shape's native type) to JSON.
fn encode(shape: &Shape, expr: &str, depth: usize) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => {
            format!("nlohmann::json(::modelgen_detail::to_hex({expr}))")
        }
        Shape::Primitive(_) => format!("nlohmann::json({expr})"),
        Shape::Model { indirect: false, .. } => format!("nlohmann::json({expr})"),
        Shape::Model { indirect: true, .. } => {
            format!("nlohmann::json(::modelgen_detail::deref({expr}))")
        }
        Shape::Optional(inner) => format!(
            "({expr} ? {} : nlohmann::json(nullptr))",
            encode(inner, &format!("*{expr}"), depth)?
        ),
        Shape::List(inner) => {
            let item = format!("item{depth}");
            let items = format!("items{depth}");
            format!(
                "[&] {{ nlohmann::json {items} = nlohmann::json::array(); \
                 for (const auto& {item} : {expr}) {{ {items}.push_back({}); }} \
                 return {items}; }}()",
                encode(inner, &item, depth + 1)?
            )
        }
    })
}

/// Expression converting the JSON value `expr` to the shape's native type.
fn decode(shape: &Shape, expr: &str, depth: usize) -> Result<String, CodegenError> {
    Ok(match shape {
        Shape::Primitive(PrimitiveKind::Bytes) => {
            format!("::modelgen_detail::from_hex({expr}.get<std::string>())")
        }
        Shape::Primitive(_) => {
            format!("::modelgen_detail::json_value<{}>({expr})", native(shape)?)
        }
        Shape::Model { indirect: false, .. } => format!("{expr}.get<{}>()", native(shape)?),
        Shape::Model {
            native: name,
            indirect: true,
            ..
        } => format!("std::make_shared<{name}>({expr}.get<{name}>())"),
        Shape::Optional(inner) => {
            let optional = native(shape)?;
            format!(
                "({expr}.is_null() ? {optional}() : {optional}({}))",
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
    use crate::cpp::CppAdapter;
    use crate::config::GeneratorOptions;
    use crate::language::Format;
    use modelgen_schema::{FieldType, Model, ModelSet, SchemaIr};

    fn person() -> SchemaIr {
        let set = ModelSet::new().with_model(
            Model::new("Person")
                .with_field("name", PrimitiveKind::String.into())
                .with_field("age", PrimitiveKind::I32.into())
                .with_field("tags", FieldType::list(PrimitiveKind::String.into()))
                .with_field("nickname", FieldType::optional(PrimitiveKind::String.into())),
        );
        SchemaIr::new(set).expect("valid IR")
    }

    #[test]
    fn test_person_to_json() {
        let ir = person();
        let options = GeneratorOptions::default();
        let adapter = CppAdapter::new(&ir, &options);
        let code = adapter
            .generate_serializer(ir.get_model("Person").expect("model"), Format::Json)
            .expect("serializer");

        assert!(code.contains("inline void to_json(nlohmann::json& j, const Person& value) {"));
        assert!(code.contains("    j[\"name\"] = nlohmann::json(value.name);"));
        assert!(code.contains("    j[\"age\"] = nlohmann::json(value.age);"));
        assert!(code.contains("for (const auto& item0 : value.tags) { items0.push_back(nlohmann::json(item0)); }"));
        // Absent optionals leave no key behind.
        assert!(code.contains(
            "    if (value.nickname) {\n        j[\"nickname\"] = nlohmann::json(*value.nickname);\n    }"
        ));
    }

    #[test]
    fn test_person_from_json() {
        let ir = person();
        let options = GeneratorOptions::default();
        let adapter = CppAdapter::new(&ir, &options);
        let code = adapter
            .generate_deserializer(ir.get_model("Person").expect("model"), Format::Json)
            .expect("deserializer");

        assert!(code.contains("inline void from_json(const nlohmann::json& j, Person& value) {"));
        assert!(code.contains(
            "    value.name = ::modelgen_detail::json_value<std::string>(j.at(\"name\"));"
        ));
        assert!(code.contains(
            "    value.age = ::modelgen_detail::json_value<std::int32_t>(j.at(\"age\"));"
        ));
        assert!(code.contains("it != j.end() && !it->is_null()) {\n        value.nickname = ::modelgen_detail::json_value<std::string>((*it));"));
        assert!(code.contains("        value.nickname.reset();"));
        assert!(code.contains("        value.tags.clear();"));
    }

    #[test]
    fn test_nested_shapes() {
        let shape = Shape::List(Box::new(Shape::Optional(Box::new(Shape::Primitive(
            PrimitiveKind::Bytes,
        )))));
        let encoded = encode(&shape, "value.blobs", 0).expect("encoded");
        assert!(encoded.contains(
            "(item0 ? nlohmann::json(::modelgen_detail::to_hex(*item0)) : nlohmann::json(nullptr))"
        ));

        let decoded = decode(&shape, "(*it)", 0).expect("decoded");
        assert!(decoded.starts_with("[&] { std::vector<std::optional<std::vector<std::uint8_t>>> items0;"));
        assert!(decoded.contains(
            "(item0.is_null() ? std::optional<std::vector<std::uint8_t>>() : std::optional<std::vector<std::uint8_t>>(::modelgen_detail::from_hex(item0.get<std::string>())))"
        ));
    }

    #[test]
    fn test_indirect_reference() {
        let shape = Shape::Model {
            model: "Node".to_string(),
            native: "Node".to_string(),
            indirect: true,
        };
        assert_eq!(
            encode(&shape, "value.next", 0).expect("encoded"),
            "nlohmann::json(::modelgen_detail::deref(value.next))"
        );
        assert_eq!(
            decode(&shape, "j.at(\"next\")", 0).expect("decoded"),
            "std::make_shared<Node>(j.at(\"next\").get<Node>())"
        );
    }

    #[test]
    fn test_empty_model() {
        let code = serializer("Empty", &[]).expect("serializer");
        assert!(code.contains("(void)value;"));
        assert!(code.contains("j = nlohmann::json::object();"));
        let code = deserializer("Empty", &[]).expect("deserializer");
        assert!(code.contains("(void)j;"));
    }
}
