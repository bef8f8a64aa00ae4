//! Model declaration parser.
//!
//! This module reads a textual model declaration into a [`ModelSet`]:
//!
//! ```xml
//! <models>
//!   <model name="Person" doc="A person">
//!     <field name="name" type="string"/>
//!     <field name="tags" type="[string]"/>
//!     <field name="nickname" type="string?"/>
//!     <field name="address" type="Address"/>
//!   </model>
//!   <model name="Address">
//!     <field name="city" type="string"/>
//!   </model>
//! </models>
//! ```
//!
//! Field types use a compact expression syntax: `[T]` is a list of `T` and a
//! trailing `?` makes a type optional, so `[Address?]?` is an optional list of
//! optional addresses.

use crate::error::ParseError;
use crate::models::{Field, Model, ModelSet};
use crate::types::{FieldType, PrimitiveKind};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Width-less integer spellings resolved through [`ParseOptions::default_integer`].
pub const INTEGER_ALIASES: [&str; 2] = ["int", "integer"];

/// Maximum list/optional nesting accepted in a type expression.
const MAX_TYPE_DEPTH: usize = 32;

/// Options controlling how declarations map onto the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    default_integer: PrimitiveKind,
}

impl ParseOptions {
    /// Creates options with the defaults (`int` maps to `i64`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_integer: PrimitiveKind::I64,
        }
    }

    /// Sets the kind a width-less `int`/`integer` declaration maps to.
    ///
    /// The kind must be one of the fixed-width integer kinds; anything else
    /// is rejected when the alias is first used.
    #[must_use]
    pub const fn default_integer(mut self, kind: PrimitiveKind) -> Self {
        self.default_integer = kind;
        self
    }

    /// Returns the kind width-less integers map to.
    #[must_use]
    pub const fn integer_kind(&self) -> PrimitiveKind {
        self.default_integer
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a model declaration document from a string.
///
/// # Arguments
/// * `xml` - Declaration document
///
/// # Returns
/// Parsed model set or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid
/// declarations.
pub fn parse_models(xml: &str) -> Result<ModelSet, ParseError> {
    parse_models_with(xml, &ParseOptions::default())
}

/// Parses a model declaration document using explicit options.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid
/// declarations.
pub fn parse_models_with(xml: &str, options: &ParseOptions) -> Result<ModelSet, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut set: Option<ModelSet> = None;
    let mut closed = false;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf);
        if closed {
            match event {
                Ok(Event::Start(_) | Event::Empty(_) | Event::Text(_) | Event::CData(_)) => {
                    return Err(ParseError::InvalidStructure {
                        message: "Content after the closing models element".to_string(),
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Ok(Event::End(_)) if set.is_some() => closed = true,
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "models" if set.is_none() => set = Some(ModelSet::new()),
                    "model" if set.is_some() => {
                        let model = parse_model(&mut reader, e, options)?;
                        if let Some(models) = set.as_mut() {
                            models.add_model(model);
                        }
                    }
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "models" if set.is_none() => {
                        set = Some(ModelSet::new());
                        closed = true;
                    }
                    "model" if set.is_some() => {
                        let model = parse_model_header(e)?;
                        if let Some(models) = set.as_mut() {
                            models.add_model(model);
                        }
                    }
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let set = set.ok_or_else(|| ParseError::InvalidStructure {
        message: "No models element found".to_string(),
    })?;
    tracing::debug!("Parsed {} model declarations", set.len());
    Ok(set)
}

/// Parses the attributes of a model element.
fn parse_model_header(e: &BytesStart<'_>) -> Result<Model, ParseError> {
    let mut name = None;
    let mut doc = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attribute_value("model", key, &attr.value)?;

        match key {
            "name" => name = Some(value),
            "doc" => doc = Some(value),
            _ => return Err(ParseError::invalid_attr("model", key, value)),
        }
    }

    let mut model = Model::new(name.ok_or_else(|| ParseError::missing_attr("model", "name"))?);
    model.doc = doc;
    Ok(model)
}

/// Parses a model element and its fields.
fn parse_model(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    options: &ParseOptions,
) -> Result<Model, ParseError> {
    let mut model = parse_model_header(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let field = parse_field(e, &model.name, options)?;
                skip_element(reader, "field")?;
                model.add_field(field);
            }
            Ok(Event::Empty(ref e)) => {
                let field = parse_field(e, &model.name, options)?;
                model.add_field(field);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("Unterminated model '{}'", model.name),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(model)
}

/// Parses a field element.
fn parse_field(
    e: &BytesStart<'_>,
    model: &str,
    options: &ParseOptions,
) -> Result<Field, ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let tag = std::str::from_utf8(&name_bytes)?;
    if tag != "field" {
        return Err(ParseError::unknown_element(tag, format!("model '{model}'")));
    }

    let mut name = None;
    let mut type_expr = None;
    let mut doc = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attribute_value("field", key, &attr.value)?;

        match key {
            "name" => name = Some(value),
            "type" => type_expr = Some(value),
            "doc" => doc = Some(value),
            _ => return Err(ParseError::invalid_attr("field", key, value)),
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("field", "name"))?;
    let type_expr = type_expr.ok_or_else(|| ParseError::missing_attr("field", "type"))?;

    let mut field = Field::new(name, parse_type_expr(&type_expr, options)?);
    field.doc = doc;
    Ok(field)
}

/// Consumes events up to and including the end tag of the current element.
fn skip_element(reader: &mut Reader<&[u8]>, element: &str) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                return Err(ParseError::unknown_element(name, element));
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                return Err(ParseError::unknown_element(name, element));
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Decodes and unescapes an attribute value.
fn attribute_value(element: &str, key: &str, raw: &[u8]) -> Result<String, ParseError> {
    let value = std::str::from_utf8(raw)?;
    quick_xml::escape::unescape(value)
        .map(|v| v.into_owned())
        .map_err(|_| ParseError::invalid_attr(element, key, value))
}

/// Parses a field type expression such as `[Address?]`.
///
/// # Errors
/// Returns `ParseError::TypeExpression` with the offending byte position if
/// the expression is malformed.
pub fn parse_type_expr(text: &str, options: &ParseOptions) -> Result<FieldType, ParseError> {
    let mut parser = TypeExprParser {
        text,
        pos: 0,
        depth: 0,
        options,
    };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

/// Recursive descent parser for type expressions.
struct TypeExprParser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl<'a> TypeExprParser<'a> {
    fn parse_type(&mut self) -> Result<FieldType, ParseError> {
        self.depth += 1;
        if self.depth > MAX_TYPE_DEPTH {
            return Err(self.error("type nested too deeply"));
        }

        self.skip_whitespace();
        let mut ty = match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                let element = self.parse_type()?;
                self.skip_whitespace();
                if self.peek() != Some(b']') {
                    return Err(self.error("expected ']'"));
                }
                self.pos += 1;
                FieldType::list(element)
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let ident = self.identifier();
                self.resolve(ident)?
            }
            Some(_) => return Err(self.error("expected a type name or '['")),
            None => return Err(self.error("unexpected end of expression")),
        };

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'?') {
                break;
            }
            self.pos += 1;
            ty = FieldType::optional(ty);
        }

        self.depth -= 1;
        Ok(ty)
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn resolve(&self, ident: &str) -> Result<FieldType, ParseError> {
        if let Some(kind) = PrimitiveKind::from_name(ident) {
            return Ok(FieldType::Primitive(kind));
        }
        if INTEGER_ALIASES.contains(&ident) {
            let kind = self.options.integer_kind();
            if !kind.is_integer() {
                return Err(self.error(&format!(
                    "default integer kind '{kind}' is not an integer kind"
                )));
            }
            return Ok(FieldType::Primitive(kind));
        }
        Ok(FieldType::reference(ident))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::type_expr(self.text, self.pos, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<models>
    <model name="Person" doc="A person &amp; their tags">
        <field name="name" type="string"/>
        <field name="age" type="i32" doc="Years"/>
        <field name="tags" type="[string]"/>
        <field name="nickname" type="string?"/>
        <field name="address" type="Address"/>
    </model>
    <model name="Address">
        <field name="street" type="string"></field>
        <field name="city" type="string"/>
    </model>
    <model name="Marker"/>
</models>"#;

    #[test]
    fn test_parse_models() {
        let set = parse_models(PEOPLE).expect("Failed to parse");
        assert_eq!(set.len(), 3);

        let person = set.get("Person").expect("Person");
        assert_eq!(person.doc.as_deref(), Some("A person & their tags"));
        let names: Vec<_> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "tags", "nickname", "address"]);
        assert_eq!(
            person.get_field("tags").map(|f| &f.ty),
            Some(&FieldType::list(PrimitiveKind::String.into()))
        );
        assert_eq!(
            person.get_field("nickname").map(|f| &f.ty),
            Some(&FieldType::optional(PrimitiveKind::String.into()))
        );
        assert_eq!(
            person.get_field("age").and_then(|f| f.doc.as_deref()),
            Some("Years")
        );

        assert_eq!(set.get("Address").map(|m| m.fields.len()), Some(2));
        assert!(set.get("Marker").is_some_and(|m| m.fields.is_empty()));
    }

    #[test]
    fn test_parse_missing_root() {
        let result = parse_models("<model name=\"A\"/>");
        assert!(matches!(result, Err(ParseError::UnknownElement { .. })));

        let result = parse_models("");
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }

    #[test]
    fn test_parse_missing_attributes() {
        let xml = r#"<models><model name="A"><field type="i32"/></model></models>"#;
        assert!(matches!(
            parse_models(xml),
            Err(ParseError::MissingAttribute { .. })
        ));

        let xml = r#"<models><model><field name="x" type="i32"/></model></models>"#;
        assert!(matches!(
            parse_models(xml),
            Err(ParseError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_content() {
        let xml = r#"<models><model name="A"><column name="x" type="i32"/></model></models>"#;
        assert!(matches!(
            parse_models(xml),
            Err(ParseError::UnknownElement { .. })
        ));

        let xml = r#"<models><model name="A" color="red"/></models>"#;
        assert!(matches!(
            parse_models(xml),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_parse_unterminated_model() {
        let xml = r#"<models><model name="A"><field name="x" type="i32"/>"#;
        assert!(parse_models(xml).is_err());
    }

    #[test]
    fn test_parse_rejects_content_after_root() {
        for xml in [
            r#"<models><model name="A"/></models><model name="B"/>"#,
            r#"<models/><models/>"#,
            r#"<models></models>trailing"#,
        ] {
            assert!(
                matches!(parse_models(xml), Err(ParseError::InvalidStructure { .. })),
                "{xml}"
            );
        }

        let xml = "<models><model name=\"A\"/></models>\n<!-- done -->\n";
        assert_eq!(parse_models(xml).expect("parsed").len(), 1);
    }

    #[test]
    fn test_type_expr_nesting() {
        let options = ParseOptions::default();
        let ty = parse_type_expr("[ Address ? ] ?", &options).expect("valid");
        assert_eq!(
            ty,
            FieldType::optional(FieldType::list(FieldType::optional(FieldType::reference(
                "Address"
            ))))
        );

        let ty = parse_type_expr("[[u8]]", &options).expect("valid");
        assert_eq!(
            ty,
            FieldType::list(FieldType::list(PrimitiveKind::U8.into()))
        );

        let ty = parse_type_expr("string??", &options).expect("valid");
        assert_eq!(
            ty,
            FieldType::optional(FieldType::optional(PrimitiveKind::String.into()))
        );
    }

    #[test]
    fn test_type_expr_errors() {
        let options = ParseOptions::default();
        for bad in ["", "[", "[i32", "i32]", "?", "a b", "[]", "i32-"] {
            let err = parse_type_expr(bad, &options).expect_err(bad);
            assert!(matches!(err, ParseError::TypeExpression { .. }), "{bad}");
        }

        match parse_type_expr("[i32", &options) {
            Err(ParseError::TypeExpression { position, .. }) => assert_eq!(position, 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_type_expr_depth_limit() {
        let deep = format!("{}i32{}", "[".repeat(40), "]".repeat(40));
        assert!(parse_type_expr(&deep, &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_default_integer_width() {
        let ty = parse_type_expr("int", &ParseOptions::default()).expect("valid");
        assert_eq!(ty, FieldType::Primitive(PrimitiveKind::I64));

        let options = ParseOptions::new().default_integer(PrimitiveKind::I32);
        let ty = parse_type_expr("[integer]", &options).expect("valid");
        assert_eq!(ty, FieldType::list(PrimitiveKind::I32.into()));

        let options = ParseOptions::new().default_integer(PrimitiveKind::F64);
        assert!(parse_type_expr("int", &options).is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let options = ParseOptions::default();
        for expr in ["i32", "[string]", "Address?", "[[bytes]?]", "[Node]?"] {
            let ty = parse_type_expr(expr, &options).expect(expr);
            assert_eq!(ty.to_string(), expr);
        }
    }
}
