//! XSD generation.
//!
//! Walks the models reachable from a root model and writes one named
//! `complexType` per model (`Person` becomes `PersonType`) plus a root
//! element declaration. The document
//! describes the XML the language adapters emit: elements in field order,
//! optionals with `minOccurs="0"` and lists as unbounded runs.

use crate::config::GeneratorOptions;
use crate::error::CodegenError;
use crate::registry::xsd_type;
use crate::resolve::check_representable;
use modelgen_schema::{Field, FieldType, Model, SchemaIr};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// XML Schema namespace.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Generator for XSD documents.
pub struct XsdGenerator<'a> {
    ir: &'a SchemaIr,
    options: &'a GeneratorOptions,
}

impl<'a> XsdGenerator<'a> {
    /// Creates a new XSD generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, options: &'a GeneratorOptions) -> Self {
        Self { ir, options }
    }

    /// Generates the schema document rooted at `root`.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if `root` is unknown and
    /// `CodegenError::UnsupportedType` if a reachable field has no XML form.
    pub fn generate(&self, root: &str) -> Result<String, CodegenError> {
        let models = self.ir.reachable_from(root)?;
        for model in &models {
            for field in &model.fields {
                check_representable(model, field, None, "xsd")?;
            }
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut schema = BytesStart::new("xs:schema").with_attributes([
            ("xmlns:xs", XS_NAMESPACE),
            ("elementFormDefault", "qualified"),
        ]);
        if let Some(namespace) = self.options.target_namespace() {
            schema.push_attribute(("targetNamespace", namespace));
            schema.push_attribute(("xmlns:tns", namespace));
        }
        writer.write_event(Event::Start(schema))?;

        let root_type = self.qualified(root);
        writer.write_event(Event::Empty(
            BytesStart::new("xs:element")
                .with_attributes([("name", root), ("type", root_type.as_str())]),
        ))?;

        for model in &models {
            tracing::debug!("Emitting complexType {}", model.name);
            self.write_complex_type(&mut writer, model)?;
        }

        writer.write_event(Event::End(BytesEnd::new("xs:schema")))?;

        let mut output = String::from_utf8(writer.into_inner())
            .map_err(|e| CodegenError::generation(format!("XSD is not UTF-8: {e}")))?;
        output.push('\n');

        tracing::info!(
            "Generated XSD for {} with {} complex types",
            root,
            models.len()
        );
        Ok(output)
    }

    fn write_complex_type(
        &self,
        writer: &mut Writer<Vec<u8>>,
        model: &Model,
    ) -> Result<(), CodegenError> {
        let name = complex_type_name(&model.name);
        writer.write_event(Event::Start(
            BytesStart::new("xs:complexType").with_attributes([("name", name.as_str())]),
        ))?;
        self.write_documentation(writer, model.doc.as_deref())?;

        if model.fields.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("xs:sequence")))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new("xs:sequence")))?;
            for field in &model.fields {
                self.write_element(writer, field)?;
            }
            writer.write_event(Event::End(BytesEnd::new("xs:sequence")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("xs:complexType")))?;
        Ok(())
    }

    fn write_element(&self, writer: &mut Writer<Vec<u8>>, field: &Field) -> Result<(), CodegenError> {
        let (leaf, min_occurs, max_occurs) = occurrence(&field.ty);
        let type_name = match leaf {
            FieldType::Primitive(kind) => xsd_type(*kind).to_string(),
            FieldType::Reference(model) => self.qualified(model),
            FieldType::Optional(_) | FieldType::List(_) => {
                return Err(CodegenError::generation(format!(
                    "field '{}' has no single XSD element form",
                    field.name
                )));
            }
        };

        let mut element = BytesStart::new("xs:element")
            .with_attributes([("name", field.name.as_str()), ("type", type_name.as_str())]);
        if let Some(min) = min_occurs {
            element.push_attribute(("minOccurs", min));
        }
        if let Some(max) = max_occurs {
            element.push_attribute(("maxOccurs", max));
        }

        match field.doc.as_deref().filter(|_| self.options.docs_enabled()) {
            Some(doc) => {
                writer.write_event(Event::Start(element))?;
                self.write_documentation(writer, Some(doc))?;
                writer.write_event(Event::End(BytesEnd::new("xs:element")))?;
            }
            None => writer.write_event(Event::Empty(element))?,
        }
        Ok(())
    }

    fn write_documentation(
        &self,
        writer: &mut Writer<Vec<u8>>,
        doc: Option<&str>,
    ) -> Result<(), CodegenError> {
        let Some(doc) = doc.filter(|_| self.options.docs_enabled()) else {
            return Ok(());
        };
        writer.write_event(Event::Start(BytesStart::new("xs:annotation")))?;
        writer.write_event(Event::Start(BytesStart::new("xs:documentation")))?;
        writer.write_event(Event::Text(BytesText::new(doc)))?;
        writer.write_event(Event::End(BytesEnd::new("xs:documentation")))?;
        writer.write_event(Event::End(BytesEnd::new("xs:annotation")))?;
        Ok(())
    }

    fn qualified(&self, model: &str) -> String {
        match self.options.target_namespace() {
            Some(_) => format!("tns:{}", complex_type_name(model)),
            None => complex_type_name(model),
        }
    }
}

/// Name of the `complexType` describing `model`.
#[must_use]
pub fn complex_type_name(model: &str) -> String {
    format!("{model}Type")
}

/// Splits a field type into its leaf and `minOccurs`/`maxOccurs` values.
fn occurrence(ty: &FieldType) -> (&FieldType, Option<&'static str>, Option<&'static str>) {
    match ty {
        FieldType::Optional(inner) => (inner.leaf(), Some("0"), None),
        FieldType::List(inner) => (inner.leaf(), Some("0"), Some("unbounded")),
        leaf => (leaf, None, None),
    }
}
