//! Language adapter abstraction.
//!
//! One [`LanguageAdapter`] exists per implemented target language. The
//! emission driver talks to adapters only through this trait, so adding a
//! language means adding one implementation and one arm in [`adapter_for`].

use crate::config::GeneratorOptions;
use crate::cpp::CppAdapter;
use crate::error::CodegenError;
use crate::language::{Format, Language};
use crate::registry::{NativeType, TypeMapping, mapping_for};
use crate::resolve::{IndirectionStrategy, Resolver, Shape};
use crate::rust::RustAdapter;
use modelgen_schema::{Field, Model, SchemaIr};
use std::collections::HashMap;

/// Emits source text for one target language.
///
/// Every method is a pure function of the IR the adapter was built over and
/// its arguments.
pub trait LanguageAdapter {
    /// Target language.
    fn language(&self) -> Language;

    /// Cycle strategy the adapter uses.
    fn indirection(&self) -> IndirectionStrategy;

    /// Native type name for a model.
    fn type_name(&self, model: &str) -> String;

    /// Native member name for a field.
    fn field_name(&self, field: &str) -> String;

    /// Type names the generated file defines or relies on itself.
    fn reserved_type_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns true if structures must be emitted dependencies first.
    fn orders_by_dependency(&self) -> bool {
        false
    }

    /// File header: imports, includes and shared helpers.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field type cannot be spelled.
    fn generate_prelude(&self, models: &[&Model]) -> Result<String, CodegenError>;

    /// Text placed before the first structure (forward declarations).
    ///
    /// # Errors
    /// Returns `CodegenError` if generation fails.
    fn generate_structure_header(&self, _models: &[&Model]) -> Result<String, CodegenError> {
        Ok(String::new())
    }

    /// Native aggregate type for one model.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field type cannot be mapped.
    fn generate_structure(&self, model: &Model) -> Result<String, CodegenError>;

    /// Text placed after the last structure (out-of-line equality).
    ///
    /// # Errors
    /// Returns `CodegenError` if generation fails.
    fn generate_structure_footer(&self, _models: &[&Model]) -> Result<String, CodegenError> {
        Ok(String::new())
    }

    /// Text placed before the per-model routines of a format (prototypes).
    ///
    /// # Errors
    /// Returns `CodegenError` if generation fails.
    fn generate_format_header(
        &self,
        _models: &[&Model],
        _format: Format,
    ) -> Result<String, CodegenError> {
        Ok(String::new())
    }

    /// Routine converting a model instance into `format`.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` if a field cannot round-trip.
    fn generate_serializer(&self, model: &Model, format: Format) -> Result<String, CodegenError>;

    /// Routine parsing `format` into a model instance.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` if a field cannot round-trip.
    fn generate_deserializer(&self, model: &Model, format: Format)
    -> Result<String, CodegenError>;

    /// File footer.
    fn generate_epilogue(&self) -> String {
        String::new()
    }
}

/// Builds the adapter for `language` over `ir`.
///
/// The language's type mapping is checked for completeness first, so a
/// defective table fails here instead of in the middle of generation.
///
/// # Errors
/// Returns `CodegenError::UnsupportedLanguage` for declared but unimplemented
/// languages, `CodegenError::IncompleteMapping` for a defective table and
/// `CodegenError::NameCollision` if two IR names map to one native name.
pub fn adapter_for<'a>(
    language: Language,
    ir: &'a SchemaIr,
    options: &'a GeneratorOptions,
) -> Result<Box<dyn LanguageAdapter + 'a>, CodegenError> {
    let mapping = mapping_for(language)?;
    mapping.ensure_complete()?;

    let adapter: Box<dyn LanguageAdapter + 'a> = match language {
        Language::Rust => Box::new(RustAdapter::new(ir, options)),
        Language::Cpp => Box::new(CppAdapter::new(ir, options)),
        Language::Java | Language::Go | Language::CSharp | Language::Swift => {
            return Err(CodegenError::UnsupportedLanguage {
                language: language.to_string(),
            });
        }
    };

    check_name_collisions(adapter.as_ref(), ir)?;
    tracing::debug!(
        "Registered {} adapter ({:?} indirection)",
        language,
        adapter.indirection()
    );
    Ok(adapter)
}

/// Fails if native names collide: two models, two fields of one model, or a
/// model and a name the generated file reserves.
///
/// # Errors
/// Returns `CodegenError::NameCollision` naming the colliding identifier.
pub fn check_name_collisions(
    adapter: &dyn LanguageAdapter,
    ir: &SchemaIr,
) -> Result<(), CodegenError> {
    let language = adapter.language();
    let collision = |scope: &str, name: String| CodegenError::NameCollision {
        language: language.to_string(),
        scope: scope.to_string(),
        name,
    };

    let mut types: HashMap<String, &str> = adapter
        .reserved_type_names()
        .iter()
        .map(|name| ((*name).to_string(), *name))
        .collect();
    for model in ir.models() {
        let native = adapter.type_name(&model.name);
        if types.insert(native.clone(), &model.name).is_some() {
            return Err(collision("model names", native));
        }

        let mut fields = HashMap::new();
        for field in &model.fields {
            let native = adapter.field_name(&field.name);
            if fields.insert(native.clone(), &field.name).is_some() {
                return Err(collision(&format!("fields of {}", model.name), native));
            }
        }
    }
    Ok(())
}

/// A field resolved and spelled for one language.
#[derive(Debug, Clone)]
pub struct FieldPlan<'m> {
    /// IR field.
    pub field: &'m Field,
    /// Native member name.
    pub member: String,
    /// Resolved shape.
    pub shape: Shape,
    /// Spelled native type.
    pub native: NativeType,
}

impl FieldPlan<'_> {
    /// Key or element name in every format: the IR field name.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.field.name
    }
}

/// Resolves and spells every field of `model`.
///
/// # Errors
/// Returns `CodegenError::UnsupportedType` if a primitive has no mapping entry
/// and `CodegenError::CycleHandling` if a cycle cannot be represented.
pub fn plan_fields<'m>(
    adapter: &dyn LanguageAdapter,
    ir: &SchemaIr,
    mapping: &TypeMapping,
    model: &'m Model,
) -> Result<Vec<FieldPlan<'m>>, CodegenError> {
    let language = adapter.language();
    let resolver = Resolver::new(ir.cycles(), language, adapter.indirection());
    let name_of = |name: &str| adapter.type_name(name);

    model
        .fields
        .iter()
        .map(|field| {
            let shape = resolver.field_shape(model, field, &name_of)?;
            let native = mapping.spell(&shape).map_err(|kind| {
                CodegenError::unsupported_type(
                    &model.name,
                    &field.name,
                    field.ty.describe(),
                    language.name(),
                    format!("no {language} mapping for primitive '{kind}'"),
                )
            })?;
            Ok(FieldPlan {
                field,
                member: adapter.field_name(&field.name),
                shape,
                native,
            })
        })
        .collect()
}

/// Splits a documentation string into comment lines with the given prefix.
pub(crate) fn doc_lines(doc: &str, prefix: &str) -> String {
    let mut output = String::new();
    for line in doc.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(prefix.trim_end());
        } else {
            output.push_str(prefix);
            output.push_str(line);
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_schema::{FieldType, ModelSet, PrimitiveKind};

    fn ir_of(models: Vec<Model>) -> SchemaIr {
        SchemaIr::new(ModelSet::from(models)).expect("valid IR")
    }

    #[test]
    fn test_unimplemented_languages_are_rejected() {
        let ir = ir_of(vec![Model::new("Point").with_field("x", PrimitiveKind::I32.into())]);
        let options = GeneratorOptions::default();
        for language in [Language::Java, Language::Go, Language::CSharp, Language::Swift] {
            match adapter_for(language, &ir, &options) {
                Err(CodegenError::UnsupportedLanguage { language: name }) => {
                    assert_eq!(name, language.name());
                }
                Err(other) => panic!("unexpected error: {other:?}"),
                Ok(_) => panic!("{language} should not have an adapter"),
            }
        }
        for language in Language::IMPLEMENTED {
            let adapter = adapter_for(language, &ir, &options).expect("adapter");
            assert_eq!(adapter.language(), language);
        }
    }

    #[test]
    fn test_field_name_collision() {
        let ir = ir_of(vec![
            Model::new("Order")
                .with_field("orderId", PrimitiveKind::U64.into())
                .with_field("order_id", PrimitiveKind::U64.into()),
        ]);
        let options = GeneratorOptions::default();
        match adapter_for(Language::Rust, &ir, &options) {
            Err(CodegenError::NameCollision { scope, name, .. }) => {
                assert_eq!(scope, "fields of Order");
                assert_eq!(name, "order_id");
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("collision not detected"),
        }
        // C++ keeps the declared spelling, so both fields coexist.
        assert!(adapter_for(Language::Cpp, &ir, &options).is_ok());
    }

    #[test]
    fn test_model_name_collision() {
        let ir = ir_of(vec![Model::new("line_item"), Model::new("LineItem")]);
        let options = GeneratorOptions::default();
        assert!(matches!(
            adapter_for(Language::Rust, &ir, &options),
            Err(CodegenError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_reserved_type_name_collision() {
        let ir = ir_of(vec![Model::new("HexBytes")]);
        let options = GeneratorOptions::default();
        assert!(matches!(
            adapter_for(Language::Rust, &ir, &options),
            Err(CodegenError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_plan_fields() {
        let ir = ir_of(vec![
            Model::new("Person")
                .with_field("fullName", PrimitiveKind::String.into())
                .with_field("tags", FieldType::list(PrimitiveKind::String.into())),
        ]);
        let options = GeneratorOptions::default();
        let adapter = adapter_for(Language::Rust, &ir, &options).expect("adapter");
        let model = ir.get_model("Person").expect("model");
        let mapping = mapping_for(Language::Rust).expect("mapping");

        let plans = plan_fields(adapter.as_ref(), &ir, mapping, model).expect("planned");
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].member, "full_name");
        assert_eq!(plans[0].wire_name(), "fullName");
        assert_eq!(plans[1].native.text, "Vec<String>");
    }

    #[test]
    fn test_doc_lines() {
        assert_eq!(doc_lines("first\n\nsecond", "/// "), "/// first\n///\n/// second\n");
    }
}
