//! Model set validation.
//!
//! This module checks the IR invariants every generator relies on: unique
//! model and field names, portable identifiers, and references that resolve
//! inside the model set. Validation never trusts the front end.

use crate::error::SchemaError;
use crate::models::{Model, ModelSet};
use crate::parser::INTEGER_ALIASES;
use crate::types::PrimitiveKind;
use std::collections::HashSet;

/// Validates a model set for correctness.
///
/// # Arguments
/// * `set` - The model set to validate
///
/// # Returns
/// Ok(()) if valid, or the first `SchemaError` found.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_model_set(set: &ModelSet) -> Result<(), SchemaError> {
    validate_models(set)?;
    for model in set {
        validate_fields(model)?;
    }
    validate_references(set)?;
    Ok(())
}

/// Returns true if `name` is an ASCII identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Every target language and XML accept this shape, so names that pass can
/// be emitted after language-specific keyword escaping only.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates model names.
fn validate_models(set: &ModelSet) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for model in set {
        if !is_identifier(&model.name) {
            return Err(SchemaError::invalid_identifier("model", &model.name));
        }

        if PrimitiveKind::from_name(&model.name).is_some()
            || INTEGER_ALIASES.contains(&model.name.as_str())
        {
            return Err(SchemaError::ReservedName {
                name: model.name.clone(),
            });
        }

        if !seen.insert(model.name.as_str()) {
            return Err(SchemaError::DuplicateModel {
                name: model.name.clone(),
            });
        }
    }

    Ok(())
}

/// Validates the fields of one model.
fn validate_fields(model: &Model) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for field in &model.fields {
        if !is_identifier(&field.name) {
            return Err(SchemaError::invalid_identifier("field", &field.name));
        }

        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                model: model.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}

/// Validates that every reference resolves inside the set.
fn validate_references(set: &ModelSet) -> Result<(), SchemaError> {
    for model in set {
        for (field, target) in model.references() {
            if !set.contains(target) {
                return Err(SchemaError::UnresolvedReference {
                    model: model.name.clone(),
                    field: field.name.clone(),
                    target: target.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use crate::types::FieldType;

    fn person() -> Model {
        Model::new("Person")
            .with_field("name", PrimitiveKind::String.into())
            .with_field("age", PrimitiveKind::I32.into())
            .with_field("tags", FieldType::list(PrimitiveKind::String.into()))
    }

    #[test]
    fn test_validate_valid_set() {
        let set = ModelSet::new().with_model(person());
        assert!(validate_model_set(&set).is_ok());
    }

    #[test]
    fn test_validate_duplicate_field() {
        let model = Model::new("Account")
            .with_field("id", PrimitiveKind::U64.into())
            .with_field("id", PrimitiveKind::String.into());
        let set = ModelSet::new().with_model(model);

        assert_eq!(
            validate_model_set(&set),
            Err(SchemaError::DuplicateField {
                model: "Account".to_string(),
                field: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_field_names_are_case_sensitive() {
        let model = Model::new("Account")
            .with_field("id", PrimitiveKind::U64.into())
            .with_field("Id", PrimitiveKind::U64.into());
        let set = ModelSet::new().with_model(model);
        assert!(validate_model_set(&set).is_ok());
    }

    #[test]
    fn test_validate_duplicate_model() {
        let set = ModelSet::new()
            .with_model(person())
            .with_model(Model::new("Person"));

        assert_eq!(
            validate_model_set(&set),
            Err(SchemaError::DuplicateModel {
                name: "Person".to_string()
            })
        );
    }

    #[test]
    fn test_validate_unresolved_reference() {
        let model = Model::new("Person").with_field(
            "address",
            FieldType::optional(FieldType::reference("Address")),
        );
        let set = ModelSet::new().with_model(model);

        assert_eq!(
            validate_model_set(&set),
            Err(SchemaError::UnresolvedReference {
                model: "Person".to_string(),
                field: "address".to_string(),
                target: "Address".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_invalid_identifiers() {
        let set = ModelSet::new().with_model(Model::new("my model"));
        assert!(matches!(
            validate_model_set(&set),
            Err(SchemaError::InvalidIdentifier { .. })
        ));

        let mut model = Model::new("Ok");
        model.add_field(Field::new("1st", PrimitiveKind::Bool.into()));
        let set = ModelSet::new().with_model(model);
        assert!(matches!(
            validate_model_set(&set),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_validate_reserved_model_name() {
        let set = ModelSet::new().with_model(Model::new("string"));
        assert_eq!(
            validate_model_set(&set),
            Err(SchemaError::ReservedName {
                name: "string".to_string()
            })
        );

        let set = ModelSet::new().with_model(Model::new("int"));
        assert!(matches!(
            validate_model_set(&set),
            Err(SchemaError::ReservedName { .. })
        ));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("Field2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("héllo"));
    }
}
