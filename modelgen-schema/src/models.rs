//! Model definitions.
//!
//! This module contains the data structures describing a generation
//! request: named models, their ordered fields, and the model set that
//! references resolve against.

use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field definition within a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the owning model.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: None,
        }
    }

    /// Attaches documentation to the field.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Model (named aggregate) definition.
///
/// Field order is significant: it fixes struct member order and XML
/// element order in every generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model name.
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Model {
    /// Creates a new model with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            doc: None,
        }
    }

    /// Adds a field to the model.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Adds a field and returns the model, for declarative construction.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.add_field(Field::new(name, ty));
        self
    }

    /// Attaches documentation to the model.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the names of the models this model references, in field
    /// order, with repeats.
    pub fn references(&self) -> impl Iterator<Item = (&Field, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.ty.referenced_model().map(|target| (f, target)))
    }
}

/// The closed set of models known to one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Model>", into = "Vec<Model>")]
pub struct ModelSet {
    models: Vec<Model>,
    /// Name lookup (first declaration wins; duplicates surface in validation).
    index: HashMap<String, usize>,
}

impl ModelSet {
    /// Creates an empty model set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model to the set.
    pub fn add_model(&mut self, model: Model) {
        let index = self.models.len();
        self.index.entry(model.name.clone()).or_insert(index);
        self.models.push(model);
    }

    /// Adds a model and returns the set, for declarative construction.
    #[must_use]
    pub fn with_model(mut self, model: Model) -> Self {
        self.add_model(model);
        self
    }

    /// Looks up a model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.index.get(name).map(|&idx| &self.models[idx])
    }

    /// Returns true if a model with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the declaration position of a model.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the models in declaration order.
    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Iterates over the models in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    /// Returns the number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if the set holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl From<Vec<Model>> for ModelSet {
    fn from(models: Vec<Model>) -> Self {
        models.into_iter().collect()
    }
}

impl From<ModelSet> for Vec<Model> {
    fn from(set: ModelSet) -> Self {
        set.models
    }
}

impl FromIterator<Model> for ModelSet {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        let mut set = Self::new();
        for model in iter {
            set.add_model(model);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ModelSet {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn person() -> Model {
        Model::new("Person")
            .with_field("name", PrimitiveKind::String.into())
            .with_field("address", FieldType::reference("Address"))
            .with_field("friends", FieldType::list(FieldType::reference("Person")))
    }

    #[test]
    fn test_model_field_lookup() {
        let model = person();
        assert_eq!(model.fields.len(), 3);
        assert!(model.get_field("address").is_some());
        assert!(model.get_field("Address").is_none());
    }

    #[test]
    fn test_model_references_in_field_order() {
        let model = person();
        let targets: Vec<_> = model.references().map(|(_, t)| t).collect();
        assert_eq!(targets, vec!["Address", "Person"]);
    }

    #[test]
    fn test_model_set_lookup() {
        let set = ModelSet::new()
            .with_model(person())
            .with_model(Model::new("Address"));

        assert_eq!(set.len(), 2);
        assert!(set.contains("Address"));
        assert!(!set.contains("Unknown"));
        assert_eq!(set.position("Address"), Some(1));
        assert_eq!(set.get("Person").map(|m| m.fields.len()), Some(3));
    }

    #[test]
    fn test_model_set_first_declaration_wins() {
        let set: ModelSet = vec![
            Model::new("A").with_field("x", PrimitiveKind::I32.into()),
            Model::new("A"),
        ]
        .into();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("A").map(|m| m.fields.len()), Some(1));
    }

    #[test]
    fn test_model_set_serde_as_list() {
        let set = ModelSet::new().with_model(
            Model::new("Point")
                .with_field("x", PrimitiveKind::I32.into())
                .with_field("y", PrimitiveKind::I32.into()),
        );
        let json = serde_json::to_string(&set).expect("serialize");
        assert!(json.starts_with('['));
        assert!(json.contains(r#""type":{"primitive":"i32"}"#));

        let back: ModelSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, set);
        assert!(back.contains("Point"));
    }
}
