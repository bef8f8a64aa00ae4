//! Intermediate representation for code generation.
//!
//! [`SchemaIr`] is the validated, analyzed form of a model set that every
//! generator consumes. It is immutable: generators only read it, so several
//! generators may run over one IR at the same time.

use crate::error::SchemaError;
use crate::graph::CycleAnalysis;
use crate::models::{Model, ModelSet};
use crate::validation::validate_model_set;
use std::collections::HashSet;

/// Validated model set plus its reference-graph classification.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    models: ModelSet,
    cycles: CycleAnalysis,
}

impl SchemaIr {
    /// Validates `models` and analyzes its reference graph.
    ///
    /// # Errors
    /// Returns `SchemaError` if any IR invariant is violated; no analysis is
    /// attempted on an invalid set.
    pub fn new(models: ModelSet) -> Result<Self, SchemaError> {
        validate_model_set(&models)?;
        let cycles = CycleAnalysis::analyze(&models);

        tracing::debug!(
            "Analyzed {} models: {} cycle participants, {} closing edges",
            models.len(),
            cycles.participants().count(),
            cycles.closing_edges().count()
        );

        Ok(Self { models, cycles })
    }

    /// Returns the model set.
    #[must_use]
    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Returns the cycle classification.
    #[must_use]
    pub fn cycles(&self) -> &CycleAnalysis {
        &self.cycles
    }

    /// Looks up a model by name.
    #[must_use]
    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Looks up a model by name, failing if it does not exist.
    ///
    /// # Errors
    /// Returns `SchemaError::ModelNotFound` for unknown names.
    pub fn model(&self, name: &str) -> Result<&Model, SchemaError> {
        self.models.get(name).ok_or_else(|| SchemaError::ModelNotFound {
            name: name.to_string(),
        })
    }

    /// Returns the models reachable from `root`, root first, in pre-order.
    ///
    /// Each model appears once no matter how many paths lead to it, which
    /// also makes the walk terminate on cyclic graphs.
    ///
    /// # Errors
    /// Returns `SchemaError::ModelNotFound` if `root` is unknown.
    pub fn reachable_from(&self, root: &str) -> Result<Vec<&Model>, SchemaError> {
        let root = self.model(root)?;
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        self.walk(root, &mut seen, &mut order);
        Ok(order)
    }

    fn walk<'a>(
        &'a self,
        model: &'a Model,
        seen: &mut HashSet<&'a str>,
        order: &mut Vec<&'a Model>,
    ) {
        if !seen.insert(model.name.as_str()) {
            return;
        }
        order.push(model);
        for (_, target) in model.references() {
            if let Some(next) = self.models.get(target) {
                self.walk(next, seen, order);
            }
        }
    }

    /// Returns the models in dependency-first order (see
    /// [`CycleAnalysis::dependency_order`]).
    #[must_use]
    pub fn dependency_order(&self) -> Vec<&Model> {
        self.cycles
            .dependency_order()
            .iter()
            .filter_map(|name| self.models.get(name))
            .collect()
    }
}

/// Converts a string to snake_case.
///
/// Acronym runs stay together: `MDEntryPx` becomes `md_entry_px`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            if !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !result.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
