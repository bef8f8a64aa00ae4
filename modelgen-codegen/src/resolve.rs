//! Field type resolution.
//!
//! Turns an IR [`FieldType`] into a [`Shape`]: the same tree with every
//! reference resolved to a native type name and marked direct or indirect
//! according to the cycle analysis and the adapter's indirection strategy.
//! Also holds the representability rules that decide, before any text is
//! emitted, whether a field type can round-trip through a format at all.

use crate::error::CodegenError;
use crate::language::{Format, Language};
use modelgen_schema::{CycleAnalysis, Field, FieldType, Model, PrimitiveKind, SchemaIr};
use std::collections::BTreeMap;

/// How an adapter breaks reference cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectionStrategy {
    /// Closing edges are boxed unless some enclosing list already stores the
    /// target on the heap (Rust `Box<T>`).
    Boxed,
    /// Closing edges become shared pointers unless their immediate container
    /// is a list (C++ `std::shared_ptr<T>`, vectors of incomplete types are
    /// allowed).
    SharedPointer,
    /// The target has no indirection primitive; any closing edge that would
    /// need one is an error.
    Unavailable,
}

impl IndirectionStrategy {
    /// Decides whether a closing edge needs indirection.
    ///
    /// `parent_is_list` is true when the reference is the direct element of a
    /// list; `behind_list` when any enclosing level is a list.
    #[must_use]
    pub const fn needs_indirection(self, parent_is_list: bool, behind_list: bool) -> bool {
        match self {
            Self::Boxed => !behind_list,
            Self::SharedPointer | Self::Unavailable => !parent_is_list,
        }
    }
}

/// A field type with references resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Primitive value.
    Primitive(PrimitiveKind),
    /// Another model.
    Model {
        /// IR model name.
        model: String,
        /// Native type name.
        native: String,
        /// True if held through the language's indirection wrapper.
        indirect: bool,
    },
    /// Possibly absent value.
    Optional(Box<Shape>),
    /// Ordered sequence.
    List(Box<Shape>),
}

impl Shape {
    /// Builds a shape that names models by their IR name and holds every
    /// reference directly.
    #[must_use]
    pub fn direct(ty: &FieldType) -> Self {
        match ty {
            FieldType::Primitive(kind) => Self::Primitive(*kind),
            FieldType::Reference(name) => Self::Model {
                model: name.clone(),
                native: name.clone(),
                indirect: false,
            },
            FieldType::Optional(inner) => Self::Optional(Box::new(Self::direct(inner))),
            FieldType::List(inner) => Self::List(Box::new(Self::direct(inner))),
        }
    }

    /// Returns true if the shape contains the primitive kind at any depth.
    #[must_use]
    pub fn contains_primitive(&self, kind: PrimitiveKind) -> bool {
        match self {
            Self::Primitive(k) => *k == kind,
            Self::Model { .. } => false,
            Self::Optional(inner) | Self::List(inner) => inner.contains_primitive(kind),
        }
    }
}

/// Resolves the fields of models for one language.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    cycles: &'a CycleAnalysis,
    language: Language,
    strategy: IndirectionStrategy,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(cycles: &'a CycleAnalysis, language: Language, strategy: IndirectionStrategy) -> Self {
        Self {
            cycles,
            language,
            strategy,
        }
    }

    /// Resolves one field of `model`, naming referenced models with `name_of`.
    ///
    /// # Errors
    /// Returns `CodegenError::CycleHandling` if a closing edge needs
    /// indirection the strategy cannot provide.
    pub fn field_shape(
        &self,
        model: &Model,
        field: &Field,
        name_of: &dyn Fn(&str) -> String,
    ) -> Result<Shape, CodegenError> {
        self.resolve(&model.name, &field.ty, false, false, name_of)
    }

    fn resolve(
        &self,
        owner: &str,
        ty: &FieldType,
        parent_is_list: bool,
        behind_list: bool,
        name_of: &dyn Fn(&str) -> String,
    ) -> Result<Shape, CodegenError> {
        Ok(match ty {
            FieldType::Primitive(kind) => Shape::Primitive(*kind),
            FieldType::Reference(target) => {
                let indirect = self.cycles.is_closing_edge(owner, target)
                    && self.strategy.needs_indirection(parent_is_list, behind_list);
                if indirect && self.strategy == IndirectionStrategy::Unavailable {
                    return Err(self.cycle_error(owner));
                }
                Shape::Model {
                    model: target.clone(),
                    native: name_of(target),
                    indirect,
                }
            }
            FieldType::Optional(inner) => Shape::Optional(Box::new(self.resolve(
                owner,
                inner,
                false,
                behind_list,
                name_of,
            )?)),
            FieldType::List(inner) => {
                Shape::List(Box::new(self.resolve(owner, inner, true, true, name_of)?))
            }
        })
    }

    fn cycle_error(&self, owner: &str) -> CodegenError {
        let mut models: Vec<&str> = self.cycles.participants().collect();
        if models.is_empty() {
            models.push(owner);
        }
        tracing::warn!(
            "No indirection available in {} for cycle through {}",
            self.language,
            models.join(", ")
        );
        CodegenError::CycleHandling {
            language: self.language.to_string(),
            models: models.join(", "),
        }
    }
}

/// Checks that a field type survives a round trip through `format`.
///
/// With `format` set to `None` the check covers the XSD, which describes the
/// XML encoding and so shares its rules. `target` names the requested target
/// in the error, e.g. `rust/xml` or `xsd`.
///
/// # Errors
/// Returns `CodegenError::UnsupportedType` naming the model, field and
/// offending type.
pub fn check_representable(
    model: &Model,
    field: &Field,
    format: Option<Format>,
    target: &str,
) -> Result<(), CodegenError> {
    let xml_rules = matches!(format, None | Some(Format::Xml));
    match first_violation(&field.ty, xml_rules) {
        Some(reason) => {
            tracing::warn!(
                "Rejecting {}.{} ({}) for {}: {}",
                model.name,
                field.name,
                field.ty.describe(),
                target,
                reason
            );
            Err(CodegenError::unsupported_type(
                &model.name,
                &field.name,
                field.ty.describe(),
                target,
                reason,
            ))
        }
        None => Ok(()),
    }
}

/// Models that have no form in `format`, each with the reason.
///
/// A model is listed when one of its fields breaks a rule only `format`
/// imposes, or when it references a listed model. Rules shared by every
/// format are not considered here: [`check_representable`] still rejects
/// those for the whole target.
#[must_use]
pub fn unavailable_models(ir: &SchemaIr, format: Format) -> BTreeMap<String, String> {
    let xml_rules = format == Format::Xml;
    let mut unavailable = BTreeMap::new();

    for model in ir.models().iter() {
        let own = model.fields.iter().find_map(|field| {
            if first_violation(&field.ty, false).is_some() {
                return None;
            }
            first_violation(&field.ty, xml_rules)
                .map(|reason| format!("field '{}' ({}): {}", field.name, field.ty.describe(), reason))
        });
        if let Some(reason) = own {
            unavailable.insert(model.name.clone(), reason);
        }
    }

    let mut changed = !unavailable.is_empty();
    while changed {
        changed = false;
        for model in ir.models().iter() {
            if unavailable.contains_key(&model.name) {
                continue;
            }
            let blocked = model
                .references()
                .find(|(_, target)| unavailable.contains_key(*target))
                .map(|(field, target)| {
                    format!("field '{}' references {target}, which has no {format} form", field.name)
                });
            if let Some(reason) = blocked {
                unavailable.insert(model.name.clone(), reason);
                changed = true;
            }
        }
    }
    unavailable
}

fn first_violation(ty: &FieldType, xml_rules: bool) -> Option<&'static str> {
    match ty {
        FieldType::Primitive(_) | FieldType::Reference(_) => None,
        FieldType::Optional(inner) => match inner.as_ref() {
            FieldType::Optional(_) => {
                Some("a present-but-absent inner value has no encoding distinct from absence")
            }
            FieldType::List(_) if xml_rules => {
                Some("an absent list and an empty list are the same run of XML elements")
            }
            _ => first_violation(inner, xml_rules),
        },
        FieldType::List(inner) => match inner.as_ref() {
            FieldType::List(_) if xml_rules => {
                Some("nested lists flatten into a single run of XML elements")
            }
            FieldType::Optional(_) if xml_rules => {
                Some("an absent list element leaves no XML element behind")
            }
            _ => first_violation(inner, xml_rules),
        },
    }
}
