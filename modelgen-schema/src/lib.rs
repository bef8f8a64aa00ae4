//! # Modelgen Schema
//!
//! Language-agnostic model IR and its analysis.
//!
//! This crate provides:
//! - The model IR (models, ordered fields, field types)
//! - Model set validation
//! - Reference-graph cycle analysis
//! - A textual declaration front end producing the IR

pub mod error;
pub mod graph;
pub mod ir;
pub mod models;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use graph::CycleAnalysis;
pub use ir::SchemaIr;
pub use models::{Field, Model, ModelSet};
pub use parser::{ParseOptions, parse_models, parse_models_with, parse_type_expr};
pub use types::{FieldType, PrimitiveKind};
pub use validation::{is_identifier, validate_model_set};
