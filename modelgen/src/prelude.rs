//! Prelude module for convenient imports.
//!
//! ```ignore
//! use modelgen::prelude::*;
//! ```

// Schema types
pub use modelgen_schema::{
    Field, FieldType, Model, ModelSet, ParseError, ParseOptions, PrimitiveKind, SchemaError,
    SchemaIr, parse_models, parse_models_with,
};

// Generation types
pub use modelgen_codegen::{
    CodegenError, Definition, Format, Generator, GeneratorOptions, Language, LanguageAdapter,
    XsdGenerator, adapter_for,
};
