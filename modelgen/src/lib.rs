//! # Modelgen
//!
//! Schema-driven model generation for Rust and C++.
//!
//! Models are declared once, in a small XML document or built in code, and
//! turned into native structures plus JSON, YAML and XML serializers for
//! every supported language. An XSD describing the XML encoding can be
//! produced from any root model.
//!
//! ## Quick Start
//!
//! ```ignore
//! use modelgen::prelude::*;
//!
//! let models = parse_models(xml)?;
//! let ir = SchemaIr::new(models)?;
//! let generator = Generator::new(&ir);
//!
//! for definition in generator.generate_all()? {
//!     definition.write_to(out_dir)?;
//! }
//! let xsd = generator.to_xsd("Person")?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Model declarations, type expressions and the validated IR
//! - [`codegen`] - Type mapping, language adapters, XSD and the driver

pub mod prelude;

/// Model declarations and the validated IR.
pub mod schema {
    pub use modelgen_schema::*;
}

/// Code and XSD generation.
pub mod codegen {
    pub use modelgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use modelgen_codegen::{
    CodegenError, Definition, Format, Generator, GeneratorOptions, Language, Omission,
    generate_definition, generate_from_file, generate_from_xml, to_xsd,
};
pub use modelgen_schema::{
    Field, FieldType, Model, ModelSet, ParseError, PrimitiveKind, SchemaError, SchemaIr,
    parse_models,
};
