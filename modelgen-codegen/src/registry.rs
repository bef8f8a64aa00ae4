//! Type mapping registry.
//!
//! Static, per-language tables from IR kinds to native type spellings and the
//! imports (Rust `use` paths, C++ headers) those spellings need. The tables
//! are configuration: nothing here changes at runtime.

use crate::error::CodegenError;
use crate::language::Language;
use crate::resolve::Shape;
use modelgen_schema::{FieldType, PrimitiveKind};
use std::collections::BTreeSet;

/// Native spelling of one primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveMapping {
    /// Kind being mapped.
    pub kind: PrimitiveKind,
    /// Native type text.
    pub spelling: &'static str,
    /// Imports the spelling requires.
    pub imports: &'static [&'static str],
}

/// A generic wrapper type such as `Option<T>` or `std::vector<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapper {
    /// Text before the wrapped type.
    pub prefix: &'static str,
    /// Text after the wrapped type.
    pub suffix: &'static str,
    /// Imports the wrapper requires.
    pub imports: &'static [&'static str],
}

impl Wrapper {
    fn wrap(&self, inner: &str) -> String {
        format!("{}{}{}", self.prefix, inner, self.suffix)
    }
}

/// Mapping table for one language.
#[derive(Debug)]
pub struct TypeMapping {
    /// Language the table describes.
    pub language: Language,
    /// One entry per primitive kind.
    pub primitives: &'static [PrimitiveMapping],
    /// Representation of `Optional(T)`.
    pub optional: Wrapper,
    /// Representation of `List(T)`.
    pub list: Wrapper,
    /// Indirection used to break reference cycles, if the language has one.
    pub indirect: Option<Wrapper>,
}

/// A spelled native type plus the imports it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NativeType {
    /// Type text.
    pub text: String,
    /// Required imports, sorted.
    pub imports: BTreeSet<&'static str>,
}

impl TypeMapping {
    /// Looks up the entry for a primitive kind.
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> Option<&PrimitiveMapping> {
        self.primitives
            .iter()
            .find(|m| m.kind == kind && !m.spelling.is_empty())
    }

    /// Checks that every primitive kind has a non-empty entry.
    ///
    /// # Errors
    /// Returns `CodegenError::IncompleteMapping` naming the first missing kind.
    pub fn ensure_complete(&self) -> Result<(), CodegenError> {
        for kind in PrimitiveKind::ALL {
            if self.primitive(kind).is_none() {
                return Err(CodegenError::IncompleteMapping {
                    language: self.language.to_string(),
                    kind: kind.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Spells a resolved shape.
    ///
    /// Returns the primitive kind that has no entry if spelling fails.
    pub fn spell(&self, shape: &Shape) -> Result<NativeType, PrimitiveKind> {
        let mut imports = BTreeSet::new();
        let text = self.spell_into(shape, &mut imports)?;
        Ok(NativeType { text, imports })
    }

    fn spell_into(
        &self,
        shape: &Shape,
        imports: &mut BTreeSet<&'static str>,
    ) -> Result<String, PrimitiveKind> {
        match shape {
            Shape::Primitive(kind) => {
                let mapping = self.primitive(*kind).ok_or(*kind)?;
                imports.extend(mapping.imports);
                Ok(mapping.spelling.to_string())
            }
            Shape::Model { native, indirect, .. } => match (indirect, &self.indirect) {
                (true, Some(wrapper)) => {
                    imports.extend(wrapper.imports);
                    Ok(wrapper.wrap(native))
                }
                _ => Ok(native.clone()),
            },
            Shape::Optional(inner) => {
                let inner = self.spell_into(inner, imports)?;
                imports.extend(self.optional.imports);
                Ok(self.optional.wrap(&inner))
            }
            Shape::List(inner) => {
                let inner = self.spell_into(inner, imports)?;
                imports.extend(self.list.imports);
                Ok(self.list.wrap(&inner))
            }
        }
    }
}

const CSTDINT: &[&str] = &["<cstdint>"];

static RUST_PRIMITIVES: [PrimitiveMapping; 13] = [
    PrimitiveMapping { kind: PrimitiveKind::Bool, spelling: "bool", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::I8, spelling: "i8", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::I16, spelling: "i16", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::I32, spelling: "i32", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::I64, spelling: "i64", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::U8, spelling: "u8", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::U16, spelling: "u16", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::U32, spelling: "u32", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::U64, spelling: "u64", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::F32, spelling: "f32", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::F64, spelling: "f64", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::String, spelling: "String", imports: &[] },
    // Generated newtype, see `rust::support`.
    PrimitiveMapping { kind: PrimitiveKind::Bytes, spelling: "HexBytes", imports: &[] },
];

static CPP_PRIMITIVES: [PrimitiveMapping; 13] = [
    PrimitiveMapping { kind: PrimitiveKind::Bool, spelling: "bool", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::I8, spelling: "std::int8_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::I16, spelling: "std::int16_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::I32, spelling: "std::int32_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::I64, spelling: "std::int64_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::U8, spelling: "std::uint8_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::U16, spelling: "std::uint16_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::U32, spelling: "std::uint32_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::U64, spelling: "std::uint64_t", imports: CSTDINT },
    PrimitiveMapping { kind: PrimitiveKind::F32, spelling: "float", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::F64, spelling: "double", imports: &[] },
    PrimitiveMapping { kind: PrimitiveKind::String, spelling: "std::string", imports: &["<string>"] },
    PrimitiveMapping {
        kind: PrimitiveKind::Bytes,
        spelling: "std::vector<std::uint8_t>",
        imports: &["<cstdint>", "<vector>"],
    },
];

/// Rust mapping: prelude types only, so no imports.
pub static RUST_MAPPING: TypeMapping = TypeMapping {
    language: Language::Rust,
    primitives: &RUST_PRIMITIVES,
    optional: Wrapper { prefix: "Option<", suffix: ">", imports: &[] },
    list: Wrapper { prefix: "Vec<", suffix: ">", imports: &[] },
    indirect: Some(Wrapper { prefix: "Box<", suffix: ">", imports: &[] }),
};

/// C++17 mapping.
pub static CPP_MAPPING: TypeMapping = TypeMapping {
    language: Language::Cpp,
    primitives: &CPP_PRIMITIVES,
    optional: Wrapper { prefix: "std::optional<", suffix: ">", imports: &["<optional>"] },
    list: Wrapper { prefix: "std::vector<", suffix: ">", imports: &["<vector>"] },
    indirect: Some(Wrapper { prefix: "std::shared_ptr<", suffix: ">", imports: &["<memory>"] }),
};

/// Returns the mapping table for a language.
///
/// # Errors
/// Returns `CodegenError::UnsupportedLanguage` for declared but
/// unimplemented languages.
pub fn mapping_for(language: Language) -> Result<&'static TypeMapping, CodegenError> {
    match language {
        Language::Rust => Ok(&RUST_MAPPING),
        Language::Cpp => Ok(&CPP_MAPPING),
        Language::Java | Language::Go | Language::CSharp | Language::Swift => {
            Err(CodegenError::UnsupportedLanguage {
                language: language.to_string(),
            })
        }
    }
}

/// Spells a field type for `language`, naming models by their IR name and
/// holding every reference directly.
///
/// Adapters refine this with their own naming and cycle strategy; this is
/// the registry's language-level view.
///
/// # Errors
/// Returns `CodegenError::UnsupportedLanguage` for unimplemented languages
/// and `CodegenError::IncompleteMapping` if a primitive has no entry.
pub fn native_spelling(language: Language, ty: &FieldType) -> Result<NativeType, CodegenError> {
    let mapping = mapping_for(language)?;
    mapping
        .spell(&Shape::direct(ty))
        .map_err(|kind| CodegenError::IncompleteMapping {
            language: language.to_string(),
            kind: kind.to_string(),
        })
}

/// XSD built-in type for a primitive kind.
///
/// Integers map to the XSD type of exactly the same range; `bytes` is
/// hex-encoded everywhere, so it maps to `xs:hexBinary`.
#[must_use]
pub const fn xsd_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => "xs:boolean",
        PrimitiveKind::I8 => "xs:byte",
        PrimitiveKind::I16 => "xs:short",
        PrimitiveKind::I32 => "xs:int",
        PrimitiveKind::I64 => "xs:long",
        PrimitiveKind::U8 => "xs:unsignedByte",
        PrimitiveKind::U16 => "xs:unsignedShort",
        PrimitiveKind::U32 => "xs:unsignedInt",
        PrimitiveKind::U64 => "xs:unsignedLong",
        PrimitiveKind::F32 => "xs:float",
        PrimitiveKind::F64 => "xs:double",
        PrimitiveKind::String => "xs:string",
        PrimitiveKind::Bytes => "xs:hexBinary",
    }
}

/// Runs the completeness check over every implemented language and the XSD
/// table.
///
/// # Errors
/// Returns `CodegenError::IncompleteMapping` for the first gap found.
pub fn verify_registry() -> Result<(), CodegenError> {
    for language in Language::IMPLEMENTED {
        mapping_for(language)?.ensure_complete()?;
    }
    for kind in PrimitiveKind::ALL {
        if xsd_type(kind).is_empty() {
            return Err(CodegenError::IncompleteMapping {
                language: "xsd".to_string(),
                kind: kind.to_string(),
            });
        }
    }
    Ok(())
}
