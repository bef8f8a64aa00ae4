//! Target language and serialization format identifiers.

use crate::error::CodegenError;
use std::fmt;
use std::str::FromStr;

/// Target languages known to the generator.
///
/// Only some are implemented; asking for the others fails with
/// [`CodegenError::UnsupportedLanguage`] instead of producing partial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    /// Rust with the serde family (serde_json, serde_yaml, quick-xml).
    Rust,
    /// C++17 with nlohmann/json, yaml-cpp and rapidxml.
    Cpp,
    /// Java (declared, not implemented).
    Java,
    /// Go (declared, not implemented).
    Go,
    /// C# (declared, not implemented).
    CSharp,
    /// Swift (declared, not implemented).
    Swift,
}

impl Language {
    /// Every declared language.
    pub const ALL: [Self; 6] = [
        Self::Rust,
        Self::Cpp,
        Self::Java,
        Self::Go,
        Self::CSharp,
        Self::Swift,
    ];

    /// Languages with a working adapter.
    pub const IMPLEMENTED: [Self; 2] = [Self::Rust, Self::Cpp];

    /// Returns the canonical identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Go => "go",
            Self::CSharp => "csharp",
            Self::Swift => "swift",
        }
    }

    /// Returns true if an adapter exists for the language.
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Rust | Self::Cpp)
    }

    /// File extension of generated sources.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Cpp => "hpp",
            Self::Java => "java",
            Self::Go => "go",
            Self::CSharp => "cs",
            Self::Swift => "swift",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            "go" | "golang" => Ok(Self::Go),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "swift" => Ok(Self::Swift),
            _ => Err(CodegenError::UnsupportedLanguage {
                language: s.to_string(),
            }),
        }
    }
}

/// Serialization formats every adapter emits code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
    /// XML; element order follows field order.
    Xml,
}

impl Format {
    /// Every format, in emission order.
    pub const ALL: [Self; 3] = [Self::Json, Self::Yaml, Self::Xml];

    /// Returns the canonical identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "xml" => Ok(Self::Xml),
            _ => Err(CodegenError::generation(format!("unknown format '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("rust".parse::<Language>().ok(), Some(Language::Rust));
        assert_eq!("C++".parse::<Language>().ok(), Some(Language::Cpp));
        assert_eq!("Java".parse::<Language>().ok(), Some(Language::Java));
        assert_eq!("C#".parse::<Language>().ok(), Some(Language::CSharp));
        assert_eq!(Language::CSharp.extension(), "cs");
        assert!(matches!(
            "cobol".parse::<Language>(),
            Err(CodegenError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_language_implemented() {
        for language in Language::ALL {
            assert_eq!(
                language.is_implemented(),
                Language::IMPLEMENTED.contains(&language)
            );
            assert_eq!(language.name().parse::<Language>().ok(), Some(language));
        }
    }

    #[test]
    fn test_format_parse_and_display() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>().ok(), Some(format));
        }
        assert_eq!("yml".parse::<Format>().ok(), Some(Format::Yaml));
        assert!("toml".parse::<Format>().is_err());
    }
}
