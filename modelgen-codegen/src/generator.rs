//! Emission driver.
//!
//! [`Generator`] picks the adapter for a language, runs it over every model
//! and collects the text into a [`Definition`]. Nothing is returned until the
//! whole definition has been built, so a failure never yields partial output.
//!
//! A model whose fields have no form in one format (nested lists in XML, for
//! example) keeps its structure and its other formats; only that format's
//! routines are left out, and the gap is recorded as an [`Omission`].

use crate::adapter::{LanguageAdapter, adapter_for};
use crate::config::GeneratorOptions;
use crate::error::CodegenError;
use crate::language::{Format, Language};
use crate::resolve::unavailable_models;
use crate::xsd::XsdGenerator;
use modelgen_schema::{Model, SchemaIr};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Routines left out of a definition because a model has no form in a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    /// Model without routines.
    pub model: String,
    /// Format the routines would have targeted.
    pub format: Format,
    /// Offending field or reference.
    pub reason: String,
}

/// Generated source for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Target language.
    pub language: Language,
    /// Imports, includes and shared helpers.
    pub prelude: String,
    /// Native types for every model.
    pub structure: String,
    /// Serializers for every model, per format.
    pub serializers: BTreeMap<Format, String>,
    /// Deserializers for every model, per format.
    pub deserializers: BTreeMap<Format, String>,
    /// Closing text.
    pub epilogue: String,
    /// Per-format routines that were not generated, in format then model order.
    pub omitted: Vec<Omission>,
    file_stem: String,
}

impl Definition {
    /// Joins every part into one source file.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.prelude);
        output.push_str(&self.structure);
        for format in Format::ALL {
            if let Some(text) = self.serializers.get(&format) {
                output.push_str(text);
            }
            if let Some(text) = self.deserializers.get(&format) {
                output.push_str(text);
            }
        }
        output.push_str(&self.epilogue);
        output
    }

    /// File name the definition is written under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.language.extension())
    }

    /// Writes the rendered definition into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CodegenError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render())?;
        tracing::info!("Wrote {} definition to {}", self.language, path.display());
        Ok(path)
    }
}

/// Main code generator.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with default options.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self {
            ir,
            options: GeneratorOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options in use.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates the full definition for `language`.
    ///
    /// # Errors
    /// Returns `CodegenError` if the language is not implemented, the options
    /// are invalid, a name collides, or a field breaks a rule every format
    /// shares. Format-specific gaps are reported in [`Definition::omitted`].
    pub fn generate_definition(&self, language: Language) -> Result<Definition, CodegenError> {
        tracing::info!(
            "Generating {} definition for {} models",
            language,
            self.ir.models().len()
        );
        self.build(language).inspect_err(|e| {
            tracing::warn!("{} generation failed: {}", language, e);
        })
    }

    /// Generates definitions for every implemented language.
    ///
    /// # Errors
    /// Returns the first `CodegenError` encountered.
    pub fn generate_all(&self) -> Result<Vec<Definition>, CodegenError> {
        Language::IMPLEMENTED
            .iter()
            .map(|language| self.generate_definition(*language))
            .collect()
    }

    /// Generates the XSD document rooted at `root`.
    ///
    /// # Errors
    /// Returns `CodegenError` if `root` is unknown or a reachable field has no
    /// XML form.
    pub fn to_xsd(&self, root: &str) -> Result<String, CodegenError> {
        self.options.validate()?;
        XsdGenerator::new(self.ir, &self.options)
            .generate(root)
            .inspect_err(|e| tracing::warn!("XSD generation for {} failed: {}", root, e))
    }

    fn build(&self, language: Language) -> Result<Definition, CodegenError> {
        self.options.validate()?;
        let adapter = adapter_for(language, self.ir, &self.options)?;
        let models = self.models_for(adapter.as_ref());

        let prelude = adapter.generate_prelude(&models)?;

        let mut structure = adapter.generate_structure_header(&models)?;
        for model in &models {
            tracing::debug!("Emitting {} structure for {}", language, model.name);
            structure.push_str(&adapter.generate_structure(model)?);
        }
        structure.push_str(&adapter.generate_structure_footer(&models)?);

        let mut serializers = BTreeMap::new();
        let mut deserializers = BTreeMap::new();
        let mut omitted = Vec::new();
        for format in Format::ALL {
            let unavailable = unavailable_models(self.ir, format);
            for (model, reason) in &unavailable {
                tracing::warn!("Omitting {} {} routines for {}: {}", language, format, model, reason);
                omitted.push(Omission {
                    model: model.clone(),
                    format,
                    reason: reason.clone(),
                });
            }
            let available: Vec<&Model> = models
                .iter()
                .copied()
                .filter(|model| !unavailable.contains_key(&model.name))
                .collect();

            let mut ser = adapter.generate_format_header(&available, format)?;
            let mut de = String::new();
            for model in &available {
                tracing::trace!("Emitting {} {} routines for {}", language, format, model.name);
                ser.push_str(&adapter.generate_serializer(model, format)?);
                de.push_str(&adapter.generate_deserializer(model, format)?);
            }
            serializers.insert(format, ser);
            deserializers.insert(format, de);
        }

        tracing::info!("Generated {} definition ({} models)", language, models.len());
        Ok(Definition {
            language,
            prelude,
            structure,
            serializers,
            deserializers,
            epilogue: adapter.generate_epilogue(),
            omitted,
            file_stem: self.options.stem().to_string(),
        })
    }

    fn models_for(&self, adapter: &dyn LanguageAdapter) -> Vec<&'a Model> {
        if adapter.orders_by_dependency() {
            self.ir.dependency_order()
        } else {
            self.ir.models().iter().collect()
        }
    }
}
