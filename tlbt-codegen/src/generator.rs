//! Recursive template generation.
//!
//! [`Generator::generate`] produces one artifact per abstract type. With
//! recursion enabled it first generates every abstract type the constructors
//! reference, depth-first, tracking the active path in a
//! [`GenerationContext`] so a type reached again before it is finished is
//! reported as a cycle instead of looping. Artifacts already produced in the
//! run, or already present in the output, are skipped.

use crate::bt::{ConstructorEmitter, PreludeEmitter, UnionTemplate, VectorTemplate};
use crate::config::{GeneratorConfig, header_guard};
use crate::error::CodegenError;
use crate::output::{Artifact, ArtifactSink, persist};
use indexmap::IndexSet;
use std::collections::HashSet;
use tlbt_schema::ir::{SchemaIr, template_ident, vector_ident};

/// Result of one [`Generator::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new artifact was produced.
    Generated(String),
    /// The artifact was already materialized; nothing was visited.
    Skipped(String),
}

impl Outcome {
    /// Returns the artifact file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Generated(name) | Self::Skipped(name) => name,
        }
    }

    /// Returns true if a new artifact was produced.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// State of one generation run.
#[derive(Debug, Default)]
pub struct GenerationContext {
    path: Vec<String>,
    existing: HashSet<String>,
    generated: HashSet<String>,
    artifacts: Vec<Artifact>,
    skipped: Vec<String>,
}

impl GenerationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context aware of artifacts materialized by earlier runs.
    #[must_use]
    pub fn with_existing(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            existing: names.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Types currently being generated, outermost first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Artifacts produced so far, dependencies before dependents.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Consumes the context, returning the produced artifacts.
    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }

    /// File names skipped because they were already materialized.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Returns true if the file was produced in this run.
    #[must_use]
    pub fn is_generated(&self, file_name: &str) -> bool {
        self.generated.contains(file_name)
    }

    /// Returns true if the file existed before this run.
    #[must_use]
    pub fn is_existing(&self, file_name: &str) -> bool {
        self.existing.contains(file_name)
    }

    fn record(&mut self, artifact: Artifact) {
        self.generated.insert(artifact.file_name.clone());
        self.artifacts.push(artifact);
    }
}

/// Summary of a persisted run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files written.
    pub generated: Vec<String>,
    /// Files skipped because they already existed.
    pub skipped: Vec<String>,
}

/// Binary-template generator over a resolved schema.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self::with_config(ir, GeneratorConfig::default())
    }

    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn with_config(ir: &'a SchemaIr, config: GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Creates a context seeded with the artifacts already in a sink.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the sink cannot be listed.
    pub fn context_for<S: ArtifactSink + ?Sized>(
        &self,
        sink: &S,
    ) -> Result<GenerationContext, CodegenError> {
        Ok(GenerationContext::with_existing(sink.existing()?))
    }

    /// Generates the artifact of one abstract type, and with recursion
    /// enabled the artifacts of every type it references.
    ///
    /// # Errors
    /// Returns `CodegenError::RecursionDetected` if a type is reached again
    /// while it is still on the active path.
    pub fn generate(
        &self,
        type_name: &str,
        ctx: &mut GenerationContext,
    ) -> Result<Outcome, CodegenError> {
        let file_name = self.config.artifact_name(type_name);
        if self.is_materialized(&file_name, ctx) {
            tracing::debug!("Skipping {} ({} already generated)", type_name, file_name);
            ctx.skipped.push(file_name.clone());
            return Ok(Outcome::Skipped(file_name));
        }

        if ctx.path.iter().any(|t| t == type_name) {
            return Err(CodegenError::RecursionDetected {
                type_name: type_name.to_string(),
                path: ctx.path.join(" -> "),
            });
        }

        ctx.path.push(type_name.to_string());
        let result = self.generate_dependencies(type_name, ctx);
        ctx.path.pop();
        let includes = result?;

        self.ensure_prelude(ctx);

        let guard = header_guard(&file_name);
        let mut contents = String::new();
        contents.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));
        if self.config.prelude {
            contents.push_str(&format!("#include \"{}\"\n", self.config.prelude_name()));
        }
        for include in &includes {
            contents.push_str(&format!("#include \"{}\"\n", include));
        }
        if self.config.prelude || !includes.is_empty() {
            contents.push('\n');
        }
        self.emit_type(type_name, &mut contents);
        contents.push_str(&format!("#endif // {}\n", guard));

        tracing::info!("Generated {} for {}", file_name, type_name);
        ctx.record(Artifact {
            type_name: Some(type_name.to_string()),
            file_name: file_name.clone(),
            contents,
        });
        Ok(Outcome::Generated(file_name))
    }

    /// Generates every root type into one context, then persists the new
    /// artifacts. Nothing is written if any root fails.
    ///
    /// # Errors
    /// Returns `CodegenError` if no root is given, a cycle is detected, or
    /// the sink fails.
    pub fn generate_into<T, S>(
        &self,
        type_names: &[T],
        sink: &mut S,
    ) -> Result<GenerationReport, CodegenError>
    where
        T: AsRef<str>,
        S: ArtifactSink + ?Sized,
    {
        if type_names.is_empty() {
            return Err(CodegenError::generation("no type names to generate"));
        }

        let mut ctx = self.context_for(sink)?;
        for type_name in type_names {
            let type_name = type_name.as_ref();
            if !self.ir.has_type(type_name) {
                tracing::warn!("Type '{}' has no constructors", type_name);
            }
            self.generate(type_name, &mut ctx)?;
        }

        persist(ctx.artifacts(), sink)?;

        Ok(GenerationReport {
            generated: ctx.artifacts.iter().map(|a| a.file_name.clone()).collect(),
            skipped: ctx.skipped,
        })
    }

    /// Renders one abstract type as a single self-contained blob, without
    /// generating its dependencies.
    #[must_use]
    pub fn render_type(&self, type_name: &str) -> String {
        self.render_types(&[type_name])
    }

    /// Renders several abstract types into one blob sharing a single prelude.
    ///
    /// Types rendered in the blob are declared up front and never included.
    #[must_use]
    pub fn render_types<T: AsRef<str>>(&self, type_names: &[T]) -> String {
        let mut output = String::new();
        if self.config.prelude {
            output.push_str(&self.prelude_block());
        }

        let inline: IndexSet<&str> = type_names.iter().map(|t| t.as_ref()).collect();
        let includes: IndexSet<String> = inline
            .iter()
            .flat_map(|type_name| self.dependencies_of(type_name))
            .filter(|dep| !inline.contains(*dep))
            .map(|dep| self.config.artifact_name(dep))
            .collect();
        for include in &includes {
            output.push_str(&format!("#include \"{}\"\n", include));
        }
        if !includes.is_empty() {
            output.push('\n');
        }

        for type_name in &inline {
            self.emit_declarations(type_name, &mut output);
        }
        output.push('\n');

        for type_name in &inline {
            self.emit_definitions(type_name, &mut output);
        }
        output
    }

    /// Renders the whole schema as one blob: every constructor, standalone
    /// ones included, then every abstract type. Referenced types with no
    /// constructors get an empty union so every name is defined.
    #[must_use]
    pub fn render_schema(&self) -> String {
        let mut output = String::new();
        if self.config.prelude {
            output.push_str(&self.prelude_block());
        }

        let mut types: IndexSet<&str> = self.ir.abstract_types.keys().map(String::as_str).collect();
        for ctor in &self.ir.constructors {
            types.extend(ctor.dependencies());
        }

        for type_name in &types {
            self.emit_declarations(type_name, &mut output);
        }
        output.push('\n');

        let emitter = ConstructorEmitter::new(&self.config);
        for ctor in &self.ir.constructors {
            output.push_str(&emitter.emit(ctor));
        }

        for type_name in &types {
            let union = UnionTemplate::new(type_name, self.ir.constructors_of(type_name));
            output.push_str(&union.render(&self.config.indent));
            output.push_str(&VectorTemplate::for_type(type_name).render(&self.config.indent));
        }

        output
    }

    fn is_materialized(&self, file_name: &str, ctx: &GenerationContext) -> bool {
        ctx.is_generated(file_name) || (!self.config.force && ctx.is_existing(file_name))
    }

    /// Returns the include list of a type, generating each dependency first
    /// when recursion is enabled.
    fn generate_dependencies(
        &self,
        type_name: &str,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<String>, CodegenError> {
        let mut includes = Vec::new();
        for dep in self.dependencies_of(type_name) {
            if self.config.recursive {
                tracing::debug!("{} references {}", type_name, dep);
                self.generate(dep, ctx)?;
            }
            includes.push(self.config.artifact_name(dep));
        }
        Ok(includes)
    }

    /// Distinct types referenced by the constructors of a type, excluding
    /// the type itself.
    fn dependencies_of(&self, type_name: &str) -> IndexSet<&'a str> {
        self.ir
            .constructors_of(type_name)
            .into_iter()
            .flat_map(|ctor| ctor.dependencies())
            .filter(|dep| *dep != type_name)
            .collect()
    }

    fn emit_type(&self, type_name: &str, output: &mut String) {
        self.emit_declarations(type_name, output);
        output.push('\n');
        self.emit_definitions(type_name, output);
    }

    fn emit_declarations(&self, type_name: &str, output: &mut String) {
        let ident = template_ident(type_name);
        output.push_str(&format!(
            "struct {};\nstruct {};\n",
            ident,
            vector_ident(&ident)
        ));
    }

    fn emit_definitions(&self, type_name: &str, output: &mut String) {
        let indent = self.config.indent.as_str();
        let emitter = ConstructorEmitter::new(&self.config);
        for ctor in self.ir.constructors_of(type_name) {
            output.push_str(&emitter.emit(ctor));
        }

        let union = UnionTemplate::new(type_name, self.ir.constructors_of(type_name));
        output.push_str(&union.render(indent));
        output.push_str(&VectorTemplate::for_type(type_name).render(indent));
    }

    fn prelude_block(&self) -> String {
        let guard = header_guard(&self.config.prelude_name());
        let mut output = String::new();
        output.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));
        output.push_str(&PreludeEmitter::new(&self.config).emit());
        output.push_str(&format!("#endif // {}\n\n", guard));
        output
    }

    fn ensure_prelude(&self, ctx: &mut GenerationContext) {
        if !self.config.prelude {
            return;
        }
        let file_name = self.config.prelude_name();
        if self.is_materialized(&file_name, ctx) {
            return;
        }
        tracing::info!("Generated {}", file_name);
        ctx.record(Artifact {
            type_name: None,
            file_name,
            contents: self.prelude_block(),
        });
    }
}
