//! Command-line front end: schema → templates (files | stdout)

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tlbt_codegen::{DirectorySink, Generator, GeneratorConfig};
use tlbt_schema::{SchemaIr, load_schema};
use tracing_subscriber::EnvFilter;

/// Generate 010 Editor binary templates from the JSON form of a TL schema
#[derive(Parser, Debug)]
#[command(name = "tlbt", version, about)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// TL schema in JSON form
    #[arg(short, long)]
    input: PathBuf,

    /// abstract types to generate (all types, or the whole schema with --no-recursive, if omitted)
    types: Vec<String>,

    /// write one blob to stdout without generating referenced types
    #[arg(long)]
    no_recursive: bool,

    /// regenerate artifacts that already exist in the output directory
    #[arg(long)]
    force: bool,

    /// output directory for generated artifacts
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// artifact file name prefix
    #[arg(long, default_value = "struct_")]
    prefix: String,

    /// artifact file extension
    #[arg(long, default_value = "bt")]
    extension: String,

    /// neither write nor include the primitive prelude
    #[arg(long)]
    no_prelude: bool,

    /// more logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list abstract types with their constructor counts
    Types,
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .recursive(!self.no_recursive)
            .force(self.force)
            .file_prefix(self.prefix.as_str())
            .extension(self.extension.as_str())
            .prelude(!self.no_prelude)
    }

    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&mut stdout.lock())
    }

    /// Runs the command, sending stdout output to `out`.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let schema = load_schema(&self.input)
            .with_context(|| format!("failed to load schema {}", self.input.display()))?;
        let ir = SchemaIr::from_schema(&schema)
            .with_context(|| format!("failed to resolve schema {}", self.input.display()))?;

        if let Some(Command::Types) = &self.cmd {
            for (type_name, indices) in &ir.abstract_types {
                writeln!(out, "{}\t{}", type_name, indices.len())?;
            }
            return Ok(());
        }

        let generator = Generator::with_config(&ir, self.config());

        if self.no_recursive {
            let blob = if self.types.is_empty() {
                generator.render_schema()
            } else {
                generator.render_types(&self.types)
            };
            out.write_all(blob.as_bytes())?;
            return Ok(());
        }

        let roots: Vec<String> = if self.types.is_empty() {
            ir.abstract_types.keys().cloned().collect()
        } else {
            self.types.clone()
        };

        let mut sink = DirectorySink::new(&self.out_dir);
        let report = generator
            .generate_into(&roots, &mut sink)
            .with_context(|| format!("failed to generate into {}", self.out_dir.display()))?;

        for file_name in &report.generated {
            tracing::info!("wrote {}", sink.dir().join(file_name).display());
        }
        for file_name in &report.skipped {
            tracing::info!("kept {}", file_name);
        }
        tracing::info!(
            "{} generated, {} skipped",
            report.generated.len(),
            report.skipped.len()
        );
        Ok(())
    }
}
