//! Artifact persistence.
//!
//! Generation itself is pure: it fills a
//! [`GenerationContext`](crate::generator::GenerationContext) with artifacts.
//! A sink reports which artifacts already exist before a run and persists the
//! new ones after it.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Abstract type the artifact was generated for; `None` for the prelude.
    pub type_name: Option<String>,
    /// Output file name.
    pub file_name: String,
    /// Template text.
    pub contents: String,
}

/// Destination of generated artifacts.
pub trait ArtifactSink {
    /// Returns the file names of artifacts already materialized.
    ///
    /// # Errors
    /// Returns an IO error if the destination cannot be listed.
    fn existing(&self) -> io::Result<Vec<String>>;

    /// Persists one artifact.
    ///
    /// # Errors
    /// Returns an IO error if the artifact cannot be written.
    fn write(&mut self, artifact: &Artifact) -> io::Result<()>;
}

/// Sink writing artifacts as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink for the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn existing(&self) -> io::Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn write(&mut self, artifact: &Artifact) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(&artifact.file_name), &artifact.contents)
    }
}

/// Sink keeping artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of a persisted file.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    /// Returns the persisted file names in sorted order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Returns the number of persisted files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing has been persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn existing(&self) -> io::Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn write(&mut self, artifact: &Artifact) -> io::Result<()> {
        self.files
            .insert(artifact.file_name.clone(), artifact.contents.clone());
        Ok(())
    }
}

/// Persists artifacts to a sink in order.
///
/// # Errors
/// Returns the first IO error raised by the sink.
pub fn persist<'a, S: ArtifactSink + ?Sized>(
    artifacts: impl IntoIterator<Item = &'a Artifact>,
    sink: &mut S,
) -> io::Result<usize> {
    let mut count = 0;
    for artifact in artifacts {
        sink.write(artifact)?;
        tracing::debug!("Wrote {}", artifact.file_name);
        count += 1;
    }
    Ok(count)
}
