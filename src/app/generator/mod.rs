//! Conformance test page generation
//!
//! Produces one HTML page per test group of a suite plus a manifest listing
//! the pages in suite order. Everything is written synchronously, one file at
//! a time; the first failed write aborts the run and leaves earlier pages in
//! place. The manifest is only written once every page has been written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use webgl_devtools::app::generator::{builtin_suites, TestManifestGenerator};
//!
//! let suite = builtin_suites().remove(0);
//! let generator = TestManifestGenerator::new(suite, ".");
//! let report = generator.run()?;
//! println!("wrote {} pages", report.document_count());
//! # Ok::<(), webgl_devtools::errors::GeneratorError>(())
//! ```

pub mod suites;
pub mod template;
pub mod types;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{GeneratorError, GeneratorResult};

pub use suites::builtin_suites;
pub use template::PageTemplate;
pub use types::{GeneratedDocument, GenerationReport, Manifest, TestGroup, TestSuite};

/// Writes the pages and manifest for a single suite
#[derive(Debug, Clone)]
pub struct TestManifestGenerator {
    suite: TestSuite,
    output_dir: PathBuf,
}

impl TestManifestGenerator {
    pub fn new(suite: TestSuite, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            suite,
            output_dir: output_dir.into(),
        }
    }

    pub fn suite(&self) -> &TestSuite {
        &self.suite
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a group
    pub fn generate_filename(group: &TestGroup) -> String {
        group.filename()
    }

    /// Render the page for groups `[start, end)`
    pub fn render(&self, start: usize, end: usize) -> String {
        PageTemplate::new(&self.suite).render(start, end)
    }

    /// Render every page without touching the filesystem
    pub fn documents(&self) -> Vec<GeneratedDocument> {
        self.suite
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| GeneratedDocument {
                filename: Self::generate_filename(group),
                content: self.render(index, index + 1),
            })
            .collect()
    }

    /// Create or truncate `filename` in the output directory and write `content`
    pub fn write_document(&self, filename: &str, content: &str) -> GeneratorResult<PathBuf> {
        let path = self.output_dir.join(filename);
        write_file(&path, content)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write one page per group, returning file names in suite order
    pub fn generate_all(&self) -> GeneratorResult<Vec<String>> {
        let mut filenames = Vec::with_capacity(self.suite.len());

        for document in self.documents() {
            self.write_document(&document.filename, &document.content)?;
            filenames.push(document.filename);
        }

        Ok(filenames)
    }

    /// Write the manifest, replacing any previous one
    pub fn write_manifest(&self, filenames: &[String]) -> GeneratorResult<PathBuf> {
        let manifest = Manifest::new(filenames.to_vec());
        self.write_document(Manifest::file_name(), &manifest.contents())
    }

    /// Generate every page, then the manifest
    pub fn run(&self) -> GeneratorResult<GenerationReport> {
        info!(
            "Generating {} pages for suite '{}' into {}",
            self.suite.len(),
            self.suite.name,
            self.output_dir.display()
        );

        let documents = self.generate_all()?;
        let manifest_path = self.write_manifest(&documents)?;

        info!(
            "Wrote {} pages and {}",
            documents.len(),
            manifest_path.display()
        );

        Ok(GenerationReport {
            suite: self.suite.name.clone(),
            output_dir: self.output_dir.clone(),
            documents,
            manifest_path,
        })
    }
}

/// Look up a suite by name
pub fn find_suite<'a>(suites: &'a [TestSuite], name: &str) -> GeneratorResult<&'a TestSuite> {
    suites
        .iter()
        .find(|suite| suite.name == name)
        .ok_or_else(|| GeneratorError::UnknownSuite {
            name: name.to_string(),
        })
}

fn write_file(path: &Path, content: &str) -> GeneratorResult<()> {
    let to_error = |source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(to_error)?;
    file.write_all(content.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)
}
