//! Data types for test page generation

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::generator::{DOCUMENT_EXTENSION, MANIFEST_FILE_NAME};
use crate::errors::{GeneratorError, GeneratorResult};

/// A named category of conformance tests
///
/// The identifier is opaque: it becomes the stem of the generated file name,
/// and its position in the suite becomes the `[start, end)` range handed to
/// the test namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestGroup(String);

impl TestGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Output file name for this group
    pub fn filename(&self) -> String {
        format!("{}{}", self.0, DOCUMENT_EXTENSION)
    }
}

impl fmt::Display for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestGroup {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One generator definition: which namespace to drive and over which groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Suite name, also used in the "do not edit" banner
    pub name: String,
    /// Page title
    pub title: String,
    /// Closure namespace whose `run(gl, [start, end])` executes the tests
    pub namespace: String,
    /// Ordered test groups
    pub groups: Vec<TestGroup>,
}

impl TestSuite {
    /// Build a suite and check that every group maps to a distinct, valid file name
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        namespace: impl Into<String>,
        groups: Vec<TestGroup>,
    ) -> GeneratorResult<Self> {
        let suite = Self {
            name: name.into(),
            title: title.into(),
            namespace: namespace.into(),
            groups,
        };
        suite.validate()?;
        Ok(suite)
    }

    /// Check group identifiers
    ///
    /// Suites can come from user config files, so the filename invariant is
    /// checked here rather than assumed.
    pub fn validate(&self) -> GeneratorResult<()> {
        let mut seen = HashSet::with_capacity(self.groups.len());

        for group in &self.groups {
            let id = group.as_str();
            let reason = if id.is_empty() {
                Some("identifier is empty")
            } else if id.contains('/') || id.contains('\\') {
                Some("identifier contains a path separator")
            } else if id == "." || id == ".." {
                Some("identifier is a relative path component")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(GeneratorError::InvalidGroup {
                    suite: self.name.clone(),
                    group: id.to_string(),
                    reason: reason.to_string(),
                });
            }

            if !seen.insert(group.filename()) {
                return Err(GeneratorError::DuplicateGroup {
                    suite: self.name.clone(),
                    group: id.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A rendered page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content: String,
}

/// Ordered list of generated file names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub filenames: Vec<String>,
}

impl Manifest {
    pub fn new(filenames: Vec<String>) -> Self {
        Self { filenames }
    }

    /// Newline-joined file names, without a trailing newline
    pub fn contents(&self) -> String {
        self.filenames.join("\n")
    }

    pub fn file_name() -> &'static str {
        MANIFEST_FILE_NAME
    }
}

/// Outcome of a full generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub suite: String,
    pub output_dir: PathBuf,
    pub documents: Vec<String>,
    pub manifest_path: PathBuf,
}

impl GenerationReport {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}
