//! Closure tooling configuration and the built-in target table

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::compiler;
use crate::errors::{CompilerError, CompilerResult};

/// Closure compiler optimization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationLevel {
    WhitespaceOnly,
    SimpleOptimizations,
    AdvancedOptimizations,
}

impl CompilationLevel {
    /// All levels in the order local reports list them
    pub const ALL: [CompilationLevel; 3] = [
        CompilationLevel::WhitespaceOnly,
        CompilationLevel::SimpleOptimizations,
        CompilationLevel::AdvancedOptimizations,
    ];

    /// Flag value understood by the compiler
    pub fn as_flag(&self) -> &'static str {
        match self {
            CompilationLevel::WhitespaceOnly => "WHITESPACE_ONLY",
            CompilationLevel::SimpleOptimizations => "SIMPLE_OPTIMIZATIONS",
            CompilationLevel::AdvancedOptimizations => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

impl fmt::Display for CompilationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// A short target name and the closure namespace it compiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileTarget {
    pub name: String,
    pub namespace: String,
}

impl CompileTarget {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Dependency list written by the closure builder
    pub fn dep_filename(&self) -> String {
        format!("{}{}", self.name, compiler::DEP_FILE_SUFFIX)
    }

    /// Compiler output captured for this target
    pub fn compiled_filename(&self) -> String {
        format!("{}{}", self.name, compiler::COMPILED_FILE_SUFFIX)
    }
}

/// Paths and programs used to drive the closure tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Directory the tools run in and where outputs are written
    pub working_dir: PathBuf,
    /// Python interpreter for closurebuilder, depswriter and the style tools
    pub python: String,
    /// Java launcher
    pub java: String,
    /// Closure compiler jar
    pub compiler_jar: PathBuf,
    /// Closure library checkout
    pub closure_library: PathBuf,
    /// Externs passed to every target build
    pub externs: PathBuf,
    /// Optimization level for target builds
    pub compilation_level: CompilationLevel,
    /// Target table, in build order
    pub targets: Vec<CompileTarget>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            python: compiler::DEFAULT_PYTHON.to_string(),
            java: compiler::DEFAULT_JAVA.to_string(),
            compiler_jar: PathBuf::from(compiler::DEFAULT_COMPILER_JAR),
            closure_library: PathBuf::from(compiler::DEFAULT_CLOSURE_LIBRARY),
            externs: PathBuf::from(compiler::DEFAULT_EXTERNS),
            compilation_level: CompilationLevel::AdvancedOptimizations,
            targets: builtin_targets(),
        }
    }
}

impl CompilerConfig {
    /// Find a target by its short name
    pub fn target(&self, name: &str) -> CompilerResult<&CompileTarget> {
        self.targets
            .iter()
            .find(|target| target.name == name)
            .ok_or_else(|| CompilerError::UnknownTarget {
                name: name.to_string(),
            })
    }

    /// Resolve a path relative to the working directory
    pub fn in_working_dir(&self, file: impl AsRef<std::path::Path>) -> PathBuf {
        self.working_dir.join(file)
    }
}

/// Targets of the dEQP port
pub fn builtin_targets() -> Vec<CompileTarget> {
    [
        ("textureformat", "functional.gles3.es3fTextureFormatTests"),
        ("fboCompletenessTests", "functional.gles3.es3fFboCompletenessTests"),
        ("fbomultisampletests", "functional.gles3.es3fFboMultisampleTests"),
        ("fbostencilbuffertests", "functional.gles3.es3fFboStencilbufferTests"),
        ("fragmentoutput", "functional.gles3.es3fFragmentOutputTests"),
        ("framebufferblittests", "functional.gles3.es3fFramebufferBlitTests"),
        ("instancedrenderingtests", "functional.gles3.es3fInstancedRenderingTests"),
        ("pixelBufferObjectTest", "functional.gles3.es3fPixelBufferObjectTest"),
        ("primitiverestarttests", "functional.gles3.es3fPrimitiveRestartTests"),
        ("samplerobjecttests", "functional.gles3.es3fSamplerObjectTests"),
        ("testfloats", "framework.common.tcuFloat"),
        ("transformFeedbackTests", "functional.gles3.es3fTransformFeedbackTests"),
        ("uniformapi", "functional.gles3.es3fUniformApiTests"),
        ("uniformbuffers", "functional.gles3.es3fUniformBlockTests"),
        ("glsvaotests", "modules.shared.glsVertexArrayTests"),
        ("vertexarrays", "functional.gles3.es3fVertexArrayTests"),
        ("shaderlibrary", "modules.shared.glsShaderLibrary"),
        ("matrix", "framework.common.tcuMatrix"),
        ("fragOps", "framework.referencerenderer.rrFragmentOperations"),
        ("renderer", "framework.referencerenderer.rrRenderer"),
        ("matrixUtil", "framework.common.tcuMatrixUtil"),
    ]
    .into_iter()
    .map(|(name, namespace)| CompileTarget::new(name, namespace))
    .collect()
}
