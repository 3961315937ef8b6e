//! Integration tests for the closure compiler driver
//!
//! The python and java tools are replaced by small shell scripts so the whole
//! build pipeline can run without a closure checkout.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;
use webgl_devtools::app::compiler::{
    compile_directory, ClosureDriver, CompilationLevel, CompileTarget, CompilerConfig,
    LocalCompileOptions,
};
use webgl_devtools::errors::CompilerError;

// Freshly written scripts can fail to exec with ETXTBSY while another test
// thread is forking, so tests that spawn tools run one at a time.
static TOOLS: Mutex<()> = Mutex::new(());

fn lock_tools() -> MutexGuard<'static, ()> {
    TOOLS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// A workspace with stand-ins for closurebuilder, depswriter and java
fn fake_toolchain(temp_dir: &TempDir) -> CompilerConfig {
    let library = temp_dir.path().join("closure-library");
    let build = library.join("closure/bin/build");
    fs::create_dir_all(&build).unwrap();
    fs::write(
        build.join("closurebuilder.py"),
        "printf 'src/common.js\\nsrc/%s.js\\n' \"$(echo \"$3\" | sed 's/.*\\.//')\"\n",
    )
    .unwrap();
    fs::write(
        build.join("depswriter.py"),
        "echo \"goog.addDependency('src/common.js', [], []);\"\n",
    )
    .unwrap();

    let java = temp_dir.path().join("fake-java");
    write_executable(
        &java,
        "#!/bin/sh\ncase \"$*\" in\n  *ns.broken*) echo 'src/broken.js:3: ERROR - bad' 1>&2; echo '2 error(s), 1 warning(s)' ;;\n  *) echo '0 error(s), 0 warning(s)' ;;\nesac\n",
    );

    CompilerConfig {
        working_dir: temp_dir.path().to_path_buf(),
        python: "sh".to_string(),
        java: java.display().to_string(),
        closure_library: library,
        targets: vec![
            CompileTarget::new("clean", "ns.clean"),
            CompileTarget::new("broken", "ns.broken"),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_build_everything_with_one_failing_target() {
    let _tools = lock_tools();
    let temp_dir = TempDir::new().unwrap();
    let driver = ClosureDriver::new(fake_toolchain(&temp_dir));

    let summary = driver.build_everything().await.unwrap();

    let deps = fs::read_to_string(temp_dir.path().join("broken.dep")).unwrap();
    assert_eq!(deps, "src/common.js\nsrc/broken.js\n");
    assert!(temp_dir.path().join("clean.compiled").exists());
    let compiled = fs::read_to_string(temp_dir.path().join("broken.compiled")).unwrap();
    assert!(compiled.contains("ERROR - bad"));
    let deps_js = fs::read_to_string(temp_dir.path().join("deqp-deps.js")).unwrap();
    assert!(deps_js.contains("goog.addDependency"));

    assert!(!summary.passed());
    assert_eq!(summary.total_errors(), 2);
    assert_eq!(summary.total_warnings(), 1);
    assert_eq!(
        summary.render(),
        vec![
            "clean:\tPassed".to_string(),
            "broken:\terrors: 2\twarnings: 1".to_string(),
            "Compilation failed: 2 error(s), 1 warning(s)".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_single_clean_target() {
    let _tools = lock_tools();
    let temp_dir = TempDir::new().unwrap();
    let driver = ClosureDriver::new(fake_toolchain(&temp_dir));
    let target = driver.target("clean").unwrap().clone();

    driver.build_deps(&target).await.unwrap();
    let report = driver.build_target(&target).await.unwrap();

    assert!(report.diagnostics.is_clean());
    assert_eq!(report.diagnostics.summary.as_deref(), Some("0 error(s), 0 warning(s)"));
    assert_eq!(report.to_string(), "clean:\tPassed");
}

#[tokio::test]
async fn test_build_without_deps_fails() {
    let _tools = lock_tools();
    let temp_dir = TempDir::new().unwrap();
    let driver = ClosureDriver::new(fake_toolchain(&temp_dir));
    let target = driver.target("clean").unwrap().clone();

    let result = driver.build_target(&target).await;
    assert!(matches!(result, Err(CompilerError::MissingDepFile { .. })));
}

#[tokio::test]
async fn test_unknown_target() {
    let temp_dir = TempDir::new().unwrap();
    let driver = ClosureDriver::new(fake_toolchain(&temp_dir));

    assert!(matches!(
        driver.target("nope"),
        Err(CompilerError::UnknownTarget { .. })
    ));
}

#[tokio::test]
async fn test_compile_directory_writes_reports() {
    let _tools = lock_tools();
    let temp_dir = TempDir::new().unwrap();
    let shaders = temp_dir.path().join("shaders");
    fs::create_dir_all(shaders.join("nested")).unwrap();
    fs::write(shaders.join("a.js"), "var a = 1;").unwrap();
    fs::write(shaders.join("nested/b.js"), "var b = 2;").unwrap();
    fs::write(shaders.join("notes.md"), "ignored").unwrap();

    let config = CompilerConfig {
        working_dir: temp_dir.path().to_path_buf(),
        java: "echo".to_string(),
        ..Default::default()
    };
    let options = LocalCompileOptions {
        levels: vec![
            CompilationLevel::WhitespaceOnly,
            CompilationLevel::AdvancedOptimizations,
        ],
    };

    let reports = compile_directory(&config, &shaders, &options).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].report, shaders.join("a.txt"));
    assert_eq!(reports[1].report, shaders.join("nested/b.txt"));
    assert!(!shaders.join("notes.txt").exists());

    let report = fs::read_to_string(shaders.join("a.txt")).unwrap();
    assert!(report.starts_with(
        "CLOSURE COMPILER OUTPUT \nJavaScript shader file: a.js\nOutput file from CLOSURE COMPILER: a.txt\n\n"
    ));
    assert!(report.contains("COMPILATION LEVEL: WHITESPACE_ONLY\n"));
    assert!(report.contains("COMPILATION LEVEL: ADVANCED_OPTIMIZATIONS\n"));
    assert!(!report.contains("SIMPLE_OPTIMIZATIONS"));
    assert_eq!(report.matches("--warning_level VERBOSE").count(), 2);
}

#[tokio::test]
async fn test_lost_compiler_output_is_not_a_missing_dep_file() {
    let _tools = lock_tools();
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clean.dep"), "src/clean.js\n").unwrap();

    // The output file is removed while the compiler still writes to it
    let java = temp_dir.path().join("vanishing-java");
    write_executable(
        &java,
        "#!/bin/sh\nrm -f clean.compiled\necho '0 error(s), 0 warning(s)'\n",
    );
    let config = CompilerConfig {
        java: java.display().to_string(),
        ..fake_toolchain(&temp_dir)
    };
    let driver = ClosureDriver::new(config);
    let target = driver.target("clean").unwrap().clone();

    match driver.build_target(&target).await {
        Err(CompilerError::ReadOutput { path, .. }) => {
            assert_eq!(path, temp_dir.path().join("clean.compiled"));
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}
