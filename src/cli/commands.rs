//! Command handlers for the WebGL developer tools CLI
//!
//! This module connects parsed CLI arguments and the loaded configuration to
//! the tools in [`crate::app`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::app::compiler::{
    compile_directory, BuildSummary, ClosureDriver, CompileTarget, LocalCompileOptions,
};
use crate::app::generator::{find_suite, TestManifestGenerator};
use crate::app::idl::{current_year, extract_idl_file};
use crate::app::server::NoCacheServer;
use crate::cli::{
    CompileAction, CompileArgs, CompileLocalArgs, ConfigAction, ConfigArgs, ExtractIdlArgs,
    GenerateArgs, ServeArgs,
};
use crate::config::AppConfig;
use crate::errors::{AppError, CompilerError, IdlError, Result};

/// Handle the generate command
pub async fn handle_generate(args: GenerateArgs, config: &AppConfig) -> Result<()> {
    let suites = config.generator.suites()?;

    if args.list {
        for suite in &suites {
            println!("{}\t{} groups\t{}", suite.name, suite.len(), suite.namespace);
        }
        return Ok(());
    }

    let name = args
        .suite
        .unwrap_or_else(|| config.generator.default_suite.clone());
    let suite = find_suite(&suites, &name)?.clone();
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.generator.output_dir());

    let generator = TestManifestGenerator::new(suite, output_dir);
    let report = generator.run()?;

    println!(
        "Generated {} pages for '{}' in {}",
        report.document_count(),
        report.suite,
        report.output_dir.display()
    );
    println!("Manifest: {}", report.manifest_path.display());
    Ok(())
}

/// Handle the compile command
pub async fn handle_compile(args: CompileArgs, config: &AppConfig) -> Result<()> {
    let mut compiler_config = config.compiler.to_runtime_config();
    if let Some(dir) = args.working_dir {
        compiler_config.working_dir = dir;
    }
    let driver = ClosureDriver::new(compiler_config);

    match args.action {
        None => {
            let targets = driver.targets().to_vec();
            run_deps(&driver, &targets).await?;
            let summary = run_builds(&driver, &targets).await?;
            let deps_file = driver.build_deps_file().await?;
            info!("Wrote {}", deps_file.display());
            report_summary(&summary)
        }
        Some(CompileAction::Deps { target }) => {
            let targets = select_targets(&driver, target.as_deref())?;
            run_deps(&driver, &targets).await
        }
        Some(CompileAction::Format { target }) => {
            let targets = select_targets(&driver, target.as_deref())?;
            let mut formatted = 0;
            for target in &targets {
                formatted += driver.format_target(target).await?;
            }
            println!("Formatted {} scripts", formatted);
            Ok(())
        }
        Some(CompileAction::Build { target }) => {
            let targets = select_targets(&driver, target.as_deref())?;
            let summary = run_builds(&driver, &targets).await?;
            report_summary(&summary)
        }
        Some(CompileAction::Depfile) => {
            let deps_file = driver.build_deps_file().await?;
            println!("Wrote {}", deps_file.display());
            Ok(())
        }
        Some(CompileAction::Target { name }) => {
            let target = driver.target(&name)?.clone();
            driver.build_deps(&target).await?;
            let summary = run_builds(&driver, &[target]).await?;
            report_summary(&summary)
        }
        Some(CompileAction::List) => {
            for target in driver.targets() {
                println!("{}\t{}", target.name, target.namespace);
            }
            Ok(())
        }
    }
}

fn select_targets(driver: &ClosureDriver, name: Option<&str>) -> Result<Vec<CompileTarget>> {
    match name {
        Some(name) => Ok(vec![driver.target(name)?.clone()]),
        None => Ok(driver.targets().to_vec()),
    }
}

fn progress_bar(len: usize, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

async fn run_deps(driver: &ClosureDriver, targets: &[CompileTarget]) -> Result<()> {
    let bar = progress_bar(targets.len(), "Building dependency lists");
    for target in targets {
        bar.set_message(format!("deps: {}", target.name));
        driver.build_deps(target).await?;
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

async fn run_builds(driver: &ClosureDriver, targets: &[CompileTarget]) -> Result<BuildSummary> {
    let start = Instant::now();
    let bar = progress_bar(targets.len(), "Compiling");
    let mut summary = BuildSummary::new();

    for target in targets {
        bar.set_message(format!("compile: {}", target.name));
        let report = driver.build_target(target).await?;
        if let Some(line) = &report.diagnostics.summary {
            bar.println(format!("{}: {}", report.target, line));
        }
        summary.push(report);
        bar.inc(1);
    }

    bar.finish_and_clear();
    info!("Compiled {} targets in {:?}", targets.len(), start.elapsed());
    Ok(summary)
}

fn report_summary(summary: &BuildSummary) -> Result<()> {
    for line in summary.render() {
        println!("{}", line);
    }

    if summary.passed() {
        Ok(())
    } else {
        Err(CompilerError::CompilationFailed {
            failed: summary.failed_count(),
            total: summary.reports().len(),
        }
        .into())
    }
}

/// Handle the compile-local command
pub async fn handle_compile_local(args: CompileLocalArgs, config: &AppConfig) -> Result<()> {
    let options = LocalCompileOptions {
        levels: args.levels(),
    };
    if options.levels.is_empty() {
        return Err(AppError::generic("All compilation levels are disabled"));
    }

    let root = args.directory.unwrap_or_else(|| PathBuf::from("."));
    let compiler_config = config.compiler.to_runtime_config();

    let reports = compile_directory(&compiler_config, &root, &options).await?;
    for report in &reports {
        println!(
            "{} -> {}",
            report.script.display(),
            report.report.display()
        );
    }
    println!("Compiled {} scripts", reports.len());
    Ok(())
}

/// Handle the serve command
pub async fn handle_serve(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(port) = args.port {
        server_config.port = port;
    }
    if let Some(bind) = args.bind {
        server_config.bind = bind;
    }
    if let Some(threads) = args.threads {
        server_config.threads = threads;
    }
    let root = args
        .directory
        .or_else(|| server_config.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let server = Arc::new(NoCacheServer::bind(&server_config, &root)?);
    println!(
        "Serving {} at http://{}/ (no-cache). Press Ctrl-C to stop.",
        server.root().display(),
        server
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| server_config.address())
    );

    server.run_until(shutdown_signal()).await?;
    Ok(())
}

/// Completes on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C signal received"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("SIGTERM signal received");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Handle the extract-idl command
pub async fn handle_extract_idl(args: ExtractIdlArgs) -> Result<()> {
    let year = args.year.unwrap_or_else(current_year);
    let idl = extract_idl_file(&args.file, year)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", idl)).map_err(|source| IdlError::Write {
                path: path.clone(),
                source,
            })?;
            info!("Wrote IDL to {}", path.display());
        }
        None => println!("{}", idl),
    }
    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::get_default_config_path()?,
            };
            AppConfig::write_default(&path, force).await?;
            println!("Created configuration file: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            match config.generator.suites() {
                Ok(_) => {}
                Err(e) => warn!("Configured suites are invalid: {}", e),
            }
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
