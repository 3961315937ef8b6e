//! WebGL developer tools CLI application
//!
//! Command-line interface for generating conformance test pages, compiling the
//! dEQP port with the closure compiler, extracting IDL and serving the suite
//! locally.

use std::process;

use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

use webgl_devtools::cli::{
    handle_compile, handle_compile_local, handle_config, handle_extract_idl, handle_generate,
    handle_serve, Cli, Commands,
};
use webgl_devtools::config::AppConfig;
use webgl_devtools::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // `config` must still run when the file it manages is broken
    let (config, load_error) = if matches!(cli.command, Commands::Config(_)) {
        AppConfig::load_or_default(cli.global.config.clone()).await
    } else {
        (AppConfig::load(cli.global.config.clone()).await?, None)
    };

    init_logging(&cli, &config);

    if let Some(e) = load_error {
        warn!("Using default configuration: {}", e);
    }

    info!("webgl_devtools v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate(args) => {
            info!("Executing generate command");
            handle_generate(args, &config).await
        }
        Commands::Compile(args) => {
            info!("Executing compile command");
            handle_compile(args, &config).await
        }
        Commands::CompileLocal(args) => {
            info!("Executing compile-local command");
            handle_compile_local(args, &config).await
        }
        Commands::Serve(args) => {
            info!("Executing serve command");
            handle_serve(args, &config).await
        }
        Commands::ExtractIdl(args) => {
            info!("Executing extract-idl command");
            handle_extract_idl(args).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &config).await
        }
    }
}

/// Initialize logging from the CLI flags, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = match cli.log_level() {
        Some(level) => level.to_string().to_lowercase(),
        None => config.logging.level.clone(),
    };

    let (directive, rejected): (Directive, Option<String>) =
        match format!("webgl_devtools={}", level).parse() {
            Ok(directive) => (directive, None),
            Err(_) => (LevelFilter::WARN.into(), Some(level)),
        };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if let Some(level) = rejected {
        warn!("Ignoring invalid log level '{}' from configuration", level);
    }
    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
