//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use regex::Regex;
use tracing::info;

use docgen_core::pipeline::{GenerateConfig, artifact_path, generate};
use docgen_engine::EsModuleEngine;
use docgen_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docgen — generate Markdown API documentation from module exports.
#[derive(Parser)]
#[command(
    name = "docgen",
    version,
    about = "Generate Markdown API documentation from a module graph's exported symbols.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate documentation for an entry file's exported symbols.
    Generate {
        /// Entry source file, relative to the current directory.
        file: String,

        /// Output file for the API documentation (defaults to <entry>-api.md).
        #[arg(short, long)]
        output: Option<String>,

        /// Markdown heading title whose marked section receives the
        /// documentation, instead of overwriting the output file.
        #[arg(short, long)]
        append: Option<String>,

        /// Regular expression; matching symbol names are left out.
        #[arg(long)]
        ignore: Option<String>,

        /// Write IR, export-token, and syntax-summary JSON artifacts.
        #[arg(long)]
        debug: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docgen=info",
        1 => "docgen=debug",
        _ => "docgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            file,
            output,
            append,
            ignore,
            debug,
        } => cmd_generate(
            &file,
            output.as_deref(),
            append.as_deref(),
            ignore.as_deref(),
            debug,
        ),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(
    file: &str,
    output: Option<&str>,
    append: Option<&str>,
    ignore: Option<&str>,
    debug: bool,
) -> Result<()> {
    let config = load_config()?;

    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let entry = cwd.join(file);

    let output_path = match output {
        Some(p) => cwd.join(p),
        None => artifact_path(&entry, &config.defaults.output_suffix),
    };

    let ignore_pattern = ignore
        .map(Regex::new)
        .transpose()
        .map_err(|e| eyre!("invalid --ignore pattern: {e}"))?;

    let generate_config = GenerateConfig {
        entry,
        root_dir: cwd,
        output: output_path,
        append: append.map(String::from),
        ignore: ignore_pattern,
        section_title: config.defaults.section_title.clone(),
        source_ext: config.defaults.source_ext.clone(),
        debug,
    };

    let debug_flag = debug;
    info!(
        file,
        append = append.unwrap_or("-"),
        debug = debug_flag,
        "generating documentation"
    );

    let engine = EsModuleEngine::new();
    let result = generate(&engine, &generate_config)?;

    println!();
    println!("  Documentation generated!");
    println!("  Symbols: {}", result.symbol_count);
    println!("  Output:  {}", result.output.display());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
