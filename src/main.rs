// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! riopulse command-line tool
//!
//! Compiles declarative pulse sequence files into sequencer programs.
//!
//! # Usage
//!
//! ```bash
//! # Print the instruction stream of a sequence
//! riopulse compile sequence.yaml
//!
//! # Wire words on a 20 ns clock
//! riopulse compile sequence.yaml --dt 20e-9 --format words
//!
//! # Show effective configuration
//! riopulse config --config /path/to/riopulse.yaml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use riopulse::compiler::{Compiler, Program};
use riopulse::config::{Config, LoggingConfig};
use riopulse::timeline::SequenceFile;
use riopulse::{Result, VERSION};

/// Pulse sequence compiler for FPGA digital sequencers
#[derive(Parser)]
#[command(name = "riopulse")]
#[command(author = "riopulse Contributors")]
#[command(version = VERSION)]
#[command(about = "Compile multi-channel digital pulse sequences into sequencer programs")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a sequence file
    Compile {
        /// Sequence file (YAML, or JSON with a .json extension)
        file: PathBuf,

        /// Clock period in seconds
        #[arg(long, env = "RIOPULSE_CLOCK_PERIOD")]
        dt: Option<f64>,

        /// Program length in seconds from the start time
        #[arg(long)]
        duration: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One instruction per line
    Text,
    /// Program as JSON
    Json,
    /// Encoded 32-bit words in hex
    Words,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Compile {
            file,
            dt,
            duration,
            format,
        } => {
            if let Some(dt) = dt {
                config.compiler.clock_period_s = dt;
            }
            config.validate()?;

            let mut compiler = config.compiler.compiler()?;
            if let Some(duration) = duration {
                compiler = compiler.with_duration(duration)?;
            }

            let seq = SequenceFile::load(&file)?.build_with(config.compiler.nchannels)?;
            info!(
                file = %file.display(),
                channels = seq.nchannels(),
                start = seq.start_time(),
                stop = seq.stop_time(),
                "Loaded sequence"
            );

            let program = compiler.compile(&seq)?;
            for warning in program.warnings() {
                eprintln!("warning: {}", warning);
            }
            print_program(&program, &compiler, format)?;
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so program output
/// on stdout stays machine-readable.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn print_program(program: &Program, compiler: &Compiler, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (index, instruction) in program.instructions().iter().enumerate() {
                println!("{:>6}  {}", index, instruction);
            }
            println!(
                "# {} instructions, period {} ticks ({:e} s)",
                program.len(),
                program.period_ticks(),
                program.period_ticks() as f64 * compiler.dt()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(program)?);
        }
        OutputFormat::Words => {
            for word in program.encode() {
                println!("{:#010x}", word);
            }
        }
    }
    Ok(())
}
