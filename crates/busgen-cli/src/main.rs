//! busgen CLI - D-Bus proxy and adaptor generator
//!
//! Commands:
//! - `busgen generate` - Generate proxy and/or adaptor headers
//! - `busgen inspect` - Print the parsed introspection model

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod generate;
mod inspect;
mod logging;

#[derive(Parser)]
#[command(name = "busgen")]
#[command(author, version, about = "Generate dbus-c++ bindings from D-Bus introspection XML", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate proxy and/or adaptor headers
    Generate {
        /// Introspection XML file
        input: PathBuf,

        /// Output path for the client-side proxy header
        #[arg(long)]
        proxy: Option<PathBuf>,

        /// Output path for the server-side adaptor header
        #[arg(long)]
        adaptor: Option<PathBuf>,

        /// Generate blocking proxy methods (default when no mode is given)
        #[arg(long)]
        sync: bool,

        /// Generate non-blocking proxy methods
        #[arg(long = "async")]
        asynchronous: bool,

        /// Generator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the interfaces of an introspection file
    Inspect {
        /// Introspection XML file
        input: PathBuf,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Generate {
            input,
            proxy,
            adaptor,
            sync,
            asynchronous,
            config,
        } => {
            let request = generate::Request {
                input,
                proxy,
                adaptor,
                modes: busgen_core::ProxyModes::from_flags(sync, asynchronous),
                config,
            };
            generate::run(&request)?;
        }
        Commands::Inspect { input, json } => {
            inspect::run(&input, json)?;
        }
    }

    Ok(())
}
