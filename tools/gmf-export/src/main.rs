//! gmf-export - GMF model export tool
//!
//! Converts glTF/GLB/OBJ scenes to .gmf model assets (mesh, skeleton, animations)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gmf_export::{config::ExportConfig, import, scene, session};

#[derive(Parser)]
#[command(name = "gmf-export")]
#[command(about = "GMF model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a scene file to a .gmf model
    Convert {
        /// Input scene file (glTF/GLB/OBJ)
        input: PathBuf,

        /// Output file (default: input with the configured extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export settings (gmf.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the node hierarchy of a scene file
    Print {
        /// Input scene file (glTF/GLB/OBJ)
        input: PathBuf,

        /// Export settings (only the source axis override applies)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ExportConfig> {
    match path {
        Some(path) => ExportConfig::load(path),
        None => Ok(ExportConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let output = output.unwrap_or_else(|| config.output_path(&input));
            session::convert_file(&input, &output, &config)?;
        }
        Commands::Print { input, config } => {
            let config = load_config(config.as_ref())?;
            let scene = import::load_scene(&input, &config)?;
            scene::print_scene(&scene);
        }
    }

    Ok(())
}
