//! pbrsmith CLI - PBR texture set generation for spaceship materials
//!
//! Generates base color, normal, and metallic-roughness maps per material,
//! either for a single catalog key or for the whole catalog in sequence.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

mod commands;

/// pbrsmith - PBR texture set generator
#[derive(Parser)]
#[command(name = "pbrsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the generating commands.
#[derive(Args, Debug)]
struct GenerateOptions {
    /// Output directory for texture files
    #[arg(short, long, default_value = "assets/textures")]
    out_dir: String,

    /// Base seed; generation n within the run uses seed + n
    #[arg(long, default_value = "42")]
    seed: u32,

    /// Inference step count
    #[arg(long, default_value = "30")]
    steps: u32,

    /// Texture width and height in pixels (square)
    #[arg(long, default_value = "512")]
    size: u32,

    /// Normal map bump strength
    #[arg(long, default_value = "3.0")]
    strength: f64,

    /// Accept the slow CPU path when no CUDA device is available
    #[arg(long)]
    allow_cpu: bool,

    /// Subprocess timeout in seconds
    #[arg(long, default_value = "600")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the texture set for one material
    Single {
        /// Material key (unknown keys use the default material parameters)
        material: String,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Generate texture sets for every catalog material in sequence
    Batch {
        #[command(flatten)]
        options: GenerateOptions,
    },

    /// List the material catalog
    Materials,

    /// Check system dependencies and configuration
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Single { material, options } => commands::single::run(&material, &options),
        Commands::Batch { options } => commands::batch::run(&options),
        Commands::Materials => commands::materials::run(),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
