//! Batch generation command: every catalog material in sequence.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use pbrsmith_core::catalog;

use crate::GenerateOptions;

/// Generate texture sets for all catalog materials.
///
/// Materials run strictly in sequence; a failure on one material is
/// reported and the remaining materials still run.
///
/// # Returns
/// Exit code: 0 if every material succeeded, 1 otherwise.
pub fn run(options: &GenerateOptions) -> Result<ExitCode> {
    let start = Instant::now();
    let mut orchestrator = super::build_orchestrator(options);
    let out_dir = Path::new(&options.out_dir);

    let materials = catalog::all();
    println!(
        "{} Generating PBR sets for {} materials into {}",
        "INFO".blue().bold(),
        materials.len(),
        options.out_dir
    );
    println!();

    let mut failures: Vec<(&str, String)> = Vec::new();

    for (index, material) in materials.iter().enumerate() {
        println!(
            "{} [{}/{}] {}",
            "INFO".blue().bold(),
            index + 1,
            materials.len(),
            material.key
        );

        match orchestrator.generate_set(material.key, out_dir) {
            Ok(_) => println!("  {} {}", "SUCCESS".green(), material.key),
            Err(e) => {
                println!("  {} {} - {}", "FAILED".red(), material.key, e);
                failures.push((material.key, e.to_string()));
            }
        }
    }

    let successful = materials.len() - failures.len();
    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Batch Summary".cyan());
    println!("{}", "======================================".cyan());
    println!("{} {}", "Successful:".green().bold(), successful);
    println!("{} {}", "Failed:".red().bold(), failures.len());
    println!(
        "{} {:.1}s",
        "Total runtime:".blue().bold(),
        start.elapsed().as_secs_f64()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", "Failed materials:".red().bold());
        for (key, error) in &failures {
            println!("  - {}: {}", key, error);
        }
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
