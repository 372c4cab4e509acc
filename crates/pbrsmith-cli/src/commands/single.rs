//! Single-material generation command.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use crate::GenerateOptions;

/// Generate the full texture set for one material key.
///
/// # Returns
/// Exit code: 0 on success, 1 on failure.
pub fn run(material: &str, options: &GenerateOptions) -> Result<ExitCode> {
    let start = Instant::now();
    let mut orchestrator = super::build_orchestrator(options);

    println!(
        "{} Generating PBR texture set for: {}",
        "INFO".blue().bold(),
        material
    );

    match orchestrator.generate_set(material, Path::new(&options.out_dir)) {
        Ok(set) => {
            println!(
                "{} PBR set complete for {} ({:.1}s):",
                "ok".green().bold(),
                material,
                start.elapsed().as_secs_f64()
            );
            println!("   - Base Color: {}", set.base_color.display());
            println!("   - Normal: {}", set.normal.display());
            println!("   - Metallic-Roughness: {}", set.metallic_roughness.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} {}", "FAILED".red().bold(), e);
            Ok(ExitCode::from(1))
        }
    }
}
