//! List the material catalog.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use pbrsmith_core::catalog;

/// Print every catalog entry with its base values and prompt.
pub fn run() -> Result<ExitCode> {
    println!("{}", "Material catalog:".bold());
    for material in catalog::all() {
        println!(
            "  {} (metallic {:.1}, roughness {:.1})",
            material.key.cyan().bold(),
            material.metallic,
            material.roughness
        );
        println!("     {}", material.prompt.dimmed());
    }

    let default = catalog::default_entry();
    println!();
    println!(
        "Unknown keys fall back to the default entry (metallic {:.1}, roughness {:.1}).",
        default.metallic, default.roughness
    );

    Ok(ExitCode::SUCCESS)
}
