//! Doctor command: check system dependencies and configuration.

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process::ExitCode;

/// Run the doctor command.
///
/// Checks:
/// - Python interpreter availability
/// - Output directory permissions
/// - Version information
///
/// # Returns
/// Exit code: 0 if all hard checks pass, 1 if any fail.
pub fn run() -> Result<ExitCode> {
    println!("{}", "pbrsmith Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} pbrsmith-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match find_python() {
        Some(path) => {
            println!("  {} Python ({})", "ok".green(), path);
        }
        None => {
            println!("  {} Python not found in PATH", "!!".yellow());
            println!(
                "     {}",
                "A Python interpreter with diffusers and torch is required for generation."
                    .dimmed()
            );
            println!(
                "     {}",
                "Set PBRSMITH_PYTHON to point at a specific interpreter.".dimmed()
            );
            // Not a hard failure - the derived-map pipeline works without it
        }
    }
    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".pbrsmith_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("{}", "All checks passed.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some checks failed.".red().bold());
        Ok(ExitCode::from(1))
    }
}

fn find_python() -> Option<String> {
    if let Ok(path) = env::var("PBRSMITH_PYTHON") {
        if std::path::Path::new(&path).exists() {
            return Some(path);
        }
    }
    for name in ["python3", "python"] {
        if let Ok(path) = which::which(name) {
            return Some(path.to_string_lossy().to_string());
        }
    }
    None
}
