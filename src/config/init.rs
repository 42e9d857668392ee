use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::grading::{validate_grading, Cutoff, GradingConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Prompt until the input parses as a positive number.
fn prompt_positive(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => return Ok(v),
            _ => println!("  Invalid: must be a positive number. Try again."),
        }
    }
}

/// Parse a tier written as "TOTAL:GP", e.g. "90:10".
fn parse_tier(input: &str) -> Result<Cutoff, String> {
    let (total, gp) = input
        .split_once(':')
        .ok_or_else(|| "expected TOTAL:GP, e.g. 90:10".to_string())?;
    let total: f64 = total
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", total.trim()))?;
    let grade_point: u32 = gp
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole grade point", gp.trim()))?;
    Ok(Cutoff::new(total, grade_point))
}

fn prompt_grading() -> Result<GradingConfig> {
    let defaults = GradingConfig::default();

    println!();
    println!("The exam (SEE) score is scaled before it joins the internal (CIE) marks.");
    let see_scale = prompt_positive("SEE scale factor", defaults.see_scale)?;
    let max_cie = prompt_positive("Maximum CIE marks", defaults.max_cie)?;
    let max_see = prompt_positive("Maximum SEE marks", defaults.max_see)?;

    println!();
    println!("Default tiers: 90:10, 80:9, 70:8, 60:7, 50:6, 45:5, 40:4 (TOTAL:GP)");
    let (cutoffs, floor_grade_point) = if prompt_yes_no("Use the default grade tiers?", true)? {
        (defaults.cutoffs.clone(), defaults.floor_grade_point)
    } else {
        println!("Enter tiers from the highest total down, as TOTAL:GP. Empty line to finish.");
        let mut cutoffs: Vec<Cutoff> = Vec::new();
        loop {
            let input = prompt("  Tier: ")?;
            if input.is_empty() {
                if cutoffs.is_empty() {
                    println!("  At least one tier is required.");
                    continue;
                }
                break;
            }
            match parse_tier(&input) {
                Ok(cutoff) => cutoffs.push(cutoff),
                Err(e) => println!("  Invalid tier: {}. Try again.", e),
            }
        }
        let floor = loop {
            let input = prompt_with_default("Grade point below the lowest tier", "0")?;
            match input.parse::<u32>() {
                Ok(v) => break v,
                Err(_) => println!("  Invalid: must be a whole number. Try again."),
            }
        };
        (cutoffs, floor)
    };

    Ok(GradingConfig {
        see_scale,
        cutoffs,
        floor_grade_point,
        max_cie,
        max_see,
    })
}

/// Write the config atomically, creating parent directories as needed.
fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Create a config file, either from the built-in defaults or interactively.
///
/// An existing file is only replaced with `force` or after the user agrees.
/// Returns the path written, or None when the user declined to overwrite.
pub fn run_init_wizard(
    path: Option<PathBuf>,
    use_defaults: bool,
    force: bool,
) -> Result<Option<PathBuf>> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        if use_defaults {
            anyhow::bail!(
                "Config already exists at {}. Pass --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(None);
        }
    }

    let grading = if use_defaults {
        GradingConfig::default()
    } else {
        println!();
        println!("SGPA Planner Configuration");
        println!("==========================");
        prompt_grading()?
    };

    if let Err(errors) = validate_grading(&grading) {
        let details: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
        anyhow::bail!("Grading config is invalid:\n{}", details.join("\n"));
    }

    write_config(
        &config_path,
        &Config {
            grading: Some(grading),
        },
    )?;

    Ok(Some(config_path))
}
