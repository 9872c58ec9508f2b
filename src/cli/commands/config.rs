use crate::cli::parser::Commands;
use crate::config::{Config, keys};
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, config_path: Option<&Path>) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path: PathBuf = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::config_file);

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", cfg.to_yaml()?);
        }

        // ---- CHECK CONFIG ----
        if *check {
            check_file(&path, cfg)?;
        }

        // ---- MIGRATE CONFIG ----
        if *migrate {
            let added = keys::backfill_missing(&path)?;
            if added.is_empty() {
                info("Configuration already up to date.");
            } else {
                success(format!("Added missing fields: {}", added.join(", ")));
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            edit_file(&path, editor.clone());
        }
    }

    Ok(())
}

fn check_file(path: &Path, cfg: &Config) -> AppResult<()> {
    if !path.exists() {
        warning(format!(
            "No configuration file at {} (defaults in use).",
            path.display()
        ));
    } else {
        let content = fs::read_to_string(path)?;
        let missing = keys::missing_keys(&content)?;
        if missing.is_empty() {
            success("No missing fields.");
        } else {
            warning(format!("Missing fields: {}", missing.join(", ")));
            info("Run `labgrade config --migrate` to add them with default values.");
        }
    }

    match cfg.validate() {
        Ok(()) => success("Configuration values are valid."),
        Err(e) => error(e),
    }
    Ok(())
}

fn edit_file(path: &Path, requested_editor: Option<String>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor_to_use = requested_editor.unwrap_or_else(|| default_editor.clone());

    match Command::new(&editor_to_use).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!(
                "Configuration file edited successfully using '{}'",
                editor_to_use
            ));
        }
        Ok(_) | Err(_) => {
            warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                editor_to_use, default_editor
            ));

            match Command::new(&default_editor).arg(path).status() {
                Ok(s) if s.success() => success(format!(
                    "Configuration file edited successfully using fallback '{}'",
                    default_editor
                )),
                Ok(_) | Err(_) => error(format!(
                    "Failed to edit configuration file using fallback '{}'",
                    default_editor
                )),
            }
        }
    }
}
