use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Dotted paths of keys present in the default configuration but absent
/// from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let defaults = serde_yaml::to_value(Config::default())?;
    let current: Value = if content.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(content)?
    };

    let mut missing = Vec::new();
    collect_missing(&defaults, &current, "", &mut missing);
    Ok(missing)
}

fn collect_missing(defaults: &Value, current: &Value, prefix: &str, out: &mut Vec<String>) {
    let Some(def_map) = defaults.as_mapping() else {
        return;
    };
    let cur_map = current.as_mapping();

    for (key, def_val) in def_map {
        let Some(name) = key.as_str() else { continue };
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        match cur_map.and_then(|m| m.get(key)) {
            None => out.push(path),
            Some(cur_val) => {
                if def_val.is_mapping() && cur_val.is_mapping() {
                    collect_missing(def_val, cur_val, &path, out);
                }
            }
        }
    }
}

/// Rewrite the config file with every missing key filled from defaults.
/// Existing values are kept as they are. Returns the keys that were added.
pub fn backfill_missing(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let added = missing_keys(&content)?;
    if added.is_empty() {
        return Ok(added);
    }

    // Deserializing fills the gaps with serde defaults.
    let cfg = Config::from_yaml(&content)?;
    fs::write(path, cfg.to_yaml()?)?;
    Ok(added)
}
