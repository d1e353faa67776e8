use crate::error::{CliError, Result};
use molscene::engine::config::ViewerConfig;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Loads the viewer configuration from `path` (or the defaults) and applies `--set` overrides.
pub fn load_viewer_config(path: Option<&Path>, set_values: &[String]) -> Result<ViewerConfig> {
    let mut config = match path {
        Some(path) => {
            debug!("Loading viewer configuration from file: {:?}", path);
            ViewerConfig::load(path)?
        }
        None => ViewerConfig::default(),
    };
    apply_set_values(&mut config, set_values)?;
    config.validate()?;
    Ok(config)
}

fn apply_set_values(config: &mut ViewerConfig, set_values: &[String]) -> Result<()> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "framing.target-span" => config.framing.target_span = parse_value(key, value_str)?,
            "framing.min-scale" => config.framing.min_scale = parse_value(key, value_str)?,
            "framing.max-scale" => config.framing.max_scale = parse_value(key, value_str)?,
            "framing.single-atom-scale" => {
                config.framing.single_atom_scale = parse_value(key, value_str)?
            }
            "framing.fallback-scale" => {
                config.framing.fallback_scale = parse_value(key, value_str)?
            }
            "atoms.shininess" => config.atoms.shininess = parse_value(key, value_str)?,
            "bonds.radius" => config.bonds.radius = parse_value(key, value_str)?,
            "bonds.color" => config.bonds.color = parse_color(key, value_str)?,
            "placeholder.color" => config.placeholder.color = parse_color(key, value_str)?,
            "placeholder.highlighted-color" => {
                config.placeholder.highlighted_color = parse_color(key, value_str)?
            }
            "rotation.enabled" => config.rotation.enabled = parse_value(key, value_str)?,
            "rotation.x-step" => config.rotation.x_step = parse_value(key, value_str)?,
            "rotation.y-step" => config.rotation.y_step = parse_value(key, value_str)?,
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
        debug!("Applied override {} = {}", key, value_str);
    }
    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value_str)))
}

/// Accepts `0xRRGGBB`, `#RRGGBB` or a plain decimal integer.
fn parse_color(key: &str, value_str: &str) -> Result<u32> {
    let hex = value_str
        .strip_prefix("0x")
        .or_else(|| value_str.strip_prefix('#'));
    let parsed = match hex {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => value_str.parse().ok(),
    };
    parsed
        .filter(|color| *color <= 0xFFFFFF)
        .ok_or_else(|| CliError::Config(format!("Invalid color for {}: {}", key, value_str)))
}
