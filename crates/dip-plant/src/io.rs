//! Loading and saving plant parameter files.

use crate::config::PlantConfiguration;
use crate::error::{ConfigResult, ConfigurationError};
use crate::params::PlantParams;
use std::path::Path;

pub fn from_yaml_str(content: &str) -> ConfigResult<PlantConfiguration> {
    let params: PlantParams = serde_yaml::from_str(content)?;
    PlantConfiguration::new(params)
}

pub fn to_yaml_string(config: &PlantConfiguration) -> ConfigResult<String> {
    Ok(serde_yaml::to_string(config.params())?)
}

pub fn load_yaml(path: &Path) -> ConfigResult<PlantConfiguration> {
    let content = read(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &PlantConfiguration) -> ConfigResult<()> {
    let content = to_yaml_string(config)?;
    std::fs::write(path, content).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_json(path: &Path) -> ConfigResult<PlantConfiguration> {
    let content = read(path)?;
    let params: PlantParams = serde_json::from_str(&content)?;
    PlantConfiguration::new(params)
}

pub fn save_json(path: &Path, config: &PlantConfiguration) -> ConfigResult<()> {
    let content = serde_json::to_string_pretty(config.params())?;
    std::fs::write(path, content).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_file(path: &Path) -> ConfigResult<PlantConfiguration> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_uses_defaults() {
        let cfg = from_yaml_str("cart_mass: 2.0\nenable_small_angle_approximation: true\n").unwrap();
        assert_eq!(cfg.cart_mass(), 2.0);
        assert_eq!(cfg.pendulum1_length(), PlantParams::default().pendulum1_length);
        assert_eq!(cfg.dynamics_mode(), crate::DynamicsMode::SmallAngle);
    }

    #[test]
    fn invalid_values_in_yaml_are_reported() {
        let err = from_yaml_str("cart_mass: -1.0\ngravity: 0.0\n").unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn infinite_condition_limit_is_rejected() {
        let err = from_yaml_str("max_condition_number: .inf\n").unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "max_condition_number");
        assert_eq!(violations[0].reason, "must be finite");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_yaml(Path::new("/nonexistent/dip_plant.yaml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }
}
