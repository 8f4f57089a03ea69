use anyhow::{anyhow, Context, Result};
use rush_core::{ControlScheme, HitPolicy, MotionIntegration, SimConfig};
use std::fs;
use std::path::Path;

/// Command-line overrides applied on top of the file (or default) configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigOverrides {
    pub control_scheme: Option<ControlScheme>,
    pub hit_policy: Option<HitPolicy>,
    pub motion: Option<MotionIntegration>,
}

/// Reads a JSON `SimConfig`. Missing fields take their defaults.
pub fn read_sim_config(path: &Path) -> Result<SimConfig> {
    let raw =
        fs::read(path).with_context(|| format!("failed reading config {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("failed parsing config {}", path.display()))
}

pub fn load_sim_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<SimConfig> {
    let mut config = match path {
        Some(path) => read_sim_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(scheme) = overrides.control_scheme {
        config.control_scheme = scheme;
    }
    if let Some(policy) = overrides.hit_policy {
        config.hit_policy = policy;
    }
    if let Some(motion) = overrides.motion {
        config.motion = motion;
    }
    config
        .validate()
        .map_err(|err| anyhow!("invalid simulation config: {err}"))?;
    Ok(config)
}

pub fn write_sim_config(path: &Path, config: &SimConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(config).context("failed to serialize config")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = load_sim_config(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rush.json");
        fs::write(
            &path,
            r#"{ "control_scheme": "heading_relative", "blink_distance": 150.0 }"#,
        )
        .unwrap();

        let config = load_sim_config(
            Some(&path),
            ConfigOverrides {
                control_scheme: Some(ControlScheme::PointerAimed),
                hit_policy: Some(HitPolicy::ScorePerBullet),
                motion: None,
            },
        )
        .unwrap();
        assert_eq!(config.control_scheme, ControlScheme::PointerAimed);
        assert_eq!(config.hit_policy, HitPolicy::ScorePerBullet);
        assert_eq!(config.blink_distance, 150.0);
    }

    #[test]
    fn invalid_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "asteroid_spawn_interval": -1.0 }"#).unwrap();
        let err = load_sim_config(Some(&path), ConfigOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("asteroid_spawn_interval"));
    }

    #[test]
    fn written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        let config = SimConfig {
            motion: MotionIntegration::ElapsedTime,
            ..SimConfig::default()
        };
        write_sim_config(&path, &config).unwrap();
        assert_eq!(read_sim_config(&path).unwrap(), config);
    }
}
