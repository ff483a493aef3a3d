use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Pulse.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    fn base(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }

    fn finish(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment
            .merge(Env::prefixed("PULSE_").split("__"))
            .extract()?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Loads configuration from the default path, merging defaults, the TOML
    /// file, and `PULSE_` environment variables (`__` separates sections).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value is invalid.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from a specific TOML file. A missing file falls
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value is invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        Self::finish(Self::base(path.as_ref()))
    }

    /// Loads configuration with a profile overlay (`Pulse.<profile>.toml`
    /// next to the base file).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or a value is invalid.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let profile_path = path.with_file_name(format!("Pulse.{profile}.toml"));
        Self::finish(Self::base(path).merge(Toml::file(profile_path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastMethod;
    use figment::Jail;

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_from("does/not/exist.toml").unwrap();
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Pulse.toml",
                r#"
                [aggregation]
                interval_hours = 6

                [forecast]
                method = "linear"
                "#,
            )?;
            let config = ConfigLoader::load_from("Pulse.toml").unwrap();
            assert_eq!(config.aggregation.interval_hours, 6);
            assert_eq!(config.aggregation.time_window_hours, 48);
            assert_eq!(config.forecast.method, ForecastMethod::Linear);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("Pulse.toml", "[trending]\ntop_n = 5\n")?;
            jail.set_env("PULSE_TRENDING__TOP_N", "7");
            let config = ConfigLoader::load_from("Pulse.toml").unwrap();
            assert_eq!(config.trending.top_n, 7);
            Ok(())
        });
    }

    #[test]
    fn test_profile_overlay() {
        Jail::expect_with(|jail| {
            jail.create_file("Pulse.toml", "[forecast]\nhours_ahead = 12\n")?;
            jail.create_file("Pulse.long.toml", "[forecast]\nhours_ahead = 48\n")?;
            let config = ConfigLoader::load_with_profile("Pulse.toml", "long").unwrap();
            assert_eq!(config.forecast.hours_ahead, 48);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("Pulse.toml", "[aggregation]\ninterval_hours = 0\n")?;
            assert!(ConfigLoader::load_from("Pulse.toml").is_err());
            Ok(())
        });
    }
}
