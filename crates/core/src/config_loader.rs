use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `CROSSLINE_MATCHING__NAME_MATCH_THRESHOLD=80`).
pub const ENV_PREFIX: &str = "CROSSLINE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by layering built-in defaults, the TOML file at
    /// `path` (skipped when absent), and `CROSSLINE_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value is out of range.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::figment(path)
            .extract()
            .with_context(|| format!("failed to load config from {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KalshiNoPrice;
    use figment::Jail;

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_from("does-not-exist.toml").map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [matching]
                time_window_hours = 6.0
                name_match_threshold = 80
                kalshi_no_price = "inverse_yes_ask"

                [sizing]
                bankroll = 250.0
                "#,
            )?;

            let config = ConfigLoader::load_from("Config.toml").map_err(|e| e.to_string())?;
            assert!((config.matching.time_window_hours - 6.0).abs() < f64::EPSILON);
            assert_eq!(config.matching.name_match_threshold, 80);
            assert_eq!(config.matching.kalshi_no_price, KalshiNoPrice::InverseYesAsk);
            // Untouched fields keep their defaults
            assert!((config.matching.odds_tolerance_pct - 20.0).abs() < f64::EPSILON);
            assert!((config.sizing.bankroll - 250.0).abs() < f64::EPSILON);
            assert_eq!(config.polymarket.tag_id, "100148");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[matching]\nname_match_threshold = 80\n")?;
            jail.set_env("CROSSLINE_MATCHING__NAME_MATCH_THRESHOLD", "60");
            jail.set_env("CROSSLINE_KALSHI__SERIES_PREFIX", "KXNCAAB");

            let config = ConfigLoader::load_from("Config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.matching.name_match_threshold, 60);
            assert_eq!(config.kalshi.series_prefix, "KXNCAAB");
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[matching]\nodds_tolerance_pct = 75.0\n")?;

            let result = ConfigLoader::load_from("Config.toml");
            assert!(result.is_err());
            Ok(())
        });
    }
}
