pub mod config;
pub mod config_loader;
pub mod config_watcher;
pub mod sizing;

pub use config::{
    AppConfig, ConfigError, KalshiConfig, KalshiNoPrice, LoggingConfig, MatchConfig,
    PolymarketConfig, SizingConfig,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use config_watcher::ConfigWatcher;
pub use sizing::{StakePlan, StakeSizer};
