/// Keys and defaults shared across the crate

// Guide document layout
pub const CITIES_KEY: &str = "Cities";
pub const POIS_KEY: &str = "pois";
pub const ADDRESS_KEY: &str = "address";

// CLI / config defaults
pub const DEFAULT_GUIDE_NAME: &str = "result.json";
pub const DEFAULT_FREQUENCY: usize = 1;
pub const DEFAULT_LOG_FILE: &str = "logs/zipclean.log";
pub const DEFAULT_CONFIG_FILE: &str = "zipclean.toml";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
