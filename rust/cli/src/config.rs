use chamber_engine::risk::RiskConfig;
use chamber_engine::rules::Rules;
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_CONFIG: &str = "CHAMBER_CONFIG";
pub const ENV_SEED: &str = "CHAMBER_SEED";
pub const ENV_TICK_MS: &str = "CHAMBER_TICK_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    /// Step used when driving roulette timers from the terminal
    pub tick_ms: u64,
    pub rules: Rules,
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub tick_ms: ValueSource,
    pub rules: ValueSource,
    pub risk: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            tick_ms: ValueSource::Default,
            rules: ValueSource::Default,
            risk: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: 100,
            rules: Rules::default(),
            risk: RiskConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `CHAMBER_CONFIG`, then `CHAMBER_SEED` and
/// `CHAMBER_TICK_MS`. Command-line flags are applied by the caller on top.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(ENV_CONFIG)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.tick_ms {
            cfg.tick_ms = v;
            sources.tick_ms = ValueSource::File;
        }
        if let Some(v) = f.rules {
            cfg.rules = v;
            sources.rules = ValueSource::File;
        }
        if let Some(v) = f.risk {
            cfg.risk = v;
            sources.risk = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(ENV_SEED)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(tick) = std::env::var(ENV_TICK_MS)
        && !tick.is_empty()
    {
        cfg.tick_ms = tick
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid tick_ms".into()))?;
        sources.tick_ms = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    tick_ms: Option<u64>,
    #[serde(default)]
    rules: Option<Rules>,
    #[serde(default)]
    risk: Option<RiskConfig>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.tick_ms == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: tick_ms must be >0".into(),
        ));
    }
    cfg.rules
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    cfg.risk
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    Ok(())
}
