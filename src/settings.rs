use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://www.swr-vote.de/swr1bw-hitparade-2025";
pub const DEFAULT_MAX_PAGES: u32 = 106;
pub const DEFAULT_OUTPUT: &str = "public/swr1_songs.json";
pub const DEFAULT_AUDIO_MARKER: &str = ".mp3";

const CONFIG_FILE: &str = "hitparade";
const ENV_PREFIX: &str = "HITPARADE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub max_pages: u32,
    pub output: PathBuf,
    pub audio_marker: String,
}

/// Values given on the command line. Anything set here beats file and env.
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub max_pages: Option<u32>,
    pub output: Option<PathBuf>,
    pub audio_marker: Option<String>,
}

impl Settings {
    /// defaults → `hitparade.toml` (optional) → `HITPARADE_*` env → CLI.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::layered(builder, overrides)
    }

    fn layered(
        builder: ConfigBuilder<DefaultState>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("max_pages", i64::from(DEFAULT_MAX_PAGES))?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("audio_marker", DEFAULT_AUDIO_MARKER)?
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("max_pages", overrides.max_pages.map(i64::from))?
            .set_override_option(
                "output",
                overrides
                    .output
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("audio_marker", overrides.audio_marker.clone())?
            .build()?
            .try_deserialize()
    }
}
