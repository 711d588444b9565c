use {
    anyhow::Result,
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
    },
    std::{
        fs,
        time::Duration,
    },
};

mod server;

#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Run the auction engine.
    Run(RunOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    #[command(flatten)]
    pub config: ConfigOptions,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Config Options")]
#[group(id = "Config")]
pub struct ConfigOptions {
    /// Path to a configuration file containing the engine tuning.
    #[arg(long = "config")]
    #[arg(env = "AUCTION_CONFIG")]
    #[arg(default_value = "config.yaml")]
    pub config: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// How often the expiry sweeper scans for auctions to transition.
    #[serde(with = "humantime_serde", default = "default_sweep_interval")]
    pub sweep_interval: Duration,

    /// Auctions ending within this window get an "ending soon" notification
    /// on every sweep until they close.
    #[serde(with = "humantime_serde", default = "default_ending_soon_window")]
    pub ending_soon_window: Duration,

    /// Capacity of the live-update broadcast channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_ending_soon_window() -> Duration {
    Duration::from_secs(300)
}

fn default_event_channel_capacity() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval:         default_sweep_interval(),
            ending_soon_window:     default_ending_soon_window(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        let yaml_content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&yaml_content)?;
        Ok(config)
    }
}
