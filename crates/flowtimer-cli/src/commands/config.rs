//! Configuration management commands.

use clap::Subcommand;
use flowtimer_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value by dot-separated key
    Get {
        /// Key, e.g. `attribution.policy`
        key: String,
    },
    /// Set a config value and persist it
    Set {
        /// Key, e.g. `notifications.sound`
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }

    Ok(())
}
