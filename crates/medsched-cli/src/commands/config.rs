use clap::Subcommand;
use medsched_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key (e.g. "calendar.week_start", "print.row_height")
        key: String,
    },
    /// Change one setting and save
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration as TOML
    List,
    /// Print the location of the config file
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            print!("{}", toml::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
