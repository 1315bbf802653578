use clap::Subcommand;
use pomocycle_core::{FileStore, ManualTicker, Settings, SettingsStore, TimerEngine};

use crate::host;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "workMinutes", "volume")
        key: String,
    },
    /// Set a settings value (out-of-range values are clamped)
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Print the settings file location
    Path,
    /// Ring the completion cue at the configured volume
    Preview,
}

fn load(store: &FileStore) -> Settings {
    match store.load() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("failed to load settings, using defaults: {e}");
            Settings::default()
        }
    }
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open_default()?;
    match action {
        SettingsAction::Get { key } => match load(&store).get_field(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            let mut settings = load(&store);
            settings.set_field(&key, &value)?;
            store.persist(&settings)?;
            println!("ok");
        }
        SettingsAction::List => {
            let json = serde_json::to_string_pretty(&load(&store))?;
            println!("{json}");
        }
        SettingsAction::Reset => {
            store.persist(&Settings::default())?;
            println!("settings reset to defaults");
        }
        SettingsAction::Path => {
            println!("{}", store.path().display());
        }
        SettingsAction::Preview => {
            let mut engine = TimerEngine::new(
                Box::new(store),
                host::terminal_ports(false),
                Box::new(ManualTicker::new()),
            );
            engine.preview_volume();
        }
    }
    Ok(())
}
