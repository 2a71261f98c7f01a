//! Prefs command implementation.

use std::path::PathBuf;

use crate::cli::{PrefsArgs, PrefsCommands};
use crate::error::CliError;
use crate::output;

use sandlink_core::Preferences;

/// Run a preferences subcommand.
pub fn run_prefs(args: PrefsArgs, prefs_dir: PathBuf, json: bool) -> Result<(), CliError> {
    let prefs = super::open_prefs(prefs_dir)?;

    match args.command {
        PrefsCommands::Show => {
            let entries: Vec<(String, String)> = prefs
                .keys()
                .into_iter()
                .filter_map(|key| prefs.get(&key).map(|value| (key, value)))
                .collect();
            println!("{}", output::render_prefs(&entries, json));
            Ok(())
        }

        PrefsCommands::Get(key_args) => match prefs.get(&key_args.key) {
            Some(value) => {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({ "key": key_args.key, "value": value })
                    );
                } else {
                    println!("{}", value);
                }
                Ok(())
            }
            None => Err(CliError::Other(format!(
                "Preference '{}' is not set",
                key_args.key
            ))),
        },

        PrefsCommands::Set(set_args) => {
            prefs
                .set_value(&set_args.key, &set_args.value)
                .map_err(CliError::from)?;
            if !json {
                println!("{} = {}", set_args.key, set_args.value);
            }
            Ok(())
        }

        PrefsCommands::Unset(key_args) => {
            let removed = prefs.remove_value(&key_args.key).map_err(CliError::from)?;
            if !removed {
                return Err(CliError::Other(format!(
                    "Preference '{}' is not set",
                    key_args.key
                )));
            }
            if !json {
                println!("Removed '{}'", key_args.key);
            }
            Ok(())
        }
    }
}
