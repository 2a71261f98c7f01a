//! Command implementations.

pub mod advertise;
pub mod prefs;
pub mod run;

pub use advertise::run_advertise;
pub use prefs::run_prefs;
pub use run::run_device;

use std::path::PathBuf;
use std::sync::Arc;

use sandlink_core::config::{IP_KEY, NAME_KEY};
use sandlink_core::error::CoreError;
use sandlink_core::{FilePreferences, MemoryPreferences, Preferences};
use tracing::debug;

use crate::error::CliError;

/// Preferences namespace shared by all subcommands.
pub const PREFS_NAMESPACE: &str = "sandnet";

/// Resolve the preferences directory, defaulting to the platform config dir.
pub fn resolve_prefs_dir(arg: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let dir = match arg {
        Some(dir) => dir,
        None => directories::ProjectDirs::from("", "", "sandlink")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(CliError::NoPrefsDir)?,
    };

    debug!("Using preferences directory {}", dir.display());

    Ok(dir)
}

/// Open the stored preferences namespace.
pub fn open_prefs(dir: PathBuf) -> Result<Arc<FilePreferences>, CliError> {
    let prefs =
        FilePreferences::open(dir, PREFS_NAMESPACE).map_err(CoreError::from)?;
    Ok(Arc::new(prefs))
}

/// Copy stored preferences into a memory store and apply CLI overrides, so
/// one-off flags never persist.
pub fn overlay_prefs(
    stored: &dyn Preferences,
    ip: Option<&str>,
    name: Option<&str>,
) -> Arc<MemoryPreferences> {
    let prefs = MemoryPreferences::new();

    for key in stored.keys() {
        if let Some(value) = stored.get(&key) {
            prefs.set(&key, &value);
        }
    }

    if let Some(ip) = ip {
        prefs.set(IP_KEY, ip);
    }
    if let Some(name) = name {
        prefs.set(NAME_KEY, name);
    }

    Arc::new(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_copies_and_overrides() {
        let stored = MemoryPreferences::new();
        stored.set(IP_KEY, "10.0.0.1");
        stored.set("advert_target", "10.0.0.255:37895");

        let overlay = overlay_prefs(&stored, Some("127.0.0.1"), Some("truss"));

        assert_eq!(overlay.get(IP_KEY), Some("127.0.0.1".to_string()));
        assert_eq!(overlay.get(NAME_KEY), Some("truss".to_string()));
        assert_eq!(
            overlay.get("advert_target"),
            Some("10.0.0.255:37895".to_string())
        );
        // The stored copy is untouched.
        assert_eq!(stored.get(IP_KEY), Some("10.0.0.1".to_string()));
        assert_eq!(stored.get(NAME_KEY), None);
    }
}
