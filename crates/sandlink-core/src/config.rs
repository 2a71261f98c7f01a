//! Device configuration resolution.
//!
//! A device resolves its [`DeviceConfig`] from the preferences store at
//! start time, so edits made while the device is stopped take effect on the
//! next start.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::device::INPUT_PORT_COUNT;
use crate::error::ConfigError;
use crate::preferences::Preferences;

/// Preference key selecting the interface IP. Empty or absent means
/// auto-select.
pub const IP_KEY: &str = "ip";

/// Preference key holding the advertised node name.
pub const NAME_KEY: &str = "name";

/// Preference key overriding the advertisement destination (`ip:port`).
/// Absent means limited broadcast on the control port; set it for
/// directed-unicast installs.
pub const ADVERT_TARGET_KEY: &str = "advert_target";

/// Resolved configuration for one device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub interface_ip: Ipv4Addr,
    pub enabled: bool,
    pub input_ports: usize,
    pub advert_target: Option<SocketAddr>,
}

impl DeviceConfig {
    /// Resolve a configuration from the preferences store.
    ///
    /// A non-empty `ip` preference must parse as an IPv4 address; a broken
    /// value is an error rather than a silent fallback. An empty or absent
    /// value auto-selects the first non-loopback interface.
    pub fn resolve(prefs: &dyn Preferences, enabled: bool) -> Result<Self, ConfigError> {
        let interface_ip = match prefs.get(IP_KEY) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<Ipv4Addr>()
                .map_err(|_| ConfigError::InvalidIp(raw))?,
            _ => pick_interface_ip()?,
        };

        let advert_target = match prefs.get(ADVERT_TARGET_KEY) {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::InvalidTarget(raw))?,
            ),
            _ => None,
        };

        Ok(Self {
            interface_ip,
            enabled,
            input_ports: INPUT_PORT_COUNT,
            advert_target,
        })
    }
}

/// Pick the first non-loopback IPv4 address among the host's interfaces.
pub fn pick_interface_ip() -> Result<Ipv4Addr, ConfigError> {
    let interfaces = get_if_addrs::get_if_addrs().map_err(|_| ConfigError::NoInterface)?;

    for interface in interfaces {
        if interface.is_loopback() {
            continue;
        }
        if let IpAddr::V4(ip) = interface.ip() {
            return Ok(ip);
        }
    }

    Err(ConfigError::NoInterface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    #[test]
    fn test_resolve_explicit_ip() {
        let prefs = MemoryPreferences::new();
        prefs.set(IP_KEY, "192.168.1.50");

        let config = DeviceConfig::resolve(&prefs, true).unwrap();
        assert_eq!(config.interface_ip, Ipv4Addr::new(192, 168, 1, 50));
        assert!(config.enabled);
        assert_eq!(config.input_ports, INPUT_PORT_COUNT);
        assert_eq!(config.advert_target, None);
    }

    #[test]
    fn test_resolve_invalid_ip_is_error() {
        let prefs = MemoryPreferences::new();
        prefs.set(IP_KEY, "not-an-ip");

        let result = DeviceConfig::resolve(&prefs, true);
        assert!(matches!(result, Err(ConfigError::InvalidIp(_))));
    }

    #[test]
    fn test_resolve_empty_ip_auto_selects() {
        let prefs = MemoryPreferences::new();
        prefs.set(IP_KEY, "");

        // The environment may or may not have a non-loopback interface;
        // both outcomes are defined.
        match DeviceConfig::resolve(&prefs, true) {
            Ok(config) => assert!(!config.interface_ip.is_loopback()),
            Err(ConfigError::NoInterface) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_resolve_advert_target() {
        let prefs = MemoryPreferences::new();
        prefs.set(IP_KEY, "127.0.0.1");
        prefs.set(ADVERT_TARGET_KEY, "10.0.0.255:37895");

        let config = DeviceConfig::resolve(&prefs, false).unwrap();
        assert_eq!(
            config.advert_target,
            Some("10.0.0.255:37895".parse().unwrap())
        );
        assert!(!config.enabled);
    }

    #[test]
    fn test_resolve_invalid_advert_target_is_error() {
        let prefs = MemoryPreferences::new();
        prefs.set(IP_KEY, "127.0.0.1");
        prefs.set(ADVERT_TARGET_KEY, "10.0.0.255");

        let result = DeviceConfig::resolve(&prefs, true);
        assert!(matches!(result, Err(ConfigError::InvalidTarget(_))));
    }
}
