//! Output formatting for CLI results.

use comfy_table::{ContentArrangement, Table};
use sandlink_core::device::ports::PortProvider;
use sandlink_core::SandNetDevice;
use serde::Serialize;

/// Snapshot of a running device for presentation.
#[derive(Debug, Serialize)]
pub struct DeviceSummary {
    pub device_id: String,
    pub name: String,
    pub node_name: String,
    pub interface_ip: String,
    pub local_addr: Option<String>,
    pub mac: String,
    pub advertising: bool,
    pub input_ports: Vec<String>,
    pub started_at: String,
}

impl DeviceSummary {
    /// Build a summary from a running device. Returns `None` while stopped.
    pub fn from_device(device: &SandNetDevice) -> Option<Self> {
        let node = device.node()?;

        Some(Self {
            device_id: device.device_id().to_string(),
            name: device.name().to_string(),
            node_name: node.name().to_string(),
            interface_ip: node.interface_ip().to_string(),
            local_addr: node.local_addr().ok().map(|addr| addr.to_string()),
            mac: format_mac(node.mac()),
            advertising: device.is_advertising(),
            input_ports: device
                .input_ports()
                .iter()
                .map(|port| port.port_id())
                .collect(),
            started_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Render as a table or JSON.
    pub fn render(&self, json: bool) -> String {
        if json {
            return serde_json::to_string_pretty(self)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
        }

        let ports = self.input_ports.join(", ");
        let advertising = if self.advertising { "every 2s" } else { "off" };

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Field", "Value"]);
        table.add_row(vec!["Device ID", self.device_id.as_str()]);
        table.add_row(vec!["Name", self.name.as_str()]);
        table.add_row(vec!["Node name", self.node_name.as_str()]);
        table.add_row(vec!["Interface", self.interface_ip.as_str()]);
        if let Some(addr) = &self.local_addr {
            table.add_row(vec!["Socket", addr.as_str()]);
        }
        table.add_row(vec!["MAC", self.mac.as_str()]);
        table.add_row(vec!["Advertising", advertising]);
        table.add_row(vec!["Input ports", ports.as_str()]);

        table.to_string()
    }
}

/// Render a preference listing as a table or JSON.
pub fn render_prefs(entries: &[(String, String)], json: bool) -> String {
    if json {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect();
        return serde_json::to_string_pretty(&map)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    }

    if entries.is_empty() {
        return "No preferences stored.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in entries {
        table.add_row(vec![key, value]);
    }

    table.to_string()
}

/// Format a MAC address as colon-separated hex.
pub fn format_mac(mac: [u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
