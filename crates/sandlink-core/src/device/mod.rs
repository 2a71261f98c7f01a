//! SandNet lighting device.
//!
//! Owns one protocol node, drives its start/stop lifecycle, and keeps the
//! periodic presence advertisement running on the host scheduler.

pub mod ports;

use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{DeviceConfig, NAME_KEY};
use crate::error::{CoreError, DeviceError};
use crate::node::{NodeOptions, SandNetNode};
use crate::preferences::Preferences;
use crate::scheduler::{Scheduler, TimerId};

use ports::{allocate_input_ports, InputPort, PortProvider};

/// Stable device id the host uses to address this device.
pub const DEVICE_ID: &str = "1";

/// Number of input ports created at start.
pub const INPUT_PORT_COUNT: usize = 8;

/// Advertisement timer period in milliseconds.
pub const ADVERTISEMENT_PERIOD_MS: u64 = 2000;

/// One logical SandNet device.
///
/// Lifecycle is `new -> start -> stop`, and `stop -> start` restarts with a
/// fresh node. The node exists exactly while the device is running; the
/// advertisement timer exists exactly while the device is running *and*
/// advertising is enabled.
pub struct SandNetDevice {
    name: String,
    preferences: Arc<dyn Preferences>,
    scheduler: Arc<dyn Scheduler>,
    enabled: bool,
    node: Option<Arc<SandNetNode>>,
    input_ports: Vec<InputPort>,
    timer: Option<TimerId>,
}

impl SandNetDevice {
    /// Create a stopped device.
    ///
    /// `preferences` and `scheduler` are host-owned collaborators that
    /// outlive any running span of the device. `enabled` controls whether
    /// `start` registers the periodic advertisement.
    pub fn new(
        name: impl Into<String>,
        preferences: Arc<dyn Preferences>,
        scheduler: Arc<dyn Scheduler>,
        enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            preferences,
            scheduler,
            enabled,
            node: None,
            input_ports: Vec::new(),
            timer: None,
        }
    }

    /// Start the device: resolve configuration, bind the node, allocate the
    /// input ports, and (if enabled) register the advertisement timer.
    ///
    /// All-or-nothing: on any failure the device stays stopped with no node,
    /// no ports, and no timer registration left behind. Starting a running
    /// device is an error.
    pub fn start(&mut self) -> Result<(), CoreError> {
        if self.node.is_some() {
            return Err(DeviceError::AlreadyRunning {
                id: DEVICE_ID.to_string(),
            }
            .into());
        }

        let config = DeviceConfig::resolve(self.preferences.as_ref(), self.enabled)?;
        let node_name = self
            .preferences
            .get(NAME_KEY)
            .unwrap_or_else(|| self.name.clone());

        let node = Arc::new(SandNetNode::bind(NodeOptions {
            interface_ip: config.interface_ip,
            name: node_name,
            input_ports: config.input_ports as u8,
            advert_target: config.advert_target,
        })?);

        let timer = if config.enabled {
            // The callback holds only a weak handle, so a firing scheduled
            // before stop() can never touch a dropped node.
            let weak = Arc::downgrade(&node);
            let registration = self.scheduler.register_repeating(
                Duration::from_millis(ADVERTISEMENT_PERIOD_MS),
                Box::new(move || advertise(&weak)),
            );

            match registration {
                Ok(id) => Some(id),
                Err(e) => {
                    drop(node);
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        self.input_ports = allocate_input_ports(DEVICE_ID, config.input_ports);
        self.node = Some(node);
        self.timer = timer;

        info!(
            device = DEVICE_ID,
            ip = %config.interface_ip,
            advertising = config.enabled,
            "device started"
        );

        Ok(())
    }

    /// Stop the device. Idempotent: safe on a device that never started.
    ///
    /// The timer is cancelled before the node is released, so an in-flight
    /// firing never outlives the endpoint it writes to. A missed
    /// cancellation (timer already consumed) is benign.
    pub fn stop(&mut self) -> Result<(), CoreError> {
        if let Some(id) = self.timer.take() {
            if !self.scheduler.cancel(id) {
                debug!(device = DEVICE_ID, "advertisement timer already consumed");
            }
        }

        if self.node.take().is_some() {
            self.input_ports.clear();
            info!(device = DEVICE_ID, "device stopped");
        }

        Ok(())
    }

    /// Emit one presence advertisement through the owned node.
    ///
    /// Shared by the timer path and explicit host calls; the node's result
    /// is returned unmodified. Calling this on a stopped device is a defined
    /// failure, never a crash.
    pub fn send_advertisement(&self) -> Result<usize, CoreError> {
        match &self.node {
            Some(node) => Ok(node.send_advertisement()?),
            None => Err(DeviceError::NotRunning {
                id: DEVICE_ID.to_string(),
            }
            .into()),
        }
    }

    /// The owned node, while running.
    ///
    /// The borrow ties the reference to the device, so it cannot be cached
    /// across a stop/start cycle.
    pub fn node(&self) -> Option<&SandNetNode> {
        self.node.as_deref()
    }

    /// Stable device id.
    pub fn device_id(&self) -> &'static str {
        DEVICE_ID
    }

    /// Display name supplied by the host.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.node.is_some()
    }

    /// Whether the periodic advertisement timer is registered.
    pub fn is_advertising(&self) -> bool {
        self.timer.is_some()
    }
}

impl PortProvider for SandNetDevice {
    fn input_ports(&self) -> &[InputPort] {
        &self.input_ports
    }
}

impl Drop for SandNetDevice {
    // Hosts are expected to stop before dropping; this keeps a missed stop
    // from leaking the timer registration.
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Timer callback: emit one advertisement if the node is still alive.
fn advertise(node: &Weak<SandNetNode>) {
    match node.upgrade() {
        Some(node) => {
            if let Err(e) = node.send_advertisement() {
                warn!(device = DEVICE_ID, "advertisement failed: {}", e);
            }
        }
        None => debug!(device = DEVICE_ID, "advertisement timer fired after node release"),
    }
}
