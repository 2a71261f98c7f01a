//! SandLink core library.
//!
//! Hosts one SandNet-style lighting-control device: the UDP protocol node,
//! the start/stop lifecycle around it, and the scheduling seam that keeps
//! the periodic presence advertisement running on the host event loop.

pub mod config;
pub mod device;
pub mod error;
pub mod node;
pub mod preferences;
pub mod protocol;
pub mod scheduler;

pub use config::DeviceConfig;
pub use device::SandNetDevice;
pub use error::{CoreError, Result};
pub use node::SandNetNode;
pub use preferences::{FilePreferences, MemoryPreferences, Preferences};
pub use scheduler::{ManualScheduler, Scheduler, TimerId, TokioScheduler};
