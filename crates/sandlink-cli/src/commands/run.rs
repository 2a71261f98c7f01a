//! Run command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use colored::*;
use sandlink_core::{SandNetDevice, TokioScheduler};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::DeviceSummary;

/// Default display name for the hosted device.
pub const DEVICE_DISPLAY_NAME: &str = "SandNet Device";

/// Run the device until interrupted.
pub async fn run_device(args: RunArgs, prefs_dir: PathBuf, json: bool) -> Result<(), CliError> {
    let stored = super::open_prefs(prefs_dir)?;
    let prefs = super::overlay_prefs(stored.as_ref(), args.ip.as_deref(), args.name.as_deref());

    let scheduler = Arc::new(TokioScheduler::new().map_err(CliError::from)?);

    let mut device = SandNetDevice::new(
        DEVICE_DISPLAY_NAME,
        prefs,
        scheduler,
        !args.no_advertise,
    );
    device.start().map_err(CliError::Core)?;

    if let Some(summary) = DeviceSummary::from_device(&device) {
        println!("{}", summary.render(json));
    }

    if !json {
        println!();
        println!("{}", "Press Ctrl+C to stop".dimmed());
    }

    tokio::signal::ctrl_c().await.map_err(CliError::Io)?;

    device.stop().map_err(CliError::Core)?;

    if !json {
        println!("Device stopped.");
    }

    Ok(())
}
