//! Advertise command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use sandlink_core::{SandNetDevice, TokioScheduler};

use crate::cli::AdvertiseArgs;
use crate::error::CliError;

use super::run::DEVICE_DISPLAY_NAME;

/// Send a fixed number of advertisements, then stop.
pub async fn run_advertise(
    args: AdvertiseArgs,
    prefs_dir: PathBuf,
    json: bool,
) -> Result<(), CliError> {
    if args.count == 0 {
        return Err(CliError::InvalidArgument(
            "count must be at least 1".to_string(),
        ));
    }

    let stored = super::open_prefs(prefs_dir)?;
    let prefs = super::overlay_prefs(stored.as_ref(), args.ip.as_deref(), None);

    let scheduler = Arc::new(TokioScheduler::new().map_err(CliError::from)?);

    // The periodic timer stays off; this command drives the sends itself.
    let mut device = SandNetDevice::new(DEVICE_DISPLAY_NAME, prefs, scheduler, false);
    device.start().map_err(CliError::Core)?;

    for i in 0..args.count {
        let sent = device.send_advertisement().map_err(CliError::Core)?;

        if json {
            let line = serde_json::json!({
                "advertisement": i + 1,
                "of": args.count,
                "bytes": sent,
            });
            println!("{}", line);
        } else {
            println!(
                "{} advertisement {}/{} ({} bytes)",
                "[OK]".green(),
                i + 1,
                args.count,
                sent
            );
        }

        if i + 1 < args.count {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }

    device.stop().map_err(CliError::Core)?;

    Ok(())
}
