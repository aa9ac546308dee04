//! Presence scan: which MACs are on the network right now.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use eerouter_core::{DeviceScanner, Router};

use crate::cli::{OutputFormat, ScanArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Serialize)]
struct Presence {
    mac: String,
    name: Option<String>,
    ip: Option<String>,
    port: Option<String>,
    last_active: Option<String>,
}

#[derive(Tabled)]
struct PresenceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Interface")]
    port: String,
    #[tabled(rename = "Last Active")]
    last_active: String,
}

impl From<&Presence> for PresenceRow {
    fn from(p: &Presence) -> Self {
        Self {
            mac: p.mac.clone(),
            name: or_dash(p.name.as_deref()),
            ip: or_dash(p.ip.as_deref()),
            port: or_dash(p.port.as_deref()),
            last_active: or_dash(p.last_active.as_deref()),
        }
    }
}

/// One scan: refresh the scanner and describe each present MAC.
async fn scan_once(scanner: &mut DeviceScanner) -> Result<Vec<Presence>, CliError> {
    let macs = scanner.scan_devices().await?;
    Ok(macs
        .into_iter()
        .map(|mac| {
            let extra = scanner.extra_attributes(&mac);
            Presence {
                name: scanner.device_name(&mac).map(str::to_owned),
                ip: extra.as_ref().and_then(|e| e.ip.clone()),
                port: extra.as_ref().and_then(|e| e.port.clone()),
                last_active: extra
                    .as_ref()
                    .and_then(|e| e.last_active.as_ref())
                    .map(ToString::to_string),
                mac,
            }
        })
        .collect())
}

fn render(present: &[Presence], format: OutputFormat) -> Result<String, CliError> {
    output::render_list(format, present, |p| PresenceRow::from(p), |p| p.mac.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    router: Router,
    args: ScanArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let mut scanner = DeviceScanner::new(router);

    let Some(secs) = args.interval.filter(|s| *s > 0) else {
        let present = scan_once(&mut scanner).await?;
        output::print_output(&render(&present, format)?, quiet);
        return Ok(());
    };

    info!(interval = secs, host = %scanner.router().host(), "polling for presence");
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed cycle is logged; the next tick tries again.
                match scan_once(&mut scanner).await {
                    Ok(present) => output::print_output(&render(&present, format)?, quiet),
                    Err(e) => warn!(error = %e, "scan failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping scan");
                return Ok(());
            }
        }
    }
}
