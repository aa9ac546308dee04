//! Device command handlers.

use tabled::Tabled;

use eerouter_core::{Device, Router, Timestamp, port_label};

use crate::cli::{DevicesArgs, DevicesCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, or_dash, yes_no};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Last Active")]
    last_active: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            mac: d.mac.clone(),
            hostname: or_dash(d.display_name()),
            ip: or_dash(d.ip.as_deref()),
            port: or_dash(d.port.as_deref().map(port_label)),
            active: yes_no(d.is_active()),
            last_active: d
                .time_last_active
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        }
    }
}

fn detail(d: &Device) -> String {
    let time = |t: Option<&Timestamp>| t.map_or_else(|| "-".into(), ToString::to_string);
    [
        format!("MAC:           {}", d.mac),
        format!("Hostname:      {}", or_dash(d.hostname.as_deref())),
        format!("Name:          {}", or_dash(d.name.as_deref())),
        format!("IPv4:          {}", or_dash(d.ip.as_deref())),
        format!("IPv6:          {}", or_dash(d.ipv6.as_deref())),
        format!("IPv6 (link):   {}", or_dash(d.ipv6_ll.as_deref())),
        format!("Port:          {}", or_dash(d.port.as_deref())),
        format!(
            "Active:        {} (ipv4 {}, ipv6 {}, link-local {})",
            yes_no(d.activity),
            yes_no(d.activity_ip),
            yes_no(d.activity_ipv6),
            yes_no(d.activity_ipv6_ll)
        ),
        format!("First Seen:    {}", time(d.time_first_seen.as_ref())),
        format!("Last Active:   {}", time(d.time_last_active.as_ref())),
        format!("DHCP Option:   {}", or_dash(d.dhcp_option.as_deref())),
        format!("OS:            {}", or_dash(d.os.as_deref())),
        format!("Device:        {}", or_dash(d.device.as_deref())),
        format!("Vendor (OUI):  {}", or_dash(d.device_oui.as_deref())),
        format!("Serial:        {}", or_dash(d.device_serial.as_deref())),
        format!("Class:         {}", or_dash(d.device_class.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    router: &mut Router,
    args: DevicesArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { active } => {
            let devices = router
                .with_session(async |r| {
                    if active {
                        r.get_active_devices().await
                    } else {
                        r.get_devices().await
                    }
                })
                .await?;
            let out = output::render_list(format, &devices, |d| DeviceRow::from(d), |d| d.mac.clone())?;
            output::print_output(&out, quiet);
            Ok(())
        }

        DevicesCommand::Get { mac } => {
            let devices = router.with_session(async |r| r.get_devices().await).await?;
            let found = devices.iter().find(|d| d.mac.eq_ignore_ascii_case(&mac));
            match found {
                Some(d) => {
                    let out = output::render_single(format, d, detail, |d| d.mac.clone())?;
                    output::print_output(&out, quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: mac,
                    list_command: "devices list".into(),
                }),
            }
        }
    }
}
