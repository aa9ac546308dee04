//! Wireless network command handlers.

use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;

use eerouter_core::{Router, Ssid};

use crate::cli::{OutputFormat, SsidsArgs, SsidsCommand};
use crate::error::CliError;
use crate::output::{self, yes_no};

/// Serializable view of an SSID. The password is only filled in on request.
#[derive(Serialize)]
struct SsidView {
    ssid: String,
    enabled: bool,
    security: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    broadcast: bool,
    #[serde(skip)]
    has_password: bool,
}

impl SsidView {
    fn new(s: &Ssid, show_password: bool) -> Self {
        Self {
            ssid: s.ssid.clone(),
            enabled: s.enabled,
            security: s.security,
            password: s
                .password
                .as_ref()
                .filter(|_| show_password)
                .map(|p| p.expose_secret().to_owned()),
            broadcast: s.broadcast,
            has_password: s.password.is_some(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SsidRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Broadcast")]
    broadcast: String,
    #[tabled(rename = "Password")]
    password: String,
}

impl From<&SsidView> for SsidRow {
    fn from(s: &SsidView) -> Self {
        Self {
            ssid: s.ssid.clone(),
            enabled: yes_no(s.enabled),
            security: s.security.map_or_else(|| "-".into(), |c| c.to_string()),
            broadcast: yes_no(s.broadcast),
            password: match (&s.password, s.has_password) {
                (Some(pw), _) => pw.clone(),
                (None, true) => "****".into(),
                (None, false) => "-".into(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    router: &mut Router,
    args: SsidsArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    match args.command {
        SsidsCommand::List { show_passwords } => {
            let ssids = router.with_session(async |r| r.get_ssids().await).await?;
            let views: Vec<SsidView> = ssids
                .iter()
                .map(|s| SsidView::new(s, show_passwords))
                .collect();
            let out = output::render_list(format, &views, |s| SsidRow::from(s), |s| s.ssid.clone())?;
            output::print_output(&out, quiet);
            Ok(())
        }
    }
}
