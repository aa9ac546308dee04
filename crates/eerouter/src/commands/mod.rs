//! Command dispatch: bridges CLI args -> router calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod scan;
pub mod ssids;

use eerouter_core::Router;

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    mut router: Router,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(&mut router, args, format, quiet).await,
        Command::Ssids(args) => ssids::handle(&mut router, args, format, quiet).await,
        Command::Scan(args) => scan::handle(router, args, format, quiet).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
