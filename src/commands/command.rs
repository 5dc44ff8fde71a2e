//! Command trait definition for CLI commands.
//!
//! Commands are dispatched through `enum_dispatch` so the subcommand enum in
//! `main` stays a plain enum without boxed trait objects.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all pairec CLI commands.
///
/// The `command_line` parameter carries the full invocation so commands can
/// record it in the output header's @PG chain.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
