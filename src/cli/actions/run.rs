use crate::cli::actions::{server, users, Action};
use anyhow::Result;

/// Execute the provided action. Single dispatch point for all CLI actions:
/// new `Action::*` variants get a corresponding `*::execute` call here.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn } => server::execute(port, dsn).await,
        Action::Users { api_url, command } => users::execute(&api_url, command).await,
    }
}
