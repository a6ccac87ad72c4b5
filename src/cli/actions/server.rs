use crate::gridfolio;
use anyhow::Result;

/// Run the users API server.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(port: u16, dsn: Option<String>) -> Result<()> {
    gridfolio::new(port, dsn).await
}
