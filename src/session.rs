//! Browser session lifecycle.

use crate::page::Session;
use tracing::{info, warn};

/// Run `work` against `session`, then close the session whatever the outcome.
///
/// The result of `work` is returned unchanged. A failure to close is logged
/// and never replaces it.
pub async fn with_session<S, T, E, W>(session: S, work: W) -> Result<T, E>
where
    S: Session,
    W: AsyncFnOnce(&S) -> Result<T, E>,
{
    let outcome = work(&session).await;
    if outcome.is_err() {
        warn!("Run failed; closing browser session");
    }

    match session.close().await {
        Ok(()) => info!("Browser session closed"),
        Err(e) => warn!(error = %e, "Failed to close browser session"),
    }
    outcome
}
