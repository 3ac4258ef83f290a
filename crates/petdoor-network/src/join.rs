//! Network join with unbounded retry.
//!
//! The controller has no offline mode: it keeps trying to join the
//! provisioned network until it succeeds, logging every attempt.

use std::time::Duration;

use petdoor_hardware::NetworkLink;
use tracing::{info, warn};

/// Join `ssid`, retrying every `retry_interval` until the link reports
/// success.
///
/// Returns the number of attempts made.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use petdoor_hardware::mock::MockNetworkLink;
/// use petdoor_network::join_with_retry;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut link, _handle) = MockNetworkLink::new(2);
///     let attempts = join_with_retry(&mut link, "home", "secret", Duration::from_millis(1)).await;
///     assert_eq!(attempts, 3);
/// }
/// ```
pub async fn join_with_retry<L: NetworkLink>(
    link: &mut L,
    ssid: &str,
    password: &str,
    retry_interval: Duration,
) -> u32 {
    info!(ssid, "joining network");
    let mut attempt = 0u32;

    loop {
        attempt = attempt.saturating_add(1);

        match link.join(ssid, password).await {
            Ok(()) => {
                info!(ssid, attempt, "network joined");
                return attempt;
            }
            Err(e) => {
                warn!(ssid, attempt, error = %e, "network join failed, retrying");
                tokio::time::sleep(retry_interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petdoor_hardware::mock::MockNetworkLink;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_joined() {
        let (mut link, handle) = MockNetworkLink::new(4);
        let start = Instant::now();

        let attempts = join_with_retry(&mut link, "home", "pw", Duration::from_millis(500)).await;

        assert_eq!(attempts, 5);
        assert_eq!(handle.attempts(), 5);
        assert!(link.is_connected());
        assert!(start.elapsed() >= Duration::from_millis(2_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_succeeds() {
        let (mut link, _) = MockNetworkLink::new(0);
        let start = Instant::now();

        assert_eq!(join_with_retry(&mut link, "home", "pw", Duration::from_secs(1)).await, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
