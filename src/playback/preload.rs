use std::time::Duration;

use tokio::sync::watch;

/// How a flyover preload ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// The renderer reported that tiles at the start position were loaded.
    Settled,
    /// The deadline passed first; the flyover starts regardless.
    TimedOut,
}

/// Wait for the next settle notification on `settled`, or `timeout`,
/// whichever comes first.
///
/// Notifications the receiver has already seen do not count, so subscribe
/// before triggering the move. A closed channel can never settle and falls
/// through to the timeout.
pub async fn wait_for_settle(
    settled: &mut watch::Receiver<u64>,
    timeout: Duration,
) -> PreloadOutcome {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    tokio::select! {
        changed = settled.changed() => match changed {
            Ok(()) => PreloadOutcome::Settled,
            Err(_) => {
                (&mut deadline).await;
                PreloadOutcome::TimedOut
            }
        },
        _ = &mut deadline => PreloadOutcome::TimedOut,
    }
}
