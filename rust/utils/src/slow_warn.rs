use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{Level, warn};

/// Awaits `future`, logging a warning once it has been pending for longer than
/// `threshold` and again when it finally completes. The future is never cancelled.
///
/// `describe` is only invoked when the warning is actually emitted.
/// A zero threshold disables the check.
pub async fn warn_if_slow<F, M>(describe: M, threshold: Duration, future: F) -> F::Output
where
    F: Future,
    M: FnOnce() -> String,
{
    if threshold.is_zero() || !tracing::enabled!(Level::WARN) {
        return future.await;
    }

    tokio::pin!(future);
    match tokio::time::timeout(threshold, &mut future).await {
        Ok(output) => output,
        Err(_) => {
            let what = describe();
            warn!("Still waiting after {}s: {what}", threshold.as_secs_f32());
            let started = Instant::now();
            let output = future.await;
            warn!(
                "Finished after {}s: {what}",
                (started.elapsed() + threshold).as_secs_f32()
            );
            output
        }
    }
}
