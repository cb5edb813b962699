use std::time::Duration;

use almanac_core::AlmanacError;
use rand::Rng;

/// Base delay plus a random extra of up to `jitter_percent` percent.
pub(crate) fn jitter_wait(base: Duration, jitter_percent: u8) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100)
    };
    let mut rng = rand::rng();
    Duration::from_millis(base_ms.saturating_add(rng.random_range(0..jitter_range)))
}

/// Join a collection of tasks under an optional deadline.
///
/// On timeout, returns `AlmanacError::Timeout` labelled with `stage`; tasks
/// still running on the blocking pool are detached, not aborted.
pub(crate) async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<Duration>,
    stage: &str,
) -> Result<Vec<T>, AlmanacError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    let all = futures::future::join_all(tasks);
    match deadline {
        Some(d) => tokio::time::timeout(d, all)
            .await
            .map_err(|_| AlmanacError::timeout(stage)),
        None => Ok(all.await),
    }
}
