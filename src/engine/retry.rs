use std::future::Future;
use std::time::Duration;

// * Bounded retry with linear backoff: after failed attempt N, sleep `base_delay * N`.
// * The last error is returned once `max_attempts` is spent.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
    mut on_retry: R,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: FnMut(u32, &E),
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err);
                }
                on_retry(attempt, &err);
                let delay = base_delay * attempt;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
