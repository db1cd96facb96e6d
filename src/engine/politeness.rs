use rand::Rng;
use std::time::Duration;

// * Uniform random delay in [min, max]. Sync on purpose: ThreadRng must not live across an await.
pub fn jitter(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let lo = min.as_millis() as u64;
    let hi = max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

pub async fn jittered_pause(min: Duration, max: Duration) {
    let delay = jitter(min, max);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
