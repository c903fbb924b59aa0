use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::broker::Broker;

/// Periodically purges messages that have been pending longer than `ttl`.
///
/// Each sweep runs on the blocking pool since stores do synchronous I/O.
/// Runs until the task is aborted. Only started when a message TTL is
/// configured; the broker itself never spawns it.
pub async fn start_expiry_loop(broker: Arc<Broker>, ttl: Duration, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;

        let sweeper = broker.clone();
        let swept = tokio::task::spawn_blocking(move || sweeper.purge_expired(ttl)).await;

        match swept {
            Ok(Ok(0)) => {}
            Ok(Ok(purged)) => info!("Purged {purged} expired messages"),
            Ok(Err(e)) => error!("Expiry sweep failed: {e}"),
            Err(e) => error!("Expiry sweep task failed: {e}"),
        }
    }
}
