//! Periodic re-evaluation
//!
//! Runs a synchronous pass on the blocking pool at a fixed interval until
//! cancelled. Passes never overlap; a cancellation that arrives while waiting
//! for the next tick prevents that tick from firing.

use std::time::Duration;

use tokio::{
    sync::oneshot,
    task::{self, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Default time between re-evaluation passes.
pub(crate) const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Owner of a running refresh loop.
///
/// Dropping the handle stops the loop before its next tick.
#[derive(Debug)]
pub(crate) struct RefreshHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the loop and wait for it to wind down.
    pub(crate) async fn cancel(self) {
        _ = self.stop.send(());

        if let Err(error) = self.task.await {
            warn!(%error, "refresh loop ended abnormally");
        }
    }
}

/// Run `pass` immediately and then every `period`.
pub(crate) fn spawn<F>(period: Duration, mut pass: F) -> RefreshHandle
where
    F: FnMut() + Send + 'static,
{
    let (stop, mut stopped) = oneshot::channel();

    let worker = tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = &mut stopped => break,
                _ = ticker.tick() => {}
            }

            match task::spawn_blocking(move || {
                pass();
                pass
            })
            .await
            {
                Ok(returned) => pass = returned,
                Err(error) => {
                    warn!(%error, "refresh pass panicked");
                    break;
                }
            }
        }

        debug!("refresh loop stopped");
    });

    RefreshHandle {
        stop,
        task: worker,
    }
}
