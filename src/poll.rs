//! Fixed-interval poller. Each tick nudges the controller; the controller
//! decides whether `auto_refresh` allows acting on it.

use std::sync::mpsc::Sender;
use std::sync::Mutex;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::app::Msg;

#[derive(Default)]
pub struct Poller {
    shutdown_tx: Mutex<Option<watch::Sender<bool>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `interval_secs`. A running poller is stopped
    /// first, so a reload with a new interval takes effect immediately.
    pub fn start(&self, runtime: &tokio::runtime::Handle, interval_secs: u64, tx: Sender<Msg>) {
        self.stop();

        let secs = interval_secs.max(1);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        *self.shutdown_tx.lock().unwrap() = Some(shutdown_tx);

        let handle = runtime.spawn(async move {
            let mut ticker = interval(Duration::from_secs(secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; startup already fetched.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("Poll tick");
                        if tx.send(Msg::PollTick).is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("Poller shutting down");
                            break;
                        }
                    }
                }
            }
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    pub fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().unwrap().take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
