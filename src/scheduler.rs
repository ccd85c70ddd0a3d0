use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::db::CycleReport;
use crate::ingest::CycleError;

pub trait Cycle: Send + Sync + 'static {
    fn run(&self) -> impl Future<Output = Result<CycleReport, CycleError>> + Send;
}

enum Message {
    Shutdown,
}

/// Handle to the running scheduler task.
pub struct SchedulerHandle {
    sender: mpsc::Sender<Message>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the loop once the current cycle, if any, has returned.
    pub async fn shutdown(self) {
        let _ = self.sender.send(Message::Shutdown).await;
        if let Err(e) = self.task.await {
            tracing::error!("Scheduler task ended abnormally: {}", e);
        }
    }
}

struct Scheduler<C> {
    cycle: C,
    interval: Duration,
    receiver: mpsc::Receiver<Message>,
}

impl<C: Cycle> Scheduler<C> {
    async fn run(mut self) {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately, giving the startup cycle
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.execute().await;
                }
                msg = self.receiver.recv() => {
                    match msg {
                        Some(Message::Shutdown) | None => {
                            tracing::info!("Scheduler stopped");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn execute(&self) {
        if let Err(e) = self.cycle.run().await {
            tracing::error!("Fetch cycle failed: {}", e);
        }
    }
}

/// Spawns the periodic fetch task.
///
/// The first cycle runs as soon as the task starts. After that a cycle runs
/// on every interval tick. Ticks that fall while a cycle is still running are
/// skipped, so two cycles never overlap.
pub fn spawn_scheduler<C: Cycle>(cycle: C, interval: Duration) -> SchedulerHandle {
    let (sender, receiver) = mpsc::channel(1);

    let scheduler = Scheduler {
        cycle,
        interval,
        receiver,
    };
    let task = tokio::spawn(scheduler.run());

    SchedulerHandle { sender, task }
}
