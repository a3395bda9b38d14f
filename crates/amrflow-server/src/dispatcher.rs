use crate::store::{StepOutcome, Store};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// A simulated AMR that executes at most one instance at a time.
#[derive(Debug, Clone)]
struct Amr {
    name: String,
    instance_id: Option<String>,
}

/// Drives queued instances through their action sequences on behalf of a
/// small simulated fleet: each tick, idle AMRs claim the oldest queued
/// instance and busy AMRs advance theirs by one action. Paused instances
/// hold their position; terminal instances free their AMR.
pub struct Dispatcher {
    store: Store,
    fleet: Vec<Amr>,
}

impl Dispatcher {
    pub fn new(store: Store, fleet_size: usize) -> Self {
        let fleet = (1..=fleet_size.max(1))
            .map(|n| Amr {
                name: format!("AMR-{n:03}"),
                instance_id: None,
            })
            .collect();
        Self { store, fleet }
    }

    /// One scheduling round over the whole fleet.
    pub async fn tick(&mut self) {
        for amr in &mut self.fleet {
            match amr.instance_id.clone() {
                None => {
                    if let Some(instance) = self.store.claim_next_queued().await {
                        tracing::info!(amr = %amr.name, instance = %instance.id, "assigned instance");
                        amr.instance_id = Some(instance.id);
                    }
                }
                Some(id) => match self.store.step_instance(&id).await {
                    StepOutcome::Advanced(index) => {
                        tracing::info!(amr = %amr.name, instance = %id, index, "advanced to action");
                    }
                    StepOutcome::Completed => {
                        tracing::info!(amr = %amr.name, instance = %id, "instance completed");
                        amr.instance_id = None;
                    }
                    StepOutcome::Held => {}
                    StepOutcome::Released => {
                        tracing::info!(amr = %amr.name, instance = %id, "released");
                        amr.instance_id = None;
                    }
                },
            }
        }
    }

    /// Tick forever on a fixed interval. Spawned by `serve`.
    pub async fn run(mut self, interval: Duration) {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first interval tick fires immediately; skip it so a fresh
        // queue gets a full interval before assignment.
        timer.tick().await;
        loop {
            timer.tick().await;
            self.tick().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
