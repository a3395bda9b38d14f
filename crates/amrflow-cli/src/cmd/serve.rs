use std::time::Duration;

/// Run the task service with its simulated fleet until interrupted.
pub fn run(port: u16, fleet: usize, tick_secs: u64) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(amrflow_server::serve(
        port,
        fleet,
        Duration::from_secs(tick_secs.max(1)),
    ))
}
