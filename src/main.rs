use jogkit::{
    init_logging, Axis, Config, Direction, EventBus, EventFilter, JogRuntime, MachineInterface,
    Position, SimulatedMachine, TouchJogController, WorkingArea, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Run a scripted jog session against a simulated machine.
///
/// Usage: `jogkit [config.toml|config.json]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => Config::default_path()?,
    };
    let config = Config::load_or_default(&path)?;

    init_logging(config.logging.format)?;
    tracing::info!("JogKit {} (built {})", VERSION, BUILD_DATE);
    tracing::info!("Using config {}", path.display());

    let bus = Arc::new(EventBus::new());
    bus.subscribe(EventFilter::All, |event| {
        tracing::info!("event: {}", event.description())
    });

    let area = config
        .machine
        .working_area_in_machine_units()
        .unwrap_or_else(|| WorkingArea::new(300.0, 200.0, 100.0, config.machine.units));
    let machine = SimulatedMachine::new()
        .with_position(Position::new((area.width - 2.5).max(0.0), 0.0, 0.0))
        .with_working_area(Some(area));
    tracing::info!("Simulated machine, working area {}", area);

    let controller = TouchJogController::from_config(machine, &config)?.with_event_bus(bus);
    let runtime = JogRuntime::spawn(controller);

    // Quick tap
    runtime.press_start(Axis::Y, Direction::Positive).await?;
    sleep(Duration::from_millis(80)).await;
    let outcome = runtime.press_end().await?;
    tracing::info!("Tap Y+ -> {:?}", outcome);

    // Hold toward the X limit; motion stops at the edge while still held
    runtime.press_start(Axis::X, Direction::Positive).await?;
    sleep(config.jog.hold_threshold() + config.jog.continuous_interval() * 5).await;
    let outcome = runtime.press_end().await?;
    tracing::info!("Hold X+ -> {:?}", outcome);

    // Coarser tap with the largest step
    if let Some(&largest) = config.jog.step_sizes.iter().max_by(|a, b| a.total_cmp(b)) {
        runtime.select_step_size(largest).await?;
        runtime.press_start(Axis::Z, Direction::Negative).await?;
        sleep(Duration::from_millis(80)).await;
        let outcome = runtime.press_end().await?;
        tracing::info!("Tap Z- with step {} -> {:?}", largest, outcome);
    }

    runtime.home_all().await?;

    let controller = runtime.shutdown().await?;
    tracing::info!("Final position {}", controller.machine().position());
    Ok(())
}
