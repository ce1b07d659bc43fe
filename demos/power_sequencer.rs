//! Power-rail sequencer driven by a tick loop.
//!
//! Run actions only record what should happen next; the loop performs the
//! transition between ticks, outside any action. Entry actions are free to
//! transition or terminate on their own, which the fault path relies on.
//!
//! ```text
//! RUST_LOG=hsm_engine=trace cargo run --example power_sequencer
//! ```

use hsm_engine::{GraphBuilder, GraphErrors, Machine, StateBuilder, StateGraph};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

const CORE_TARGET_MV: u32 = 900;
const IO_TARGET_MV: u32 = 3300;
const MAX_TICKS: u32 = 20;
const FAULT_CODE: i32 = -5;

#[derive(Debug, Default)]
struct Rails {
    core_mv: u32,
    io_mv: u32,
    tick: u32,
    brownout_at: Option<u32>,
    request: Option<&'static str>,
}

// Sequencer -> {Off, Ramping -> {Core, Io}, On, Fault}
fn sequencer() -> Result<StateGraph<Rails>, GraphErrors> {
    let mut builder = GraphBuilder::<Rails>::new();
    let root = builder.add(StateBuilder::<Rails>::new("Sequencer").on_run(|m| {
        let rails = m.data_mut();
        if rails.brownout_at == Some(rails.tick) {
            warn!(tick = rails.tick, "brownout detected");
            rails.request = Some("Fault");
        }
    }));
    builder.add(
        StateBuilder::<Rails>::new("Off")
            .parent(root)
            .on_run(|m| m.data_mut().request = Some("Ramping")),
    );
    let ramping = builder.add(
        StateBuilder::<Rails>::new("Ramping")
            .parent(root)
            .on_entry(|m| info!(tick = m.data().tick, "ramping rails")),
    );
    let core = builder.add(StateBuilder::<Rails>::new("Core").parent(ramping).on_run(|m| {
        let rails = m.data_mut();
        rails.core_mv = (rails.core_mv + 300).min(CORE_TARGET_MV);
        if rails.core_mv == CORE_TARGET_MV {
            rails.request = Some("Io");
        }
    }));
    builder.add(StateBuilder::<Rails>::new("Io").parent(ramping).on_run(|m| {
        let rails = m.data_mut();
        rails.io_mv = (rails.io_mv + 1100).min(IO_TARGET_MV);
        if rails.io_mv == IO_TARGET_MV {
            rails.request = Some("On");
        }
    }));
    builder.add(StateBuilder::<Rails>::new("On").parent(root).on_entry(|m| {
        let rails = m.data();
        info!(core_mv = rails.core_mv, io_mv = rails.io_mv, "rails up");
    }));
    builder.add(StateBuilder::<Rails>::new("Fault").parent(root).on_entry(|m| {
        let rails = m.data_mut();
        rails.core_mv = 0;
        rails.io_mv = 0;
        m.set_terminate(FAULT_CODE);
    }));
    builder.set_initial(ramping, core);
    builder.build()
}

fn power_up(graph: &StateGraph<Rails>, brownout_at: Option<u32>) -> Result<i32, String> {
    let off = graph.find("Off").ok_or("graph has no Off state")?;
    let rails = Rails {
        brownout_at,
        ..Rails::default()
    };
    let mut machine = Machine::new(graph, rails);
    machine.set_initial(off);

    while machine.data().tick < MAX_TICKS && machine.current_name() != Some("On") {
        machine.data_mut().tick += 1;
        let code = machine.run_state();
        if machine.is_terminated() {
            return Ok(code);
        }
        if let Some(next) = machine.data_mut().request.take() {
            let target = graph
                .find(next)
                .ok_or_else(|| format!("unknown state {next}"))?;
            machine.set_state(target);
        }
    }

    info!(
        state = ?machine.current_name(),
        ticks = machine.data().tick,
        transitions = machine.transition_count(),
        "sequence finished"
    );
    Ok(machine.terminate_val().unwrap_or(0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let graph = sequencer()?;
    for brownout_at in [None, Some(3)] {
        let code = power_up(&graph, brownout_at)?;
        println!("brownout at {brownout_at:?}: exit code {code}");
    }
    Ok(())
}
