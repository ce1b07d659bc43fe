//! Link controller with nested states and event bubbling.
//!
//! Run actions transition directly here, so the machine is configured with
//! [`RunPhasePolicy::Permit`]. Carrier loss is handled once, by `Up`, for
//! every state nested inside it. Halfway through, the machine is
//! checkpointed and resumed as a fresh instance.
//!
//! ```text
//! RUST_LOG=hsm_engine=debug cargo run --example link_controller
//! ```

use hsm_engine::{
    Checkpoint, ConfigBuilder, GraphBuilder, GraphErrors, Machine, MachineConfig, RunPhasePolicy,
    StateBuilder, StateGraph,
};
use std::collections::VecDeque;
use tracing::info;
use tracing_subscriber::prelude::*;

const NEGOTIATION_ROUNDS: u32 = 2;

#[derive(Debug, Default)]
struct Port {
    carrier: bool,
    rounds: u32,
    queue: VecDeque<u32>,
    sent: Vec<u32>,
}

fn go(m: &mut Machine<'_, Port>, name: &str) {
    if let Some(target) = m.graph().find(name) {
        m.set_state(target);
    }
}

// Link -> {Down, Up -> {Negotiating, Established -> {Ready, Busy}}}
fn link() -> Result<StateGraph<Port>, GraphErrors> {
    let mut builder = GraphBuilder::<Port>::new();
    let root = builder.add(StateBuilder::new("Link"));
    let down = builder.add(StateBuilder::<Port>::new("Down").parent(root).on_run(|m| {
        if m.data().carrier {
            go(m, "Up");
        }
    }));
    let up = builder.add(
        StateBuilder::<Port>::new("Up")
            .parent(root)
            .on_entry(|m| m.data_mut().rounds = 0)
            .on_run(|m| {
                if !m.data().carrier {
                    info!("carrier lost");
                    go(m, "Down");
                }
            }),
    );
    let negotiating = builder.add(StateBuilder::<Port>::new("Negotiating").parent(up).on_run(|m| {
        let port = m.data_mut();
        port.rounds += 1;
        if port.carrier && port.rounds >= NEGOTIATION_ROUNDS {
            go(m, "Established");
        }
    }));
    let established = builder.add(
        StateBuilder::<Port>::new("Established")
            .parent(up)
            .on_entry(|m| info!(rounds = m.data().rounds, "link established")),
    );
    let ready = builder.add(StateBuilder::<Port>::new("Ready").parent(established).on_run(|m| {
        if m.data().carrier && !m.data().queue.is_empty() {
            go(m, "Busy");
        }
    }));
    builder.add(StateBuilder::<Port>::new("Busy").parent(established).on_run(|m| {
        if !m.data().carrier {
            return;
        }
        let port = m.data_mut();
        if let Some(frame) = port.queue.pop_front() {
            port.sent.push(frame);
        }
        if port.queue.is_empty() {
            go(m, "Ready");
        } else {
            m.set_handled();
        }
    }));
    builder.set_initial(root, down);
    builder.set_initial(up, negotiating);
    builder.set_initial(established, ready);
    builder.build()
}

/// One scripted tick: optionally change the carrier or queue a frame, then
/// give the machine control once.
fn tick(machine: &mut Machine<'_, Port>, carrier: Option<bool>, frame: Option<u32>) {
    let port = machine.data_mut();
    if let Some(carrier) = carrier {
        port.carrier = carrier;
    }
    port.queue.extend(frame);
    machine.run_state();
    info!(state = ?machine.current_name(), "tick");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let graph = link()?;
    let root = graph.find("Link").ok_or("graph has no Link state")?;
    let config: MachineConfig = ConfigBuilder::new()
        .run_phase(RunPhasePolicy::Permit)
        .build();

    let mut machine = Machine::with_config(&graph, Port::default(), config);
    machine.set_initial(root);
    tick(&mut machine, Some(true), None);
    tick(&mut machine, None, Some(1));
    tick(&mut machine, None, Some(2));
    tick(&mut machine, None, None);

    let checkpoint = machine.checkpoint().ok_or("machine was never started")?;
    let json = checkpoint.to_json()?;
    println!("checkpoint:\n{json}");

    // The user data travels separately from the checkpoint.
    let port = machine.into_data();
    let restored = Checkpoint::from_json(&json)?;
    let mut machine = Machine::resume(&graph, port, config, &restored)?;
    tick(&mut machine, None, Some(3));
    tick(&mut machine, None, None);
    tick(&mut machine, Some(false), Some(4));
    tick(&mut machine, None, None);

    println!(
        "final state {:?}, frames sent {:?}, still queued {:?}",
        machine.current_name(),
        machine.data().sent,
        machine.data().queue
    );
    Ok(())
}
