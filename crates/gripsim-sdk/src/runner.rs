// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A fixed-rate driver for [`Simulation`].

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use gripsim_core::draw::{DrawCommand, DrawList};
use gripsim_core::input::InputEvent;

use crate::simulation::{Simulation, SimulationError};

/// Delivers the input events of a tick.
pub trait InputSource {
    /// Events that happened up to tick `tick`.
    fn poll(&mut self, tick: u64) -> Vec<InputEvent>;
}

/// Receives every drawn frame.
pub trait FrameSink {
    /// Called once per tick with the frame's draw commands.
    fn present(&mut self, tick: u64, frame: &[DrawCommand]);
}

impl<F: FnMut(u64, &[DrawCommand])> FrameSink for F {
    fn present(&mut self, tick: u64, frame: &[DrawCommand]) {
        self(tick, frame)
    }
}

/// Input replayed from a list of `(tick, event)` pairs.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    script: VecDeque<(u64, InputEvent)>,
}

impl ScriptedInput {
    /// Creates a script. Events are delivered in tick order, ties in list order.
    pub fn new(mut events: Vec<(u64, InputEvent)>) -> Self {
        events.sort_by_key(|(tick, _)| *tick);
        Self {
            script: events.into(),
        }
    }

    /// Returns `true` once every event has been delivered.
    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, tick: u64) -> Vec<InputEvent> {
        let mut due = Vec::new();
        while self.script.front().is_some_and(|(t, _)| *t <= tick) {
            if let Some((_, event)) = self.script.pop_front() {
                due.push(event);
            }
        }
        due
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// `true` if the simulation was stopped, `false` if the tick limit was hit.
    pub stopped: bool,
}

/// Runs a simulation at a fixed tick rate.
///
/// Simulated time advances by exactly one tick per iteration, so timers inside
/// the simulation behave the same whether or not the runner sleeps.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    tick: Duration,
    max_ticks: Option<u64>,
    realtime: bool,
}

impl Runner {
    /// A real-time runner at `fps` ticks per second.
    pub fn new(fps: u32) -> Self {
        Self {
            tick: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            max_ticks: None,
            realtime: true,
        }
    }

    /// Stops after `ticks` ticks.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Whether to sleep between ticks. Without it, ticks run back to back.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Runs until the simulation stops or the tick limit is reached.
    pub fn run(
        &self,
        sim: &mut Simulation,
        input: &mut dyn InputSource,
        sink: &mut dyn FrameSink,
    ) -> Result<RunSummary, SimulationError> {
        let start = Instant::now();
        let dt = self.tick.as_secs_f32();
        let mut frame = DrawList::new(sim.config().simulation.canvas_size());
        let mut tick = 0;

        while sim.is_running() && self.max_ticks.map_or(true, |max| tick < max) {
            let now = start + self.tick.mul_f64(tick as f64);
            if self.realtime {
                let wall = Instant::now();
                if now > wall {
                    thread::sleep(now - wall);
                }
            }

            for event in input.poll(tick) {
                sim.handle_event(event, now)?;
            }
            sim.update(now, dt)?;
            sim.draw(&mut frame, now)?;
            sink.present(tick, frame.commands());
            frame.take();
            tick += 1;
        }

        let summary = RunSummary {
            ticks: tick,
            stopped: !sim.is_running(),
        };
        log::info!("Run finished after {} ticks (stopped: {}).", summary.ticks, summary.stopped);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> InputEvent {
        InputEvent::KeyPressed { key: name.into() }
    }

    #[test]
    fn test_script_delivers_in_tick_order() {
        let mut input = ScriptedInput::new(vec![(3, key("b")), (1, key("a")), (3, key("c"))]);
        assert!(input.poll(0).is_empty());
        assert_eq!(input.poll(1), vec![key("a")]);
        assert!(input.poll(2).is_empty());
        assert_eq!(input.poll(5), vec![key("b"), key("c")]);
        assert!(input.is_exhausted());
    }

    #[test]
    fn test_tick_duration() {
        let runner = Runner::new(30);
        assert!((runner.tick_duration().as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
        assert_eq!(Runner::new(0).tick_duration(), Duration::from_secs(1));
    }
}
