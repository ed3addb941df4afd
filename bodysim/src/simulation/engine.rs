//! The simulation run loop
//!
//! `Engine` owns the world and every run parameter. `run` performs all the
//! physics steps on the calling thread and samples a snapshot every `stride`
//! steps for the render dispatcher. It returns only after the dispatcher has
//! drained.

use std::time::Instant;

use tracing::{debug, info};

use super::integrator::{Integrator, StepStats};
use super::params::RunParameters;
use super::states::World;
use crate::error::{Error, Result};
use crate::visualization::dispatch::{RenderDispatcher, RenderReport};

/// Totals for one finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub steps: usize,        // physics steps executed
    pub collisions: usize,   // body-body contacts resolved
    pub wall_hits: usize,    // body-edge contacts resolved
    pub render: RenderReport,
    pub elapsed_secs: f64,   // wall-clock time including the render drain
}

pub struct Engine {
    pub world: World,
    pub integrator: Integrator,
    pub run: RunParameters,
    step: usize, // next step index
}

impl Engine {
    /// Check `run` against `world` and bind the integrator to it
    ///
    /// The step size and reference body always come from `run`; whatever the
    /// integrator carried before is overwritten.
    pub fn new(world: World, mut integrator: Integrator, run: RunParameters) -> Result<Self> {
        run.validate()?;
        if world.is_empty() {
            return Err(Error::config("world has no bodies"));
        }
        if let Some(c) = run.center {
            if c >= world.len() {
                return Err(Error::config(format!(
                    "reference body {c} out of range for {} bodies",
                    world.len()
                )));
            }
        }

        integrator.dt = run.dt();
        integrator.center = run.center;
        Ok(Self {
            world,
            integrator,
            run,
            step: 0,
        })
    }

    /// Index of the next step to run
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Whether step `i` produces a frame
    pub fn is_sampled(&self, i: usize) -> bool {
        i % self.run.stride() == 0
    }

    /// Advance one step without sampling
    pub fn step(&mut self) -> StepStats {
        let stats = self.integrator.step(&mut self.world);
        self.step += 1;
        stats
    }

    /// Run every remaining step, dispatching sampled frames, then wait for the renderers
    pub fn run(&mut self, mut dispatcher: RenderDispatcher) -> RunSummary {
        let total = self.run.steps();
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut last_pct = None;

        info!(
            bodies = self.world.len(),
            steps = total,
            stride = self.run.stride(),
            workers = dispatcher.workers(),
            "simulation started"
        );

        while self.step < total {
            let i = self.step;
            let stats = self.step();
            summary.steps += 1;
            summary.collisions += stats.collisions;
            summary.wall_hits += stats.wall_hits;

            // Recentering already ran inside the step, so the copy sees it
            if self.is_sampled(i) {
                dispatcher.submit(self.world.snapshot(i));
            }

            let pct = i as f64 / total as f64 * 100.0;
            debug!(step = i, percent = pct, "step done");
            let whole = pct as u32;
            if last_pct != Some(whole) {
                info!(percent = whole, in_flight = dispatcher.in_flight(), "simulating");
                last_pct = Some(whole);
            }
        }

        info!(steps = summary.steps, "physics done, waiting for renderers");
        summary.render = dispatcher.finish();
        summary.elapsed_secs = started.elapsed().as_secs_f64();

        info!(
            steps = summary.steps,
            collisions = summary.collisions,
            wall_hits = summary.wall_hits,
            rendered = summary.render.rendered,
            failed = summary.render.failed.len(),
            elapsed_secs = summary.elapsed_secs,
            "simulation finished"
        );
        summary
    }
}
