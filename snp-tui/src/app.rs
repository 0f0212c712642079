// Application state for the TUI: a circular firing raster plus cached per-neuron
// state lines that are rebuilt only for neurons the change log touched.

use snp_core::ChangeOp;
use tracing::{debug, warn};

use crate::backend::{SnpBackend, StepFailure};

pub struct App<B: SnpBackend> {
    pub backend: B,
    pub width: usize,           // number of columns (time window)
    pub raster: Vec<Vec<char>>, // [neuron][col]
    pub lines: Vec<String>,     // [neuron] state panel text
    pub running: bool,
    pub message: Option<String>,
    /// State lines rebuilt on the last update (for the status panel).
    pub redrawn: usize,
}

impl<B: SnpBackend> App<B> {
    pub fn new(backend: B, width: usize) -> Self {
        let n = backend.neurons();
        let mut app = Self {
            backend,
            width: width.max(1),
            raster: vec![vec![' '; width.max(1)]; n],
            lines: vec![String::new(); n],
            running: false,
            message: None,
            redrawn: 0,
        };
        app.rebuild_all_lines();
        app
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    fn column(&self, time: u64) -> usize {
        (time as usize) % self.width
    }

    fn state_line(&self, neuron: usize) -> String {
        let s = self.backend.state();
        format!(
            "{:<6} spikes {:>4}  delay {:>2}  {}{}",
            self.backend.label(neuron),
            s.configuration[neuron],
            s.delay_status[neuron],
            if s.firing[neuron] { "fired" } else { "     " },
            if s.delay_status[neuron] > 0 { "  (closed)" } else { "" }
        )
    }

    fn rebuild_all_lines(&mut self) {
        for i in 0..self.lines.len() {
            self.lines[i] = self.state_line(i);
        }
        self.redrawn = self.lines.len();
    }

    fn report(&mut self, failure: StepFailure) {
        match &failure {
            StepFailure::Boundary(msg) => {
                debug!(%msg, "step boundary");
                self.running = false;
                self.message = Some(msg.clone());
            }
            StepFailure::Fault(msg) => {
                warn!(%msg, "step failed");
                self.running = false;
                self.message = Some(format!("error: {}", msg));
            }
        }
    }

    /// Advance simulation by one step and update the raster for the new column.
    pub fn step(&mut self) {
        let outcome = match self.backend.step() {
            Ok(o) => o,
            Err(e) => return self.report(e.into()),
        };
        self.message = None;

        let col = self.column(self.backend.time());
        for (row, fired) in self.raster.iter_mut().zip(&outcome.fired) {
            row[col] = if *fired { '•' } else { ' ' };
        }

        // Only rebuild lines for neurons the step touched.
        let mut redrawn = 0;
        for neuron in outcome.changes.touched_neurons() {
            if neuron < self.lines.len() {
                self.lines[neuron] = self.state_line(neuron);
                redrawn += 1;
            }
        }
        self.redrawn = redrawn;
        let fired = outcome
            .changes
            .iter()
            .filter(|op| matches!(op, ChangeOp::Fired { .. }))
            .count();
        debug!(time = self.backend.time(), fired, redrawn, "ui step");
    }

    /// Undo the last step and blank its raster column.
    pub fn step_back(&mut self) {
        let col = self.column(self.backend.time());
        if let Err(e) = self.backend.step_back() {
            return self.report(e.into());
        }
        self.message = None;
        for row in self.raster.iter_mut() {
            row[col] = ' ';
        }
        self.rebuild_all_lines();
    }

    pub fn reset(&mut self) {
        self.backend.reset();
        self.running = false;
        self.message = None;
        for row in self.raster.iter_mut() {
            row.iter_mut().for_each(|c| *c = ' ');
        }
        self.rebuild_all_lines();
    }
}
