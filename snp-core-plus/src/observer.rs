//! Observer hooks for the simulator.
//!
//! - Trait StepObserver: called after every committed next/prev/reset.
//! - ChangeCounter: minimal observer that tallies steps and redraw work, mostly
//!   useful for tests and diagnostics.

use snp_core::{ChangeLog, StepReport, SystemState};

pub trait StepObserver {
    /// Called after a forward step; `time` is the new time.
    fn on_next(&mut self, _state: &SystemState, _time: u64, _report: &StepReport) {}

    /// Called after a backward step; `time` is the new time.
    fn on_prev(&mut self, _state: &SystemState, _time: u64) {}

    fn on_reset(&mut self, _state: &SystemState) {}
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeCounter {
    pub next: u64,
    pub prev: u64,
    pub resets: u64,
    /// Sum over forward steps of neurons that needed a redraw.
    pub touched: u64,
}

impl StepObserver for ChangeCounter {
    fn on_next(&mut self, _state: &SystemState, _time: u64, report: &StepReport) {
        self.next += 1;
        if let Some(changes) = &report.changes {
            self.touched += ChangeLog::from(changes).touched_neurons().count() as u64;
        }
    }

    fn on_prev(&mut self, _state: &SystemState, _time: u64) {
        self.prev += 1;
    }

    fn on_reset(&mut self, _state: &SystemState) {
        self.resets += 1;
    }
}

// Shared observers let the caller keep a handle to what it registered.
impl<T: StepObserver> StepObserver for std::rc::Rc<std::cell::RefCell<T>> {
    fn on_next(&mut self, state: &SystemState, time: u64, report: &StepReport) {
        self.borrow_mut().on_next(state, time, report);
    }

    fn on_prev(&mut self, state: &SystemState, time: u64) {
        self.borrow_mut().on_prev(state, time);
    }

    fn on_reset(&mut self, state: &SystemState) {
        self.borrow_mut().on_reset(state);
    }
}
