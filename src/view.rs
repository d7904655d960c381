//! What the presentation shell renders.
//!
//! The shell reads a [`TourView`] after every host event and wires its
//! "next", "back" and "skip" controls to the controller's methods of the
//! same names.

use serde::Serialize;

use crate::controller::Phase;
use crate::model::{PageKey, StepDescriptor, TourMode};

/// A read-only view of the tour for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourView<'a> {
    pub phase: Phase,
    pub running: bool,
    pub page: PageKey,
    pub mode: TourMode,
    pub step_index: usize,
    pub step_count: usize,
    pub is_last_step: bool,
    pub step: Option<&'a StepDescriptor>,
}

impl<'a> TourView<'a> {
    pub(crate) fn new(
        phase: Phase,
        page: PageKey,
        mode: TourMode,
        steps: &'a [StepDescriptor],
        step_index: usize,
    ) -> Self {
        let running = phase == Phase::Active && !steps.is_empty();
        let step = if running { steps.get(step_index) } else { None };
        Self {
            phase,
            running,
            page,
            mode,
            step_index,
            step_count: steps.len(),
            is_last_step: running && step_index + 1 == steps.len(),
            step,
        }
    }

    /// "2 of 4", for the overlay's progress label.
    pub fn progress_label(&self) -> Option<String> {
        self.running
            .then(|| format!("{} of {}", self.step_index + 1, self.step_count))
    }
}
