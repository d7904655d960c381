//! Output formatting for CLI display.

use std::fmt::Write;

use tourguide::model::{Anchor, StepDescriptor};
use tourguide::persistence::ProgressSnapshot;

/// One line per step: index, anchor, placement, title.
pub(super) fn format_steps(steps: &[StepDescriptor]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let anchor = match step.anchor {
            Anchor::Centered => "(centered)".to_string(),
            Anchor::Candidates(_) => step.anchor.candidates().collect::<Vec<_>>().join(" | "),
        };
        let interactive = if step.allow_anchor_interaction {
            "  [interactive]"
        } else {
            ""
        };
        let placement = format!("{:?}", step.placement).to_lowercase();
        let _ = writeln!(
            out,
            "{:>2}. {}  <{anchor}> {placement}{interactive}",
            i + 1,
            step.title
        );
    }
    out
}

pub(super) fn format_progress(progress: Option<&ProgressSnapshot>) -> String {
    match progress {
        None => "none".to_string(),
        Some(p) => format!(
            "{} ({}, {} mode) step {} at {}",
            p.path,
            p.page,
            p.mode,
            p.step_index + 1,
            p.saved_at
        ),
    }
}
