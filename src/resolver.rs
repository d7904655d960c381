//! Target resolution: does a step's anchor exist right now?

use tracing::{trace, warn};

use crate::environment::{AnchorId, Environment};
use crate::model::{Anchor, StepDescriptor};

/// Whether `anchor` resolves in `env`. Centered anchors always do.
pub fn exists(anchor: &Anchor, env: &dyn Environment) -> bool {
    match anchor {
        Anchor::Centered => true,
        Anchor::Candidates(spec) => any_candidate_exists(spec, env),
    }
}

/// Whether any comma-separated candidate in `spec` resolves.
///
/// Malformed candidates and failed lookups count as absent; this never
/// fails for any input.
pub fn any_candidate_exists(spec: &str, env: &dyn Environment) -> bool {
    spec.split(',')
        .map(str::trim)
        .any(|candidate| candidate_exists(candidate, env))
}

/// Whether at least one step in `steps` can be shown.
pub fn any_resolves(steps: &[StepDescriptor], env: &dyn Environment) -> bool {
    steps.iter().any(|step| exists(&step.anchor, env))
}

fn candidate_exists(raw: &str, env: &dyn Environment) -> bool {
    let Some(id) = AnchorId::parse(raw) else {
        trace!(candidate = raw, "ignoring malformed anchor");
        return false;
    };
    match env.contains(id) {
        Ok(found) => found,
        Err(e) => {
            warn!(anchor = raw, error = %e, "anchor lookup failed");
            false
        }
    }
}
