//! What happened during a single generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use organ_graph::OrganId;

/// Outcome of one call to [`crate::GrowthEngine::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Organs visited, in the pre-order snapshot taken at the start of the step.
    pub visited: Vec<OrganId>,

    /// Organs created during the step, in creation order.
    pub spawned: Vec<OrganId>,

    /// Pre-existing organs whose kind or size changed.
    pub changed: BTreeSet<OrganId>,

    /// Organs skipped because no rule exists for their kind.
    pub unrecognized: Vec<OrganId>,
}

impl StepReport {
    pub fn new(visited: Vec<OrganId>) -> Self {
        Self {
            visited,
            ..Self::default()
        }
    }

    /// True when the step left the graph exactly as it found it.
    pub fn is_quiescent(&self) -> bool {
        self.spawned.is_empty() && self.changed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiescence() {
        let mut report = StepReport::new(vec![OrganId(0)]);
        assert!(report.is_quiescent());

        report.unrecognized.push(OrganId(0));
        assert!(report.is_quiescent());

        report.changed.insert(OrganId(0));
        assert!(!report.is_quiescent());
    }
}
