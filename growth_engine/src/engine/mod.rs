//! Growth Engine - applies one generation of production rules to a graph.
//!
//! A step works like this:
//! 1. **Snapshot**: Take the pre-order id list of the graph once
//! 2. **Dispatch**: Visit every id in that list and run its kind's rule
//! 3. **Spawn**: Rules append new organs and edges; these wait for the next step
//!
//! Per-kind rules:
//! - **Seed**: Germinates, spending `germination_cost`, and sprouts a stem and a taproot
//! - **Germinated**: While it can afford `feed_cost`, feeds every direct child
//! - **Stem**: A tip above its threshold splits into two stems, one each side
//! - **Taproot**: A tip above its threshold sprouts a taproot and two side roots
//! - **SideRoot**: Inert

mod report;

pub use report::*;

use tracing::{debug, info, warn};

use crate::rules::RuleSet;
use organ_graph::{GrowthGraph, OrganId, OrganKind, Result};

/// Applies the production rules of a [`RuleSet`] to growth graphs.
///
/// The engine keeps no state between steps; everything lives in the graph.
#[derive(Debug, Clone, Default)]
pub struct GrowthEngine {
    rules: RuleSet,
}

impl GrowthEngine {
    /// Create an engine with the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Create an engine with the default rules.
    pub fn with_defaults() -> Self {
        Self::new(RuleSet::default())
    }

    /// Advance the graph by one generation.
    ///
    /// On error the graph keeps whatever the rules applied before the failure.
    pub fn step(&self, graph: &mut GrowthGraph) -> Result<StepReport> {
        let mut report = StepReport::new(graph.preorder_ids());

        for id in report.visited.clone() {
            match graph.node(id)?.kind.clone() {
                OrganKind::Seed => self.germinate(graph, id, &mut report)?,
                OrganKind::Germinated => self.feed(graph, id, &mut report)?,
                OrganKind::Stem => self.branch_stem(graph, id, &mut report)?,
                OrganKind::Taproot => self.branch_taproot(graph, id, &mut report)?,
                OrganKind::SideRoot => {}
                OrganKind::Unrecognized(kind) => {
                    warn!(organ = %id, %kind, "no growth rule for organ kind");
                    report.unrecognized.push(id);
                }
            }
        }

        debug!(
            visited = report.visited.len(),
            spawned = report.spawned.len(),
            changed = report.changed.len(),
            "generation complete"
        );

        Ok(report)
    }

    /// Advance the graph by a fixed number of generations.
    pub fn run(&self, graph: &mut GrowthGraph, steps: usize) -> Result<Vec<StepReport>> {
        (0..steps).map(|_| self.step(graph)).collect()
    }

    /// Step until a generation changes nothing.
    ///
    /// Returns the number of generations that changed the graph, or `None`
    /// if it was still growing after `max_steps`.
    pub fn run_until_stable(
        &self,
        graph: &mut GrowthGraph,
        max_steps: usize,
    ) -> Result<Option<usize>> {
        for generation in 0..max_steps {
            if self.step(graph)?.is_quiescent() {
                info!(generations = generation, organs = graph.len(), "growth stabilized");
                return Ok(Some(generation));
            }
        }

        info!(max_steps, organs = graph.len(), "still growing after step limit");
        Ok(None)
    }

    fn germinate(
        &self,
        graph: &mut GrowthGraph,
        id: OrganId,
        report: &mut StepReport,
    ) -> Result<()> {
        let seed = graph.node_mut(id)?;
        seed.kind = OrganKind::Germinated;
        seed.size -= i64::from(self.rules.germination_cost);
        report.changed.insert(id);

        self.sprout(graph, id, OrganKind::Stem, self.rules.stem_angle, report)?;
        self.sprout(graph, id, OrganKind::Taproot, self.rules.taproot_angle, report)?;
        Ok(())
    }

    fn feed(&self, graph: &mut GrowthGraph, id: OrganId, report: &mut StepReport) -> Result<()> {
        if graph.node(id)?.size < i64::from(self.rules.feed_threshold) {
            return Ok(());
        }

        // A repeated edge still feeds its child once.
        let mut children = graph.successors(id)?.to_vec();
        children.sort();
        children.dedup();
        for child in children {
            graph.node_mut(child)?.size += i64::from(self.rules.feed_amount);
            report.changed.insert(child);
        }

        graph.node_mut(id)?.size -= i64::from(self.rules.feed_cost);
        report.changed.insert(id);
        Ok(())
    }

    fn branch_stem(
        &self,
        graph: &mut GrowthGraph,
        id: OrganId,
        report: &mut StepReport,
    ) -> Result<()> {
        let threshold = i64::from(self.rules.stem_branch_threshold);
        let cost = self.rules.stem_branch_cost;
        let Some(angle) = self.branch_tip(graph, id, threshold, cost, report)? else {
            return Ok(());
        };

        let spread = self.rules.stem_spread;
        self.sprout(graph, id, OrganKind::Stem, angle.wrapping_add(spread), report)?;
        self.sprout(graph, id, OrganKind::Stem, angle.wrapping_sub(spread), report)?;
        Ok(())
    }

    fn branch_taproot(
        &self,
        graph: &mut GrowthGraph,
        id: OrganId,
        report: &mut StepReport,
    ) -> Result<()> {
        let threshold = i64::from(self.rules.taproot_branch_threshold);
        let cost = self.rules.taproot_branch_cost;
        let Some(angle) = self.branch_tip(graph, id, threshold, cost, report)? else {
            return Ok(());
        };

        // Both side roots share the same heading.
        let side = angle.wrapping_sub(self.rules.side_root_offset);
        self.sprout(graph, id, OrganKind::Taproot, angle, report)?;
        self.sprout(graph, id, OrganKind::SideRoot, side, report)?;
        self.sprout(graph, id, OrganKind::SideRoot, side, report)?;
        Ok(())
    }

    /// Spend `cost` on a growth tip whose size exceeds `threshold`.
    ///
    /// Returns the tip's heading when it branches, `None` when it stays put.
    fn branch_tip(
        &self,
        graph: &mut GrowthGraph,
        id: OrganId,
        threshold: i64,
        cost: u32,
        report: &mut StepReport,
    ) -> Result<Option<i32>> {
        if graph.has_successors(id)? {
            return Ok(None);
        }

        let tip = graph.node_mut(id)?;
        if tip.size <= threshold {
            return Ok(None);
        }

        tip.size -= i64::from(cost);
        report.changed.insert(id);
        Ok(Some(tip.heading()))
    }

    fn sprout(
        &self,
        graph: &mut GrowthGraph,
        parent: OrganId,
        kind: OrganKind,
        angle: i32,
        report: &mut StepReport,
    ) -> Result<OrganId> {
        let child = graph.create_node(kind, self.rules.sprout_size, Some(angle));
        graph.create_edge(parent, child)?;
        report.spawned.push(child);
        Ok(child)
    }
}
