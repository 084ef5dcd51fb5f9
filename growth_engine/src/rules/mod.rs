//! Production rule constants and their TOML configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};
use organ_graph::DEFAULT_SEED_SIZE;

/// Constants driving every production rule.
///
/// Thresholds are strict for branching (`size > threshold`) and inclusive
/// for feeding (`size >= threshold`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Size a seed spends when it germinates.
    pub germination_cost: u32,

    /// Angle of the first stem.
    pub stem_angle: i32,

    /// Angle of the first taproot.
    pub taproot_angle: i32,

    /// Minimum size a germinated seed needs to feed its children.
    pub feed_threshold: u32,

    /// Size a germinated seed spends per feeding.
    pub feed_cost: u32,

    /// Size each child gains per feeding.
    pub feed_amount: u32,

    /// A stem tip branches once its size exceeds this.
    pub stem_branch_threshold: u32,

    pub stem_branch_cost: u32,

    /// Degrees each new stem turns away from its parent, one each way.
    pub stem_spread: i32,

    /// A taproot tip branches once its size exceeds this.
    pub taproot_branch_threshold: u32,

    pub taproot_branch_cost: u32,

    /// Degrees both side roots turn away from their taproot.
    pub side_root_offset: i32,

    /// Size of every newly spawned organ.
    pub sprout_size: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            germination_cost: 2,
            stem_angle: 0,
            taproot_angle: 180,
            feed_threshold: 2,
            feed_cost: 2,
            feed_amount: 1,
            stem_branch_threshold: 2,
            stem_branch_cost: 2,
            stem_spread: 30,
            taproot_branch_threshold: 3,
            taproot_branch_cost: 3,
            side_root_offset: 45,
            sprout_size: 1,
        }
    }
}

impl RuleSet {
    /// Parse a rule set from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let rules: RuleSet = toml::from_str(source)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Read a rule set from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Check that no guarded rule can spend more than its guard proves is there.
    pub fn validate(&self) -> Result<()> {
        if self.feed_cost > self.feed_threshold {
            return Err(ConfigError::invalid_rule(format!(
                "feed_cost {} exceeds feed_threshold {}",
                self.feed_cost, self.feed_threshold
            )));
        }
        if u64::from(self.stem_branch_cost) > u64::from(self.stem_branch_threshold) + 1 {
            return Err(ConfigError::invalid_rule(format!(
                "stem_branch_cost {} exceeds stem_branch_threshold {} + 1",
                self.stem_branch_cost, self.stem_branch_threshold
            )));
        }
        if u64::from(self.taproot_branch_cost) > u64::from(self.taproot_branch_threshold) + 1 {
            return Err(ConfigError::invalid_rule(format!(
                "taproot_branch_cost {} exceeds taproot_branch_threshold {} + 1",
                self.taproot_branch_cost, self.taproot_branch_threshold
            )));
        }
        Ok(())
    }
}

/// Everything needed to start a simulation: the seed and the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub seed_size: u32,
    pub rules: RuleSet,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            seed_size: DEFAULT_SEED_SIZE,
            rules: RuleSet::default(),
        }
    }
}

impl GrowthConfig {
    /// Parse a config from TOML, with the rules under a `[rules]` table.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: GrowthConfig = toml::from_str(source)?;
        config.rules.validate()?;
        Ok(config)
    }

    /// Read a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
