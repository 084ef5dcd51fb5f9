//! Organ definitions: the typed nodes a plant is built from.

use serde::{Deserialize, Serialize};

/// Identifier for an organ in a [`crate::GrowthGraph`].
///
/// Ids are handed out in creation order starting from 0 and are never
/// reused. Id 0 is always the seed the graph was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganId(pub u64);

impl OrganId {
    /// The seed every graph starts from.
    pub const ROOT: OrganId = OrganId(0);

    /// The id allocated right after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for OrganId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of organ a plant can grow.
///
/// Kinds are written by their lowercase name (`"seed"`, `"sideroot"`, ...).
/// A name outside the known set is kept as [`OrganKind::Unrecognized`] so a
/// foreign snapshot can still be loaded; the engine leaves such organs alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrganKind {
    /// Dormant seed, not yet sprouted.
    Seed,
    /// A sprouted seed feeding its first stem and root.
    Germinated,
    Stem,
    Taproot,
    /// Lateral root. Never grows further.
    SideRoot,
    Unrecognized(String),
}

impl OrganKind {
    /// The lowercase name used in snapshots and logs.
    pub fn as_str(&self) -> &str {
        match self {
            OrganKind::Seed => "seed",
            OrganKind::Germinated => "germinated",
            OrganKind::Stem => "stem",
            OrganKind::Taproot => "taproot",
            OrganKind::SideRoot => "sideroot",
            OrganKind::Unrecognized(name) => name,
        }
    }
}

impl From<String> for OrganKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "seed" => OrganKind::Seed,
            "germinated" => OrganKind::Germinated,
            "stem" => OrganKind::Stem,
            "taproot" => OrganKind::Taproot,
            "sideroot" => OrganKind::SideRoot,
            _ => OrganKind::Unrecognized(name),
        }
    }
}

impl From<OrganKind> for String {
    fn from(kind: OrganKind) -> Self {
        match kind {
            OrganKind::Unrecognized(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrganKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single organ in the growth graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganNode {
    pub id: OrganId,

    pub kind: OrganKind,

    /// Stored growth potential. Starts non-negative; only a seed that
    /// germinates with less than 2 can drop below zero.
    pub size: i64,

    /// Orientation in degrees, inherited from the parent at spawn time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<i32>,
}

impl OrganNode {
    /// Create a new organ record.
    pub fn new(id: OrganId, kind: OrganKind, size: u32, angle: Option<i32>) -> Self {
        Self {
            id,
            kind,
            size: i64::from(size),
            angle,
        }
    }

    /// Orientation in degrees, with seeds reading as 0.
    pub fn heading(&self) -> i32 {
        self.angle.unwrap_or(0)
    }
}
