//! Similarity tiers.
//!
//! Pair scores arrive precomputed and are expected to sit on one of three
//! anchors: 0.7, 0.8, 0.9. A score is assigned to a tier by rounding it to
//! one decimal place; anything else has no tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Ascending order, matching the `low | medium | high` count columns.
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    /// Highest tier first, the order used when picking a default tier.
    pub const PREFERENCE: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    /// Map a similarity score to its tier.
    ///
    /// Rounds the exact decimal value to one place, so `0.85` (stored as
    /// 0.8499…) is medium and `0.95` is high. Non-finite scores have no tier.
    pub fn from_similarity(similarity: f64) -> Option<Tier> {
        if !similarity.is_finite() {
            return None;
        }
        match format!("{similarity:.1}").as_str() {
            "0.7" => Some(Tier::Low),
            "0.8" => Some(Tier::Medium),
            "0.9" => Some(Tier::High),
            _ => None,
        }
    }

    pub fn anchor(self) -> f64 {
        match self {
            Tier::Low => 0.7,
            Tier::Medium => 0.8,
            Tier::High => 0.9,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tier::Low => 0,
            Tier::Medium => 1,
            Tier::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "0.7" => Ok(Tier::Low),
            "medium" | "0.8" => Ok(Tier::Medium),
            "high" | "0.9" => Ok(Tier::High),
            other => Err(format!("unknown tier '{other}' (expected low, medium, or high)")),
        }
    }
}
