//! Side classification for the two documents being compared.
//!
//! Every provision id carries a side marker as a suffix (e.g. `4_NSW`,
//! `4_Victoria`). [`SideConventions::classify`] is the one place that reads
//! that marker; everything downstream works with [`Side`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two documents (jurisdictions, reports) under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Naming conventions for one side of a provision comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSpec {
    /// Display label; also the key used for this side in comparison notes.
    pub label: String,
    /// Route token used when fetching this side's outline (`/toc/{slug}`).
    pub slug: String,
    /// Id suffix that marks a provision as belonging to this side.
    pub suffix: String,
}

impl SideSpec {
    pub fn new(label: &str, slug: &str, suffix: &str) -> Self {
        Self {
            label: label.to_string(),
            slug: slug.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

/// The pair of [`SideSpec`]s for a provision comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideConventions {
    pub a: SideSpec,
    pub b: SideSpec,
}

impl Default for SideConventions {
    fn default() -> Self {
        Self {
            a: SideSpec::new("NSW", "nsw", "_NSW"),
            b: SideSpec::new("Victoria", "vic", "_Victoria"),
        }
    }
}

impl SideConventions {
    pub fn spec(&self, side: Side) -> &SideSpec {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Classify a provision id by its side suffix.
    ///
    /// When both suffixes match (one is a suffix of the other) the longer
    /// one wins. Returns `None` for ids carrying neither marker.
    pub fn classify(&self, id: &str) -> Option<Side> {
        let a = !self.a.suffix.is_empty() && id.ends_with(&self.a.suffix);
        let b = !self.b.suffix.is_empty() && id.ends_with(&self.b.suffix);
        match (a, b) {
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            (true, true) if self.a.suffix.len() > self.b.suffix.len() => Some(Side::A),
            (true, true) if self.b.suffix.len() > self.a.suffix.len() => Some(Side::B),
            _ => None,
        }
    }

    /// Resolve a user-supplied side token: `a`/`b`, a slug, or a label.
    pub fn parse_side(&self, token: &str) -> Option<Side> {
        let token = token.trim();
        Side::BOTH.into_iter().find(|&side| {
            let spec = self.spec(side);
            token.eq_ignore_ascii_case(side.as_str())
                || token.eq_ignore_ascii_case(&spec.slug)
                || token.eq_ignore_ascii_case(&spec.label)
        })
    }
}
