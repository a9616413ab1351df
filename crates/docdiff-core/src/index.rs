//! Tier bucketing: the cross-document alignment index.
//!
//! Built once per bootstrap from the flat pair list and both outlines, then
//! treated as immutable. For each tier and each side the index maps a
//! provision id to the set of counterpart ids on the other side.
//!
//! Every provision present in a side's outline has an entry in every tier,
//! possibly empty, so lookups for known provisions never miss.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::model::{OutlineNode, SimilarityPair};
use crate::normalize::{Rejection, normalize};
use crate::outline::all_provision_ids;
use crate::side::{Side, SideConventions};
use crate::tier::Tier;

/// Provision id → counterpart ids on the opposite side.
pub type Adjacency = HashMap<String, BTreeSet<String>>;

/// Both sides' adjacency maps for one tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierAdjacency {
    a: Adjacency,
    b: Adjacency,
}

impl TierAdjacency {
    pub fn side(&self, side: Side) -> &Adjacency {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Adjacency {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn counterparts(&self, side: Side, id: &str) -> Option<&BTreeSet<String>> {
        self.side(side).get(id)
    }

    fn link(&mut self, side: Side, id: &str, counterpart: &str) {
        self.side_mut(side)
            .entry(id.to_string())
            .or_default()
            .insert(counterpart.to_string());
    }
}

/// Counts from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub records: usize,
    pub kept: usize,
    pub unknown_tier: usize,
    pub unclassified: usize,
    pub same_side: usize,
}

/// Per-tier, per-side adjacency over both documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentIndex {
    tiers: [TierAdjacency; 3],
}

impl AlignmentIndex {
    /// Build the index. Never fails: unusable records are dropped.
    pub fn build(
        pairs: &[SimilarityPair],
        outline_a: &[OutlineNode],
        outline_b: &[OutlineNode],
        sides: &SideConventions,
    ) -> Self {
        Self::build_with_summary(pairs, outline_a, outline_b, sides).0
    }

    /// Build the index and report how many records were kept or dropped.
    pub fn build_with_summary(
        pairs: &[SimilarityPair],
        outline_a: &[OutlineNode],
        outline_b: &[OutlineNode],
        sides: &SideConventions,
    ) -> (Self, BuildSummary) {
        let mut index = Self::default();
        let mut summary = BuildSummary {
            records: pairs.len(),
            ..Default::default()
        };

        for record in pairs {
            match normalize(record, sides) {
                Ok(pair) => {
                    let tier = &mut index.tiers[pair.tier.index()];
                    tier.link(Side::A, &pair.a, &pair.b);
                    tier.link(Side::B, &pair.b, &pair.a);
                    summary.kept += 1;
                }
                Err(reason) => {
                    debug!(
                        id_1 = %record.id_1,
                        id_2 = %record.id_2,
                        similarity = record.similarity,
                        ?reason,
                        "dropping pair record"
                    );
                    match reason {
                        Rejection::UnknownTier => summary.unknown_tier += 1,
                        Rejection::UnclassifiedMember => summary.unclassified += 1,
                        Rejection::SameSide => summary.same_side += 1,
                    }
                }
            }
        }

        // Closure: every outline provision gets an entry in every tier.
        let ids_a = all_provision_ids(outline_a);
        let ids_b = all_provision_ids(outline_b);
        for tier in &mut index.tiers {
            for &id in &ids_a {
                tier.a.entry(id.to_string()).or_default();
            }
            for &id in &ids_b {
                tier.b.entry(id.to_string()).or_default();
            }
        }

        info!(
            records = summary.records,
            kept = summary.kept,
            unknown_tier = summary.unknown_tier,
            unclassified = summary.unclassified,
            same_side = summary.same_side,
            "built alignment index"
        );
        (index, summary)
    }

    pub fn tier(&self, tier: Tier) -> &TierAdjacency {
        &self.tiers[tier.index()]
    }

    pub fn counterparts(&self, tier: Tier, side: Side, id: &str) -> Option<&BTreeSet<String>> {
        self.tier(tier).counterparts(side, id)
    }

    /// Number of counterparts at `tier`; 0 for ids not in the index.
    pub fn counterpart_count(&self, tier: Tier, side: Side, id: &str) -> usize {
        self.counterparts(tier, side, id).map_or(0, BTreeSet::len)
    }

    /// Counts for all tiers, in `low, medium, high` order.
    pub fn counts(&self, side: Side, id: &str) -> [usize; 3] {
        Tier::ALL.map(|tier| self.counterpart_count(tier, side, id))
    }

    /// The highest tier at which `id` has any counterpart.
    pub fn preferred_tier(&self, side: Side, id: &str) -> Option<Tier> {
        Tier::PREFERENCE
            .into_iter()
            .find(|&tier| self.counterpart_count(tier, side, id) > 0)
    }
}
