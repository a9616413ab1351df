//! Pair record normalisation: assign a tier and orient each record by side.

use crate::model::SimilarityPair;
use crate::side::{Side, SideConventions};
use crate::tier::Tier;

/// A similarity record oriented as (Side A id, Side B id) with its tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPair {
    pub tier: Tier,
    pub a: String,
    pub b: String,
}

impl NormalizedPair {
    pub fn id(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// Why a record was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The similarity does not round to 0.7, 0.8, or 0.9.
    UnknownTier,
    /// A member carries neither side suffix.
    UnclassifiedMember,
    /// Both members belong to the same side.
    SameSide,
}

/// Classify one raw record.
pub fn normalize(
    record: &SimilarityPair,
    sides: &SideConventions,
) -> Result<NormalizedPair, Rejection> {
    let tier = Tier::from_similarity(record.similarity).ok_or(Rejection::UnknownTier)?;
    let first = sides
        .classify(&record.id_1)
        .ok_or(Rejection::UnclassifiedMember)?;
    let second = sides
        .classify(&record.id_2)
        .ok_or(Rejection::UnclassifiedMember)?;

    let (a, b) = match (first, second) {
        (Side::A, Side::B) => (&record.id_1, &record.id_2),
        (Side::B, Side::A) => (&record.id_2, &record.id_1),
        _ => return Err(Rejection::SameSide),
    };

    Ok(NormalizedPair {
        tier,
        a: a.clone(),
        b: b.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id_1: &str, id_2: &str, similarity: f64) -> SimilarityPair {
        SimilarityPair {
            id_1: id_1.into(),
            id_2: id_2.into(),
            similarity,
        }
    }

    #[test]
    fn orients_a_then_b() {
        let sides = SideConventions::default();
        let forward = normalize(&pair("4_NSW", "4_Victoria", 0.9), &sides).unwrap();
        let reverse = normalize(&pair("4_Victoria", "4_NSW", 0.9), &sides).unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.id(Side::A), "4_NSW");
        assert_eq!(forward.id(Side::B), "4_Victoria");
        assert_eq!(forward.tier, Tier::High);
    }

    #[test]
    fn rejects_off_anchor_similarity() {
        let sides = SideConventions::default();
        assert_eq!(
            normalize(&pair("4_NSW", "4_Victoria", 0.55), &sides),
            Err(Rejection::UnknownTier)
        );
    }

    #[test]
    fn rejects_same_side() {
        let sides = SideConventions::default();
        assert_eq!(
            normalize(&pair("4_NSW", "5_NSW", 0.8), &sides),
            Err(Rejection::SameSide)
        );
    }

    #[test]
    fn rejects_unclassified_member() {
        let sides = SideConventions::default();
        assert_eq!(
            normalize(&pair("4_NSW", "4_QLD", 0.7), &sides),
            Err(Rejection::UnclassifiedMember)
        );
    }
}
