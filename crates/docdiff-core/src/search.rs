//! Fuzzy search overlay over a flattened outline.
//!
//! Text scoring is delegated to a [`FuzzyOracle`]; this module owns the
//! flattening and turns oracle hits into a [`ResultSet`] that the hierarchy
//! aggregator propagates to ancestors.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::hierarchy::ResultSet;
use crate::model::OutlineNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Chapter,
    Part,
    Provision,
}

/// One searchable outline item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub id: String,
    pub title: String,
    pub kind: EntryKind,
    /// The enclosing chapter or part (absent for chapters).
    pub parent_id: Option<String>,
}

/// Flatten an outline depth-first: each chapter, then its parts (recursively),
/// then the provisions they hold.
pub fn flatten(outline: &[OutlineNode]) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for chapter in outline {
        push_node(chapter, None, &mut entries);
    }
    entries
}

fn push_node(node: &OutlineNode, parent: Option<&str>, entries: &mut Vec<FlatEntry>) {
    entries.push(FlatEntry {
        id: node.id.clone(),
        title: node.title.clone(),
        kind: if parent.is_none() {
            EntryKind::Chapter
        } else {
            EntryKind::Part
        },
        parent_id: parent.map(str::to_string),
    });
    for part in node.children() {
        push_node(part, Some(&node.id), entries);
    }
    for prov in node.leaf_provisions() {
        entries.push(FlatEntry {
            id: prov.id.clone(),
            title: prov.title.clone(),
            kind: EntryKind::Provision,
            parent_id: Some(node.id.clone()),
        });
    }
}

/// External text matcher. Returns indices into `entries`, best first.
pub trait FuzzyOracle {
    fn matches(&self, term: &str, entries: &[FlatEntry]) -> Vec<usize>;
}

/// Fuzzy matcher over `id` and `title` backed by `nucleo-matcher`.
///
/// A case-insensitive substring of either field always matches, wherever it
/// occurs. Otherwise a fuzzy match is accepted when its score is within
/// `tolerance` (a fraction from 0.0 to 1.0) of the score the term earns against
/// itself.
#[derive(Debug, Clone, Copy)]
pub struct NucleoOracle {
    tolerance: f64,
}

impl NucleoOracle {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.clamp(0.0, 1.0),
        }
    }
}

impl Default for NucleoOracle {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl FuzzyOracle for NucleoOracle {
    fn matches(&self, term: &str, entries: &[FlatEntry]) -> Vec<usize> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let pattern = Pattern::new(
            term,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let perfect = pattern.score(Utf32Str::new(term, &mut buf), &mut matcher);
        let floor = perfect.map_or(0.0, |p| f64::from(p) * (1.0 - self.tolerance));
        let needle = term.to_lowercase();

        let mut scored: Vec<(u32, usize)> = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let best = [entry.id.as_str(), entry.title.as_str()]
                .into_iter()
                .filter_map(|field| {
                    if field.to_lowercase().contains(&needle) {
                        return Some(perfect.unwrap_or(u32::MAX));
                    }
                    pattern
                        .score(Utf32Str::new(field, &mut buf), &mut matcher)
                        .filter(|&score| f64::from(score) >= floor)
                })
                .max();
            if let Some(score) = best {
                scored.push((score, i));
            }
        }
        // Stable: ties keep outline order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, i)| i).collect()
    }
}

/// Run a search. An empty term means "no active filter" and yields `None`.
pub fn search(term: &str, entries: &[FlatEntry], oracle: &dyn FuzzyOracle) -> Option<ResultSet> {
    if term.trim().is_empty() {
        return None;
    }
    Some(
        oracle
            .matches(term, entries)
            .into_iter()
            .filter_map(|i| entries.get(i))
            .map(|entry| entry.id.clone())
            .collect(),
    )
}

/// A flattened outline paired with its oracle, built once per outline.
pub struct SearchIndex<O = NucleoOracle> {
    entries: Vec<FlatEntry>,
    oracle: O,
}

impl<O: FuzzyOracle> SearchIndex<O> {
    pub fn new(outline: &[OutlineNode], oracle: O) -> Self {
        Self {
            entries: flatten(outline),
            oracle,
        }
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn search(&self, term: &str) -> Option<ResultSet> {
        search(term, &self.entries, &self.oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::matches_or_descends;
    use crate::outline::find_node;
    use crate::outline::fixtures::*;

    /// Matches entries whose title equals the term exactly.
    struct ExactTitle;

    impl FuzzyOracle for ExactTitle {
        fn matches(&self, term: &str, entries: &[FlatEntry]) -> Vec<usize> {
            entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.title == term)
                .map(|(i, _)| i)
                .collect()
        }
    }

    #[test]
    fn flatten_tags_kind_and_parent() {
        let entries = flatten(&nsw_outline());
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["C1", "P1", "1_NSW", "2_NSW", "C2", "D1", "P2", "4_NSW", "P3"]
        );
        assert_eq!(entries[0].kind, EntryKind::Chapter);
        assert_eq!(entries[0].parent_id, None);
        assert_eq!(entries[5].kind, EntryKind::Part);
        assert_eq!(entries[5].parent_id.as_deref(), Some("C2"));
        assert_eq!(entries[7].kind, EntryKind::Provision);
        assert_eq!(entries[7].parent_id.as_deref(), Some("P2"));
    }

    #[test]
    fn empty_term_is_no_filter() {
        let entries = flatten(&nsw_outline());
        assert_eq!(search("", &entries, &ExactTitle), None);
        assert_eq!(search("   ", &entries, &ExactTitle), None);
    }

    #[test]
    fn no_hits_is_an_empty_set_not_none() {
        let entries = flatten(&nsw_outline());
        assert_eq!(search("zzz", &entries, &ExactTitle), Some(ResultSet::new()));
    }

    #[test]
    fn hits_propagate_to_ancestors() {
        let outline = nsw_outline();
        let index = SearchIndex::new(&outline, ExactTitle);
        let hits = index.search("Duty to consult workers").unwrap();
        assert_eq!(hits.len(), 1);
        for id in ["C2", "D1", "P2"] {
            assert!(matches_or_descends(find_node(&outline, id).unwrap(), Some(&hits)));
        }
        assert!(!matches_or_descends(&outline[0], Some(&hits)));
    }

    #[test]
    fn nucleo_matches_substring_of_title_or_id() {
        let outline = nsw_outline();
        let index = SearchIndex::new(&outline, NucleoOracle::default());

        let hits = index.search("COMMENCEMENT").unwrap();
        assert!(hits.contains("2_NSW"));

        let hits = index.search("4_nsw").unwrap();
        assert!(hits.contains("4_NSW"));
    }

    #[test]
    fn nucleo_rejects_unrelated_terms() {
        let outline = nsw_outline();
        let index = SearchIndex::new(&outline, NucleoOracle::default());
        let hits = index.search("xylophone").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn gapped_match_is_scored_against_the_tolerance() {
        let outline = nsw_outline();
        // Letters of "Commencement" in order, never contiguous.
        let term = "cmmncmnt";

        let loose = SearchIndex::new(&outline, NucleoOracle::new(1.0));
        let hits = loose.search(term).unwrap();
        assert!(hits.contains("2_NSW"));
        assert!(hits.contains("P1"));

        let strict = SearchIndex::new(&outline, NucleoOracle::new(0.0));
        let hits = strict.search(term).unwrap();
        assert!(!hits.contains("2_NSW"));
        assert!(hits.is_empty());
    }

    #[test]
    fn tolerance_is_clamped() {
        assert_eq!(NucleoOracle::new(7.0).tolerance, 1.0);
        assert_eq!(NucleoOracle::new(-1.0).tolerance, 0.0);
    }
}
