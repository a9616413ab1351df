//! Hierarchy aggregation over an outline.
//!
//! Answers "does this node or anything under it match the current search"
//! and "how many counterparts does this provision have", and holds the
//! expand/collapse state of an outline tree view.

use std::collections::HashSet;

use crate::index::{AlignmentIndex, TierAdjacency};
use crate::model::OutlineNode;
use crate::side::Side;

/// Ids matched by the current search term.
///
/// `None` (no active search) and an empty set are different: the first
/// shows everything, the second shows nothing.
pub type ResultSet = HashSet<String>;

/// True when `node`, any descendant part, or any held provision is in
/// `results`. With no active search every node matches.
pub fn matches_or_descends(node: &OutlineNode, results: Option<&ResultSet>) -> bool {
    let Some(results) = results else {
        return true;
    };
    if results.contains(&node.id) {
        return true;
    }
    if let Some(parts) = &node.parts {
        return parts.iter().any(|part| matches_or_descends(part, Some(results)));
    }
    if let Some(provisions) = &node.provisions {
        return provisions.iter().any(|p| results.contains(&p.id));
    }
    false
}

/// Size of the counterpart set for `provision_id` in one tier's map for `side`.
pub fn counterpart_count(provision_id: &str, tier_index: &TierAdjacency, side: Side) -> usize {
    tier_index
        .counterparts(side, provision_id)
        .map_or(0, |set| set.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A chapter or part.
    Node,
    Provision,
}

/// One visible line of a rendered outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub depth: usize,
    pub id: &'a str,
    pub title: &'a str,
    pub kind: RowKind,
    /// Whether the node has children and is currently open.
    pub expanded: bool,
    pub has_children: bool,
    /// Counterpart counts in `low, medium, high` order (provisions only).
    pub counts: Option<[usize; 3]>,
}

/// Expand/collapse state for one outline.
///
/// Nodes start collapsed. An active search forces open exactly the nodes
/// that match or have a matching descendant; clearing the search collapses
/// everything. Manual toggles apply on top of whatever the search set.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    term: String,
    expanded: HashSet<String>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a new search term and its result set.
    pub fn set_search(&mut self, term: &str, results: Option<&ResultSet>, outline: &[OutlineNode]) {
        self.expanded.clear();
        self.term = term.trim().to_string();
        if self.term.is_empty() {
            return;
        }
        for node in outline {
            self.expand_matching(node, results);
        }
    }

    fn expand_matching(&mut self, node: &OutlineNode, results: Option<&ResultSet>) {
        if node.has_children() && matches_or_descends(node, results) {
            self.expanded.insert(node.id.clone());
        }
        for part in node.children() {
            self.expand_matching(part, results);
        }
    }

    /// The active search term; empty when no search is applied.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn expand_all(&mut self, outline: &[OutlineNode]) {
        for node in outline {
            if node.has_children() {
                self.expanded.insert(node.id.clone());
            }
            self.expand_all(node.children());
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flatten the visible part of the outline into display rows.
    ///
    /// Nodes that fail [`matches_or_descends`] are hidden along with their
    /// subtree. Provisions of an open node are all shown.
    pub fn rows<'a>(
        &self,
        outline: &'a [OutlineNode],
        results: Option<&ResultSet>,
        index: &AlignmentIndex,
        side: Side,
    ) -> Vec<Row<'a>> {
        let mut rows = Vec::new();
        for node in outline {
            self.push_rows(node, 0, results, index, side, &mut rows);
        }
        rows
    }

    fn push_rows<'a>(
        &self,
        node: &'a OutlineNode,
        depth: usize,
        results: Option<&ResultSet>,
        index: &AlignmentIndex,
        side: Side,
        rows: &mut Vec<Row<'a>>,
    ) {
        if !matches_or_descends(node, results) {
            return;
        }
        let has_children = node.has_children();
        let expanded = has_children && self.is_expanded(&node.id);
        rows.push(Row {
            depth,
            id: &node.id,
            title: &node.title,
            kind: RowKind::Node,
            expanded,
            has_children,
            counts: None,
        });
        if !expanded {
            return;
        }
        for part in node.children() {
            self.push_rows(part, depth + 1, results, index, side, rows);
        }
        for prov in node.leaf_provisions() {
            rows.push(Row {
                depth: depth + 1,
                id: &prov.id,
                title: &prov.title,
                kind: RowKind::Provision,
                expanded: false,
                has_children: false,
                counts: Some(index.counts(side, &prov.id)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimilarityPair;
    use crate::outline::fixtures::*;
    use crate::outline::find_node;
    use crate::side::SideConventions;
    use crate::tier::Tier;

    fn results(ids: &[&str]) -> ResultSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn all_nodes(outline: &[OutlineNode]) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        for node in outline {
            out.push(node);
            out.extend(all_nodes(node.children()));
        }
        out
    }

    #[test]
    fn no_search_matches_everything() {
        let outline = nsw_outline();
        for node in all_nodes(&outline) {
            assert!(matches_or_descends(node, None), "{}", node.id);
        }
    }

    #[test]
    fn empty_result_set_matches_nothing() {
        let outline = nsw_outline();
        let empty = ResultSet::new();
        for node in all_nodes(&outline) {
            assert!(!matches_or_descends(node, Some(&empty)), "{}", node.id);
        }
    }

    #[test]
    fn leaf_match_propagates_to_every_ancestor() {
        let outline = nsw_outline();
        let hits = results(&["4_NSW"]);
        for id in ["C2", "D1", "P2"] {
            let node = find_node(&outline, id).unwrap();
            assert!(matches_or_descends(node, Some(&hits)), "{id}");
        }
        for id in ["C1", "P1", "P3"] {
            let node = find_node(&outline, id).unwrap();
            assert!(!matches_or_descends(node, Some(&hits)), "{id}");
        }
    }

    #[test]
    fn node_id_match_counts() {
        let outline = nsw_outline();
        let hits = results(&["P3"]);
        assert!(matches_or_descends(&outline[1], Some(&hits)));
        assert!(!matches_or_descends(&outline[0], Some(&hits)));
    }

    #[test]
    fn counterpart_count_reads_tier_map() {
        let sides = SideConventions::default();
        let pairs = vec![SimilarityPair {
            id_1: "4_NSW".into(),
            id_2: "4_Victoria".into(),
            similarity: 0.9,
        }];
        let index = AlignmentIndex::build(&pairs, &nsw_outline(), &vic_outline(), &sides);
        assert_eq!(counterpart_count("4_NSW", index.tier(Tier::High), Side::A), 1);
        assert_eq!(counterpart_count("4_NSW", index.tier(Tier::Low), Side::A), 0);
        assert_eq!(counterpart_count("missing", index.tier(Tier::High), Side::A), 0);
    }

    #[test]
    fn search_expands_matching_path_and_clear_collapses() {
        let outline = nsw_outline();
        let hits = results(&["4_NSW"]);
        let mut view = TreeView::new();

        view.set_search("consult", Some(&hits), &outline);
        assert!(view.is_expanded("C2"));
        assert!(view.is_expanded("D1"));
        assert!(view.is_expanded("P2"));
        assert!(!view.is_expanded("C1"));

        assert_eq!(view.term(), "consult");

        view.set_search("", None, &outline);
        assert_eq!(view.term(), "");
        for id in ["C1", "C2", "D1", "P1", "P2"] {
            assert!(!view.is_expanded(id), "{id}");
        }
    }

    #[test]
    fn active_term_without_results_opens_everything() {
        let outline = nsw_outline();
        let mut view = TreeView::new();
        view.set_search("x", None, &outline);
        for id in ["C1", "C2", "D1", "P1", "P2"] {
            assert!(view.is_expanded(id), "{id}");
        }
        // Nothing to show under an empty leaf holder.
        assert!(!view.is_expanded("P3"));
    }

    #[test]
    fn manual_toggle_is_independent_of_search() {
        let outline = nsw_outline();
        let mut view = TreeView::new();
        view.toggle("C1");
        assert!(view.is_expanded("C1"));
        view.toggle("C1");
        assert!(!view.is_expanded("C1"));

        let hits = results(&["4_NSW"]);
        view.set_search("consult", Some(&hits), &outline);
        view.toggle("D1");
        assert!(!view.is_expanded("D1"));
        assert!(view.is_expanded("C2"));
    }

    #[test]
    fn rows_hide_non_matching_nodes_and_carry_counts() {
        let sides = SideConventions::default();
        let outline = nsw_outline();
        let pairs = vec![
            SimilarityPair {
                id_1: "4_NSW".into(),
                id_2: "4_Victoria".into(),
                similarity: 0.9,
            },
            SimilarityPair {
                id_1: "4_NSW".into(),
                id_2: "5_Victoria".into(),
                similarity: 0.7,
            },
        ];
        let index = AlignmentIndex::build(&pairs, &outline, &vic_outline(), &sides);
        let hits = results(&["4_NSW"]);
        let mut view = TreeView::new();
        view.set_search("consult", Some(&hits), &outline);

        let rows = view.rows(&outline, Some(&hits), &index, Side::A);
        let ids: Vec<&str> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["C2", "D1", "P2", "4_NSW"]);

        let leaf = rows.last().unwrap();
        assert_eq!(leaf.kind, RowKind::Provision);
        assert_eq!(leaf.depth, 3);
        assert_eq!(leaf.counts, Some([1, 0, 1]));
    }

    #[test]
    fn collapsed_rows_show_only_chapters() {
        let sides = SideConventions::default();
        let outline = nsw_outline();
        let index = AlignmentIndex::build(&[], &outline, &[], &sides);
        let view = TreeView::new();
        let rows = view.rows(&outline, None, &index, Side::A);
        let ids: Vec<&str> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        assert!(rows.iter().all(|r| !r.expanded && r.has_children));
    }

    #[test]
    fn expand_all_shows_every_provision_with_zero_counts() {
        let sides = SideConventions::default();
        let outline = nsw_outline();
        let index = AlignmentIndex::build(&[], &outline, &[], &sides);
        let mut view = TreeView::new();
        view.expand_all(&outline);
        let rows = view.rows(&outline, None, &index, Side::A);
        let provisions: Vec<&Row> = rows
            .iter()
            .filter(|r| r.kind == RowKind::Provision)
            .collect();
        assert_eq!(provisions.len(), 3);
        assert!(provisions.iter().all(|r| r.counts == Some([0, 0, 0])));
    }
}
