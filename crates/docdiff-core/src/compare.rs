//! Provision comparison: one bootstrap snapshot plus its alignment index.

use std::collections::HashMap;

use crate::annotate::{AnnotatedText, Category, normalize_markdown};
use crate::index::AlignmentIndex;
use crate::model::{ColouringRecord, ComparisonNote, OutlineNode, Provision, ProvisionSnapshot};
use crate::outline::find_provision;
use crate::search::{NucleoOracle, SearchIndex};
use crate::side::{Side, SideConventions};
use crate::tier::Tier;

pub const NO_TEXT: &str = "No text found";
pub const NO_COMPARISON: &str = "No comparison text available";

/// A counterpart provision as shown in the comparison list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart<'a> {
    pub id: &'a str,
    /// `None` when the id is not present in the opposite outline.
    pub provision: Option<&'a Provision>,
}

/// Read-only session state for the provision explorer.
pub struct Explorer {
    sides: SideConventions,
    outlines: [Vec<OutlineNode>; 2],
    index: AlignmentIndex,
    search: [SearchIndex<NucleoOracle>; 2],
    colouring: HashMap<String, ColouringRecord>,
    comparisons: Vec<ComparisonNote>,
}

impl Explorer {
    pub fn new(snapshot: ProvisionSnapshot, sides: SideConventions, tolerance: f64) -> Self {
        let index = AlignmentIndex::build(
            &snapshot.pairs,
            &snapshot.outline_a,
            &snapshot.outline_b,
            &sides,
        );
        let search = [
            SearchIndex::new(&snapshot.outline_a, NucleoOracle::new(tolerance)),
            SearchIndex::new(&snapshot.outline_b, NucleoOracle::new(tolerance)),
        ];
        let colouring = snapshot
            .colouring
            .into_iter()
            .map(|rec| (rec.id.clone(), rec))
            .collect();
        Self {
            sides,
            outlines: [snapshot.outline_a, snapshot.outline_b],
            index,
            search,
            colouring,
            comparisons: snapshot.comparisons,
        }
    }

    pub fn sides(&self) -> &SideConventions {
        &self.sides
    }

    pub fn outline(&self, side: Side) -> &[OutlineNode] {
        &self.outlines[side.index()]
    }

    pub fn index(&self) -> &AlignmentIndex {
        &self.index
    }

    pub fn search_index(&self, side: Side) -> &SearchIndex<NucleoOracle> {
        &self.search[side.index()]
    }

    /// Side of a provision id: by suffix, else by outline membership.
    pub fn side_of(&self, id: &str) -> Option<Side> {
        self.sides.classify(id).or_else(|| {
            Side::BOTH
                .into_iter()
                .find(|&side| find_provision(self.outline(side), id).is_some())
        })
    }

    pub fn provision(&self, side: Side, id: &str) -> Option<&Provision> {
        find_provision(self.outline(side), id)
    }

    /// Default tier for a provision: the highest with any counterpart, else high.
    pub fn default_tier(&self, side: Side, id: &str) -> Tier {
        self.index.preferred_tier(side, id).unwrap_or(Tier::High)
    }

    /// Counterparts of `id` at `tier`, resolved against the opposite outline.
    pub fn counterparts(&self, side: Side, id: &str, tier: Tier) -> Vec<Counterpart<'_>> {
        let other = self.outline(side.opposite());
        self.index
            .counterparts(tier, side, id)
            .into_iter()
            .flatten()
            .map(|cid| Counterpart {
                id: cid.as_str(),
                provision: find_provision(other, cid),
            })
            .collect()
    }

    pub fn colouring(&self, id: &str) -> Option<&ColouringRecord> {
        self.colouring.get(id)
    }

    /// Provision text for a highlight tab; `None` is the default tab.
    ///
    /// The default tab uses the first non-empty field with highlights
    /// stripped. A missing record yields the [`NO_TEXT`] placeholder.
    pub fn provision_text(&self, id: &str, tab: Option<Category>) -> AnnotatedText {
        let Some(rec) = self.colouring(id) else {
            return AnnotatedText::plain(NO_TEXT);
        };
        match tab {
            None => AnnotatedText::plain(&AnnotatedText::parse(rec.clean_source()).strip()),
            Some(category) => AnnotatedText::parse(rec.field(category).unwrap_or("")),
        }
    }

    /// Comparison note for an unordered pair of provision ids.
    pub fn comparison(&self, left: &str, right: &str) -> Option<&ComparisonNote> {
        self.comparisons
            .iter()
            .find(|note| note.covers(&self.sides.a, &self.sides.b, left, right))
    }

    /// Markdown comparison text for one tab, bold markers balanced.
    pub fn comparison_text(&self, left: &str, right: &str, tab: Category) -> String {
        let text = self
            .comparison(left, right)
            .and_then(|note| note.note(tab))
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_COMPARISON);
        normalize_markdown(text)
    }
}
