//! Paragraph pair resolver for the climate view.
//!
//! Holds the current anchor selection and the pair list resolved for it.
//! Each selection bumps a generation counter; a lookup result is applied
//! only when its [`Ticket`] carries the latest generation, so an earlier
//! lookup finishing late can never overwrite a newer selection.

use docdiff_core::config::ClimateConfig;
use docdiff_core::{Paragraph, ParagraphPair, Side};
use tracing::{debug, warn};

use crate::climate::{ClimateSnapshot, MinimapMark, ParagraphColumn, Shade};
use crate::error::FetchError;
use crate::provider::DataProvider;

pub const NO_SIMILARITY: &str = "No comparison available.";

/// The selected paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub side: Side,
    pub para_id: String,
}

/// Handle for one outstanding lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    anchor: Anchor,
}

impl Ticket {
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }
}

/// What happened to a lookup result handed to [`PairResolver::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// A newer selection was made; the result was discarded.
    Stale,
    /// The lookup was cancelled; nothing changed.
    Aborted,
    /// The lookup failed; the match list was cleared.
    Failed,
}

/// A counterpart paragraph as listed under the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedParagraph {
    pub para_id: String,
    /// Paragraph text, or `(missing #id)` when the id is unknown.
    pub text: String,
    pub found: bool,
}

/// Detail view for one resolved pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDetail {
    /// Side A paragraph text.
    pub side_a: Option<String>,
    /// Side B paragraph text.
    pub side_b: Option<String>,
    pub similarity: Option<f64>,
    pub d_4: serde_json::Value,
}

impl PairDetail {
    pub fn similarity_label(&self) -> String {
        match self.similarity {
            Some(s) => format!("{s:.3}"),
            None => NO_SIMILARITY.to_string(),
        }
    }
}

fn missing(para_id: &str) -> String {
    format!("(missing #{para_id})")
}

pub struct PairResolver {
    columns: [ParagraphColumn; 2],
    page_size: u32,
    generation: u64,
    anchor: Option<Anchor>,
    pairs: Vec<ParagraphPair>,
    last_error: Option<String>,
}

impl PairResolver {
    pub fn new(snapshot: ClimateSnapshot, climate: &ClimateConfig) -> Self {
        let columns = [
            ParagraphColumn::new(
                Side::A,
                climate.document(Side::A),
                snapshot.paragraphs_a,
                &snapshot.counts_a,
            ),
            ParagraphColumn::new(
                Side::B,
                climate.document(Side::B),
                snapshot.paragraphs_b,
                &snapshot.counts_b,
            ),
        ];
        Self {
            columns,
            page_size: climate.page_size,
            generation: 0,
            anchor: None,
            pairs: Vec::new(),
            last_error: None,
        }
    }

    pub fn column(&self, side: Side) -> &ParagraphColumn {
        &self.columns[side.index()]
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn pairs(&self) -> &[ParagraphPair] {
        &self.pairs
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Select a new anchor and issue a ticket for its lookup.
    ///
    /// The previous pair list is dropped immediately so its matches are
    /// never shown against the new anchor.
    pub fn begin(&mut self, side: Side, para_id: &str) -> Ticket {
        self.generation += 1;
        let anchor = Anchor {
            side,
            para_id: para_id.to_string(),
        };
        self.anchor = Some(anchor.clone());
        self.pairs.clear();
        self.last_error = None;
        Ticket {
            generation: self.generation,
            anchor,
        }
    }

    /// Apply a lookup result if `ticket` is still current.
    pub fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<ParagraphPair>, FetchError>,
    ) -> Applied {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                para_id = %ticket.anchor.para_id,
                "discarding stale pair lookup"
            );
            return Applied::Stale;
        }
        match result {
            Ok(pairs) => {
                debug!(count = pairs.len(), para_id = %ticket.anchor.para_id, "pairs resolved");
                self.pairs = pairs;
                Applied::Updated
            }
            Err(e) if e.is_abort() => Applied::Aborted,
            Err(e) => {
                warn!(para_id = %ticket.anchor.para_id, error = %e, "pair lookup failed");
                self.pairs.clear();
                self.last_error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    /// Select an anchor and resolve its counterparts in one step.
    pub async fn select(
        &mut self,
        provider: &dyn DataProvider,
        side: Side,
        para_id: &str,
    ) -> Applied {
        let ticket = self.begin(side, para_id);
        let document = self.column(side).document().to_string();
        let result = provider
            .paragraph_pairs(&document, para_id, self.page_size)
            .await;
        self.apply(&ticket, result)
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.anchor = None;
        self.pairs.clear();
        self.last_error = None;
    }

    /// Whether paragraph `para_id` on `side` is lit: it is the anchor, or it
    /// is a counterpart of an anchor on the other side.
    pub fn is_highlighted(&self, side: Side, para_id: &str) -> bool {
        let Some(anchor) = &self.anchor else {
            return false;
        };
        if anchor.side == side {
            return anchor.para_id == para_id;
        }
        self.pairs.iter().any(|p| p.para_id(side) == para_id)
    }

    pub fn shade(&self, side: Side, para_id: &str) -> Option<Shade> {
        let anchor = self.anchor.as_ref()?;
        if anchor.side == side && anchor.para_id == para_id {
            Some(Shade::Anchor)
        } else if self.is_highlighted(side, para_id) {
            Some(Shade::Matched)
        } else {
            None
        }
    }

    pub fn minimap(&self, side: Side) -> Vec<MinimapMark> {
        self.column(side)
            .minimap(|p: &Paragraph| self.shade(side, &p.para_id))
    }

    /// Counterparts of the anchor, in pair-list order, resolved to the
    /// opposite document's text.
    pub fn matched(&self) -> Vec<MatchedParagraph> {
        let Some(anchor) = &self.anchor else {
            return Vec::new();
        };
        let other = anchor.side.opposite();
        let column = self.column(other);
        self.pairs
            .iter()
            .map(|pair| {
                let id = pair.para_id(other);
                match column.text(id) {
                    Some(text) => MatchedParagraph {
                        para_id: id.to_string(),
                        text: text.to_string(),
                        found: true,
                    },
                    None => MatchedParagraph {
                        para_id: id.to_string(),
                        text: missing(id),
                        found: false,
                    },
                }
            })
            .collect()
    }

    fn detail_of(&self, pair: &ParagraphPair) -> PairDetail {
        PairDetail {
            side_a: self.column(Side::A).text(pair.para_id(Side::A)).map(str::to_string),
            side_b: self.column(Side::B).text(pair.para_id(Side::B)).map(str::to_string),
            similarity: pair.similarity,
            d_4: pair.d_4.clone(),
        }
    }

    /// Detail for the `index`-th matched paragraph.
    pub fn detail(&self, index: usize) -> Option<PairDetail> {
        self.pairs.get(index).map(|pair| self.detail_of(pair))
    }

    /// Detail for the first pair whose counterpart text equals `text`.
    pub fn detail_for_text(&self, text: &str) -> Option<PairDetail> {
        let other = self.anchor.as_ref()?.side.opposite();
        let column = self.column(other);
        self.pairs
            .iter()
            .find(|pair| column.text(pair.para_id(other)).unwrap_or("") == text)
            .map(|pair| self.detail_of(pair))
    }
}
