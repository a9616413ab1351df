//! Paragraph columns for the climate report view.

use std::collections::HashMap;

use docdiff_core::{PairCounts, Paragraph, Side};

/// Everything the climate view fetches at bootstrap.
#[derive(Debug, Clone, Default)]
pub struct ClimateSnapshot {
    pub paragraphs_a: Vec<Paragraph>,
    pub paragraphs_b: Vec<Paragraph>,
    pub counts_a: PairCounts,
    pub counts_b: PairCounts,
}

/// How a minimap mark is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Anchor,
    Matched,
    /// Has at least one pair.
    Paired,
    Unpaired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimapMark {
    pub index: usize,
    /// Vertical position in percent, 0.0 to 100.0.
    pub position: f64,
    pub shade: Shade,
}

/// One document's paragraphs in reading order, with aligned pair counts and
/// an id → position lookup.
#[derive(Debug, Clone)]
pub struct ParagraphColumn {
    side: Side,
    document: String,
    paragraphs: Vec<Paragraph>,
    counts: Vec<u64>,
    by_id: HashMap<String, usize>,
}

impl ParagraphColumn {
    pub fn new(side: Side, document: &str, paragraphs: Vec<Paragraph>, counts: &PairCounts) -> Self {
        let counts = paragraphs
            .iter()
            .map(|p| counts.get(&p.para_id).copied().unwrap_or(0))
            .collect();
        let mut by_id = HashMap::with_capacity(paragraphs.len());
        for (i, p) in paragraphs.iter().enumerate() {
            // First occurrence wins for duplicate ids.
            by_id.entry(p.para_id.clone()).or_insert(i);
        }
        Self {
            side,
            document: document.to_string(),
            paragraphs,
            counts,
            by_id,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn get(&self, para_id: &str) -> Option<&Paragraph> {
        self.by_id.get(para_id).map(|&i| &self.paragraphs[i])
    }

    pub fn text(&self, para_id: &str) -> Option<&str> {
        self.get(para_id).map(|p| p.text.as_str())
    }

    /// Pair count for the paragraph at `index`.
    pub fn count_at(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn count(&self, para_id: &str) -> u64 {
        self.by_id.get(para_id).map_or(0, |&i| self.count_at(i))
    }

    /// Indices of paragraphs whose text contains `term`, case-insensitively.
    /// An empty term keeps every paragraph.
    pub fn filter(&self, term: &str) -> Vec<usize> {
        let needle = term.trim().to_lowercase();
        self.paragraphs
            .iter()
            .enumerate()
            .filter(|(_, p)| needle.is_empty() || p.text.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// One mark per paragraph. `highlight` returns `Some(Anchor | Matched)`
    /// for paragraphs the resolver has lit up.
    pub fn minimap(&self, highlight: impl Fn(&Paragraph) -> Option<Shade>) -> Vec<MinimapMark> {
        let n = self.paragraphs.len();
        self.paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let shade = highlight(p).unwrap_or(if self.count_at(i) > 0 {
                    Shade::Paired
                } else {
                    Shade::Unpaired
                });
                MinimapMark {
                    index: i,
                    position: minimap_position(i, n),
                    shade,
                }
            })
            .collect()
    }
}

/// Position of mark `i` of `n` in percent; 0 when there is a single mark.
pub fn minimap_position(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        i as f64 / (n - 1) as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::para;

    fn column() -> ParagraphColumn {
        let counts: PairCounts = [("p1".to_string(), 3), ("p3".to_string(), 1)].into();
        ParagraphColumn::new(
            Side::A,
            "ncr",
            vec![
                para("ncr", "p1", "Emissions fell sharply."),
                para("ncr", "p2", "Adaptation funding rose."),
                para("ncr", "p3", "Net zero by 2050."),
            ],
            &counts,
        )
    }

    #[test]
    fn counts_align_by_id() {
        let col = column();
        assert_eq!(col.count_at(0), 3);
        assert_eq!(col.count_at(1), 0);
        assert_eq!(col.count("p3"), 1);
        assert_eq!(col.count("missing"), 0);
    }

    #[test]
    fn lookup_by_id() {
        let col = column();
        assert_eq!(col.text("p2"), Some("Adaptation funding rose."));
        assert!(col.get("p9").is_none());
        assert_eq!(col.document(), "ncr");
    }

    #[test]
    fn filter_is_case_insensitive_and_empty_keeps_all() {
        let col = column();
        assert_eq!(col.filter("EMISSIONS"), vec![0]);
        assert_eq!(col.filter(""), vec![0, 1, 2]);
        assert!(col.filter("ocean").is_empty());
    }

    #[test]
    fn minimap_positions_and_shades() {
        let col = column();
        let marks = col.minimap(|p| (p.para_id == "p3").then_some(Shade::Anchor));
        let positions: Vec<f64> = marks.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0.0, 50.0, 100.0]);
        let shades: Vec<Shade> = marks.iter().map(|m| m.shade).collect();
        assert_eq!(shades, vec![Shade::Paired, Shade::Unpaired, Shade::Anchor]);
    }

    #[test]
    fn single_mark_sits_at_top() {
        assert_eq!(minimap_position(0, 1), 0.0);
        assert_eq!(minimap_position(0, 0), 0.0);
    }
}
