//! In-memory [`DataProvider`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use docdiff_core::{
    ColouringRecord, ComparisonNote, OutlineNode, PairCounts, Paragraph, ParagraphPair,
    Provision, SimilarityPair,
};

use crate::error::FetchError;
use crate::provider::DataProvider;

pub fn para(doc: &str, id: &str, text: &str) -> Paragraph {
    Paragraph {
        doc_id: doc.into(),
        para_id: id.into(),
        text: text.into(),
    }
}

/// A pair linking Side A paragraph `a` with Side B paragraph `b`, laid out
/// the way the server sends it.
pub fn pair(a: &str, b: &str, similarity: Option<f64>) -> ParagraphPair {
    ParagraphPair {
        text_a: b.into(),
        text_b: a.into(),
        similarity,
        d_4: serde_json::Value::Null,
    }
}

pub fn outline(chapter: &str, ids: &[&str]) -> Vec<OutlineNode> {
    vec![OutlineNode {
        id: chapter.into(),
        title: format!("Chapter {chapter}"),
        parts: None,
        provisions: Some(
            ids.iter()
                .map(|id| Provision {
                    id: id.to_string(),
                    title: format!("Provision {id}"),
                })
                .collect(),
        ),
    }]
}

#[derive(Default)]
pub struct StaticProvider {
    pub outlines: HashMap<String, Vec<OutlineNode>>,
    pub pairs: Vec<SimilarityPair>,
    pub colouring: Vec<ColouringRecord>,
    pub comparisons: Vec<ComparisonNote>,
    pub paragraphs: HashMap<String, Vec<Paragraph>>,
    pub counts: HashMap<String, PairCounts>,
    /// Keyed by `(document, para_id)`.
    pub paragraph_pairs: HashMap<(String, String), Vec<ParagraphPair>>,
    /// Status code returned by every paragraph pair lookup when set.
    pub fail_lookups: Option<u16>,
    /// Recorded `(document, para_id, size)` lookups.
    pub lookups: Mutex<Vec<(String, String, u32)>>,
}

fn not_found(what: &str) -> FetchError {
    FetchError::Server {
        status: 404,
        body: format!("{what} not found"),
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn outline(&self, slug: &str) -> Result<Vec<OutlineNode>, FetchError> {
        self.outlines.get(slug).cloned().ok_or_else(|| not_found(slug))
    }

    async fn similarity_pairs(&self) -> Result<Vec<SimilarityPair>, FetchError> {
        Ok(self.pairs.clone())
    }

    async fn colouring(&self) -> Result<Vec<ColouringRecord>, FetchError> {
        Ok(self.colouring.clone())
    }

    async fn comparisons(&self) -> Result<Vec<ComparisonNote>, FetchError> {
        Ok(self.comparisons.clone())
    }

    async fn paragraphs(&self, document: &str) -> Result<Vec<Paragraph>, FetchError> {
        self.paragraphs
            .get(document)
            .cloned()
            .ok_or_else(|| not_found(document))
    }

    async fn pair_counts(&self, document: &str) -> Result<PairCounts, FetchError> {
        Ok(self.counts.get(document).cloned().unwrap_or_default())
    }

    async fn paragraph_pairs(
        &self,
        document: &str,
        para_id: &str,
        size: u32,
    ) -> Result<Vec<ParagraphPair>, FetchError> {
        self.lookups
            .lock()
            .unwrap()
            .push((document.to_string(), para_id.to_string(), size));
        if let Some(status) = self.fail_lookups {
            return Err(FetchError::Server {
                status,
                body: "lookup failed".into(),
            });
        }
        Ok(self
            .paragraph_pairs
            .get(&(document.to_string(), para_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
