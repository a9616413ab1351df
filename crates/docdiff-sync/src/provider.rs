use async_trait::async_trait;
use docdiff_core::{
    ColouringRecord, ComparisonNote, OutlineNode, PairCounts, Paragraph, ParagraphPair,
    SimilarityPair,
};

use crate::error::FetchError;

/// Read-only source of explorer data.
///
/// Provision routes take the outline slug for a side; paragraph routes take
/// the raw document name (`ncr`, `singapore`), since the remote lookup is
/// keyed by document identity rather than by side.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn outline(&self, slug: &str) -> Result<Vec<OutlineNode>, FetchError>;

    async fn similarity_pairs(&self) -> Result<Vec<SimilarityPair>, FetchError>;

    async fn colouring(&self) -> Result<Vec<ColouringRecord>, FetchError>;

    async fn comparisons(&self) -> Result<Vec<ComparisonNote>, FetchError>;

    async fn paragraphs(&self, document: &str) -> Result<Vec<Paragraph>, FetchError>;

    async fn pair_counts(&self, document: &str) -> Result<PairCounts, FetchError>;

    async fn paragraph_pairs(
        &self,
        document: &str,
        para_id: &str,
        size: u32,
    ) -> Result<Vec<ParagraphPair>, FetchError>;
}
