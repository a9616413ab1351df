//! Session bootstrap: fetch every snapshot a view needs, concurrently.
//!
//! Both loaders race the fetches against a [`CancellationToken`]. A
//! cancelled load resolves to [`FetchError::Aborted`], which callers treat
//! as a no-op rather than an error.

use docdiff_core::config::ClimateConfig;
use docdiff_core::{ProvisionSnapshot, Side, SideConventions};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::climate::ClimateSnapshot;
use crate::error::FetchError;
use crate::provider::DataProvider;

/// Load both outlines, the pair list, colouring, and comparison notes.
pub async fn load_provisions(
    provider: &dyn DataProvider,
    sides: &SideConventions,
    cancel: &CancellationToken,
) -> Result<ProvisionSnapshot, FetchError> {
    let fetch = async {
        let (outline_a, outline_b, pairs, colouring, comparisons) = futures::try_join!(
            provider.outline(&sides.a.slug),
            provider.outline(&sides.b.slug),
            provider.similarity_pairs(),
            provider.colouring(),
            provider.comparisons(),
        )?;
        Ok::<_, FetchError>(ProvisionSnapshot {
            outline_a,
            outline_b,
            pairs,
            colouring,
            comparisons,
        })
    };

    let snapshot = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Aborted),
        result = fetch => result?,
    };
    info!(
        chapters_a = snapshot.outline_a.len(),
        chapters_b = snapshot.outline_b.len(),
        pairs = snapshot.pairs.len(),
        colouring = snapshot.colouring.len(),
        comparisons = snapshot.comparisons.len(),
        "provision bootstrap complete"
    );
    Ok(snapshot)
}

/// Load both paragraph lists and both pair count maps.
pub async fn load_climate(
    provider: &dyn DataProvider,
    climate: &ClimateConfig,
    cancel: &CancellationToken,
) -> Result<ClimateSnapshot, FetchError> {
    let (doc_a, doc_b) = (climate.document(Side::A), climate.document(Side::B));
    let fetch = async {
        let (paragraphs_a, paragraphs_b, counts_a, counts_b) = futures::try_join!(
            provider.paragraphs(doc_a),
            provider.paragraphs(doc_b),
            provider.pair_counts(doc_a),
            provider.pair_counts(doc_b),
        )?;
        Ok::<_, FetchError>(ClimateSnapshot {
            paragraphs_a,
            paragraphs_b,
            counts_a,
            counts_b,
        })
    };

    let snapshot = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Aborted),
        result = fetch => result?,
    };
    info!(
        paragraphs_a = snapshot.paragraphs_a.len(),
        paragraphs_b = snapshot.paragraphs_b.len(),
        "climate bootstrap complete"
    );
    Ok(snapshot)
}
