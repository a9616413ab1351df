//! Data access for docdiff: the provider seam, its HTTP implementation,
//! cancellable bootstrap loaders, and the paragraph pair resolver.

pub mod bootstrap;
pub mod climate;
pub mod error;
pub mod http;
pub mod provider;
pub mod resolver;

pub use bootstrap::{load_climate, load_provisions};
pub use climate::{ClimateSnapshot, MinimapMark, ParagraphColumn, Shade};
pub use error::FetchError;
pub use http::HttpProvider;
pub use provider::DataProvider;
pub use resolver::{Anchor, Applied, MatchedParagraph, PairDetail, PairResolver, Ticket};

#[cfg(test)]
pub(crate) mod testing;
