pub mod annotate;
pub mod compare;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod index;
pub mod model;
pub mod normalize;
pub mod outline;
pub mod search;
pub mod side;
pub mod tier;

pub use annotate::{AnnotatedText, Category, Segment};
pub use compare::{Counterpart, Explorer};
pub use config::Config;
pub use error::ConfigError;
pub use hierarchy::{ResultSet, Row, RowKind, TreeView, matches_or_descends};
pub use index::{AlignmentIndex, BuildSummary, TierAdjacency};
pub use model::{
    ColouringRecord, ComparisonNote, OutlineNode, PairCounts, Paragraph, ParagraphPair, Provision,
    ProvisionSnapshot, SimilarityPair,
};
pub use search::{FuzzyOracle, NucleoOracle, SearchIndex};
pub use side::{Side, SideConventions, SideSpec};
pub use tier::Tier;
