//! Wire types served by the docdiff data provider.
//!
//! Upstream data is expected to be occasionally inconsistent, so the
//! deserialisers here are lenient: ids may arrive as numbers, scores as
//! strings or nulls, and missing optional fields fall back to defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::annotate::Category;
use crate::side::SideSpec;

/// A leaf unit of an outline (a regulation, section, or clause).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// One node of a document outline.
///
/// A node is either a container (`parts`) or a leaf holder (`provisions`).
/// On the wire `parts` is a JSON object keyed by part id; its insertion
/// order is the display order and is preserved here as a `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "ordered_parts"
    )]
    pub parts: Option<Vec<OutlineNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisions: Option<Vec<Provision>>,
}

/// A precomputed similarity edge between one provision from each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    #[serde(deserialize_with = "lenient::string")]
    pub id_1: String,
    #[serde(deserialize_with = "lenient::string")]
    pub id_2: String,
    /// Unreadable scores deserialise as NaN and are later excluded.
    #[serde(default = "lenient::nan", deserialize_with = "lenient::score")]
    pub similarity: f64,
}

/// One paragraph of a report, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, deserialize_with = "lenient::string")]
    pub doc_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub para_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
}

/// A resolved paragraph pair returned by the on-demand lookup.
///
/// The server names the fields against the document order: `text_b` holds
/// the Side A paragraph id (`ncr`) and `text_a` the Side B id (`singapore`),
/// whichever side the lookup was anchored on. Read them through
/// [`ParagraphPair::para_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphPair {
    #[serde(deserialize_with = "lenient::string")]
    pub text_a: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text_b: String,
    #[serde(default, deserialize_with = "lenient::optional_score")]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub d_4: serde_json::Value,
}

impl ParagraphPair {
    /// The paragraph id this pair holds for `side`.
    pub fn para_id(&self, side: crate::Side) -> &str {
        match side {
            crate::Side::A => &self.text_b,
            crate::Side::B => &self.text_a,
        }
    }
}

/// Per-paragraph pair counts, keyed by `para_id`.
pub type PairCounts = HashMap<String, u64>;

/// Annotated text fields for one provision.
///
/// Each field is markdown that may carry `<span class="who">…</span>`
/// highlight markup for its category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColouringRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default)]
    pub who: Option<String>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default, rename = "where")]
    pub where_: Option<String>,
    #[serde(default)]
    pub how: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub penalty: Option<String>,
}

impl ColouringRecord {
    /// Field order used to pick the source of the clean provision text.
    const CLEAN_ORDER: [Category; 6] = [
        Category::How,
        Category::Who,
        Category::When,
        Category::Where,
        Category::Tone,
        Category::Penalty,
    ];

    pub fn field(&self, category: Category) -> Option<&str> {
        let value = match category {
            Category::Who => &self.who,
            Category::When => &self.when,
            Category::Where => &self.where_,
            Category::How => &self.how,
            Category::Tone => &self.tone,
            Category::Penalty => &self.penalty,
        };
        value.as_deref()
    }

    /// The first non-empty field in how, who, when, where, tone, penalty order.
    pub fn clean_source(&self) -> &str {
        Self::CLEAN_ORDER
            .iter()
            .filter_map(|&c| self.field(c))
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// Free-text comparison notes for an unordered pair of provisions.
///
/// On the wire this is a flat object: the two provision ids are stored under
/// the side labels (e.g. `"NSW"`, `"Victoria"`) and the notes under the
/// category names (`"who"`, `"tone"`, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonNote(pub BTreeMap<String, serde_json::Value>);

impl ComparisonNote {
    /// The provision id stored for the side described by `spec`.
    pub fn id_for(&self, spec: &SideSpec) -> Option<&str> {
        self.0.get(&spec.label).and_then(|v| v.as_str())
    }

    pub fn note(&self, category: Category) -> Option<&str> {
        self.0.get(category.as_str()).and_then(|v| v.as_str())
    }

    /// True when this note covers `left` and `right`, in either order.
    pub fn covers(&self, a: &SideSpec, b: &SideSpec, left: &str, right: &str) -> bool {
        let (Some(id_a), Some(id_b)) = (self.id_for(a), self.id_for(b)) else {
            return false;
        };
        (id_a == left && id_b == right) || (id_a == right && id_b == left)
    }
}

/// Everything the provision explorer fetches at bootstrap.
#[derive(Debug, Clone, Default)]
pub struct ProvisionSnapshot {
    pub outline_a: Vec<OutlineNode>,
    pub outline_b: Vec<OutlineNode>,
    pub pairs: Vec<SimilarityPair>,
    pub colouring: Vec<ColouringRecord>,
    pub comparisons: Vec<ComparisonNote>,
}

// ── Serde helpers ──

mod ordered_parts {
    use std::fmt;

    use serde::de::{MapAccess, SeqAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::OutlineNode;

    pub fn serialize<S: Serializer>(
        parts: &Option<Vec<OutlineNode>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match parts {
            Some(parts) => {
                let mut map = serializer.serialize_map(Some(parts.len()))?;
                for part in parts {
                    map.serialize_entry(&part.id, part)?;
                }
                map.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<OutlineNode>>, D::Error> {
        Ok(Option::<OrderedParts>::deserialize(deserializer)?.map(|p| p.0))
    }

    struct OrderedParts(Vec<OutlineNode>);

    impl<'de> Deserialize<'de> for OrderedParts {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(PartsVisitor)
        }
    }

    struct PartsVisitor;

    impl<'de> Visitor<'de> for PartsVisitor {
        type Value = OrderedParts;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map or list of outline parts")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut parts = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((_key, node)) = access.next_entry::<String, OutlineNode>()? {
                parts.push(node);
            }
            Ok(OrderedParts(parts))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut parts = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(node) = access.next_element::<OutlineNode>()? {
                parts.push(node);
            }
            Ok(OrderedParts(parts))
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn nan() -> f64 {
        f64::NAN
    }

    /// Strings pass through; numbers and booleans are stringified; null is empty.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        })
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(to_score(&Value::deserialize(deserializer)?).unwrap_or(f64::NAN))
    }

    pub fn optional_score<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Ok(to_score(&Value::deserialize(deserializer)?))
    }

    fn to_score(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
