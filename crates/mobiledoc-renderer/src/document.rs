//! Mobiledoc 0.3 document model.
//!
//! Mobiledoc stores everything as positional JSON arrays:
//!
//! ```text
//! {
//!   "version": "0.3.1",
//!   "atoms":   [["mention", "@bob", {"id": 42}]],
//!   "cards":   [["image", {"src": "/a.png"}]],
//!   "markups": [["b"], ["a", ["href", "/x"]]],
//!   "sections": [
//!     [1, "p", [[0, [0], 1, "bold"], [1, [], 0, 0]]],
//!     [2, "/legacy.png"],
//!     [3, "ul", [[[0, [], 0, "item"]]]],
//!     [10, 0]
//!   ]
//! }
//! ```
//!
//! Sections and markers are decoded by their leading type code.

use std::fmt;

use serde::de::{self, Deserializer, Expected, IgnoredAny, SeqAccess, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::DocumentError;

/// Supported mobiledoc format versions share this prefix.
pub const SUPPORTED_VERSION_PREFIX: &str = "0.3.";

const MARKUP_SECTION_TYPE: u8 = 1;
const IMAGE_SECTION_TYPE: u8 = 2;
const LIST_SECTION_TYPE: u8 = 3;
const CARD_SECTION_TYPE: u8 = 10;

const TEXT_MARKER_TYPE: u8 = 0;
const ATOM_MARKER_TYPE: u8 = 1;

/// A parsed mobiledoc document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mobiledoc {
    /// Format version, e.g. `0.3.1`.
    pub version: String,
    /// Atom table referenced by atom markers.
    #[serde(default)]
    pub atoms: Vec<AtomEntry>,
    /// Card table referenced by card sections.
    #[serde(default)]
    pub cards: Vec<CardEntry>,
    /// Markup table referenced by markers.
    #[serde(default)]
    pub markups: Vec<MarkupEntry>,
    /// Top-level sections in document order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Mobiledoc {
    /// Create an empty document with the given format version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            atoms: Vec::new(),
            cards: Vec::new(),
            markups: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Parse and version-check a JSON document.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_str(json)?;
        doc.check_version()?;
        Ok(doc)
    }

    /// Decode and version-check an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_value(value)?;
        doc.check_version()?;
        Ok(doc)
    }

    /// Ensure the document uses a 0.3.x format.
    pub fn check_version(&self) -> Result<(), DocumentError> {
        if self.version.starts_with(SUPPORTED_VERSION_PREFIX) {
            Ok(())
        } else {
            Err(DocumentError::UnsupportedVersion(self.version.clone()))
        }
    }
}

/// Card table entry: `[name, payload]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, Value)")]
pub struct CardEntry {
    /// Card type name, resolved through the card registry.
    pub name: String,
    /// Card-specific payload.
    pub payload: Value,
}

impl From<(String, Value)> for CardEntry {
    fn from((name, payload): (String, Value)) -> Self {
        Self { name, payload }
    }
}

/// Atom table entry: `[name, text, payload]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, String, Value)")]
pub struct AtomEntry {
    /// Atom type name, resolved through the atom registry.
    pub name: String,
    /// Display text of the atom.
    pub value: String,
    /// Atom-specific payload.
    pub payload: Value,
}

impl From<(String, String, Value)> for AtomEntry {
    fn from((name, value, payload): (String, String, Value)) -> Self {
        Self {
            name,
            value,
            payload,
        }
    }
}

/// Markup table entry: `[tagName]` or `[tagName, [attr, value, ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMarkup")]
pub struct MarkupEntry {
    /// Inline tag name, e.g. `strong` or `a`.
    pub tag_name: String,
    /// Flat attribute list `[name, value, name, value, ...]`.
    pub attributes: Vec<String>,
}

impl MarkupEntry {
    /// Attribute name/value pairs. A dangling trailing name is ignored.
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        pairs(&self.attributes)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMarkup {
    WithAttributes((String, Vec<String>)),
    Bare((String,)),
}

impl From<RawMarkup> for MarkupEntry {
    fn from(raw: RawMarkup) -> Self {
        let (tag_name, attributes) = match raw {
            RawMarkup::WithAttributes((tag_name, attributes)) => (tag_name, attributes),
            RawMarkup::Bare((tag_name,)) => (tag_name, Vec::new()),
        };
        Self {
            tag_name,
            attributes,
        }
    }
}

/// A top-level section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// `[1, tagName, markers, attributes?]`
    Markup {
        /// Block tag name (`p`, `h2`, `blockquote`, ...).
        tag_name: String,
        /// Inline content.
        markers: Vec<Marker>,
        /// Flat section attribute list (0.3.2).
        attributes: Vec<String>,
    },
    /// `[2, src]`
    Image {
        /// Image URL.
        src: String,
    },
    /// `[3, tagName, items, attributes?]`
    List {
        /// `ul` or `ol`.
        tag_name: String,
        /// One marker list per list item.
        items: Vec<Vec<Marker>>,
        /// Flat section attribute list (0.3.2).
        attributes: Vec<String>,
    },
    /// `[10, cardIndex]`
    Card {
        /// Index into the card table.
        index: usize,
    },
}

/// Inline content unit of a markup section or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Markup table indexes opened before this marker's content.
    pub open_markups: Vec<usize>,
    /// Number of open markups closed after this marker's content.
    pub close_count: usize,
    /// Text or atom reference.
    pub value: MarkerValue,
}

/// Content of a [`Marker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    /// `[0, open, close, text]`
    Text(String),
    /// `[1, open, close, atomIndex]`
    Atom(usize),
}

impl Marker {
    /// Text marker with no markups.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            open_markups: Vec::new(),
            close_count: 0,
            value: MarkerValue::Text(text.into()),
        }
    }

    /// Atom marker with no markups.
    #[must_use]
    pub fn atom(index: usize) -> Self {
        Self {
            open_markups: Vec::new(),
            close_count: 0,
            value: MarkerValue::Atom(index),
        }
    }

    /// Open the given markups before the content and close `close_count` after it.
    #[must_use]
    pub fn with_markups(mut self, open_markups: Vec<usize>, close_count: usize) -> Self {
        self.open_markups = open_markups;
        self.close_count = close_count;
        self
    }
}

/// Iterate a flat `[name, value, ...]` list as pairs.
pub(crate) fn pairs(flat: &[String]) -> impl Iterator<Item = (&str, &str)> {
    flat.chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
}

fn next_required<'de, T, A>(seq: &mut A, index: usize, exp: &dyn Expected) -> Result<T, A::Error>
where
    T: Deserialize<'de>,
    A: SeqAccess<'de>,
{
    seq.next_element()?
        .ok_or_else(|| de::Error::invalid_length(index, exp))
}

fn next_optional<'de, T, A>(seq: &mut A) -> Result<T, A::Error>
where
    T: Deserialize<'de> + Default,
    A: SeqAccess<'de>,
{
    Ok(seq.next_element()?.unwrap_or_default())
}

fn drain<'de, A: SeqAccess<'de>>(seq: &mut A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SectionVisitor)
    }
}

struct SectionVisitor;

impl<'de> Visitor<'de> for SectionVisitor {
    type Value = Section;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mobiledoc section array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Section, A::Error> {
        let code: u8 = next_required(&mut seq, 0, &self)?;
        let section = match code {
            MARKUP_SECTION_TYPE => Section::Markup {
                tag_name: next_required(&mut seq, 1, &self)?,
                markers: next_required(&mut seq, 2, &self)?,
                attributes: next_optional(&mut seq)?,
            },
            IMAGE_SECTION_TYPE => Section::Image {
                src: next_required(&mut seq, 1, &self)?,
            },
            LIST_SECTION_TYPE => Section::List {
                tag_name: next_required(&mut seq, 1, &self)?,
                items: next_required(&mut seq, 2, &self)?,
                attributes: next_optional(&mut seq)?,
            },
            CARD_SECTION_TYPE => Section::Card {
                index: next_required(&mut seq, 1, &self)?,
            },
            other => {
                return Err(de::Error::invalid_value(
                    Unexpected::Unsigned(other.into()),
                    &"section type 1, 2, 3 or 10",
                ));
            }
        };
        drain(&mut seq)?;
        Ok(section)
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(MarkerVisitor)
    }
}

struct MarkerVisitor;

impl<'de> Visitor<'de> for MarkerVisitor {
    type Value = Marker;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mobiledoc marker array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Marker, A::Error> {
        let code: u8 = next_required(&mut seq, 0, &self)?;
        let open_markups = next_required(&mut seq, 1, &self)?;
        let close_count = next_required(&mut seq, 2, &self)?;
        let value = match code {
            TEXT_MARKER_TYPE => MarkerValue::Text(next_required(&mut seq, 3, &self)?),
            ATOM_MARKER_TYPE => MarkerValue::Atom(next_required(&mut seq, 3, &self)?),
            other => {
                return Err(de::Error::invalid_value(
                    Unexpected::Unsigned(other.into()),
                    &"marker type 0 or 1",
                ));
            }
        };
        drain(&mut seq)?;
        Ok(Marker {
            open_markups,
            close_count,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_full_document() {
        let doc = Mobiledoc::from_json(
            r#"{
                "version": "0.3.1",
                "atoms": [["mention", "@bob", {"id": 42}]],
                "cards": [["hr", {}]],
                "markups": [["b"], ["a", ["href", "/x"]]],
                "sections": [
                    [1, "p", [[0, [0], 1, "bold"], [1, [], 0, 0]]],
                    [2, "/legacy.png"],
                    [3, "ul", [[[0, [1], 1, "item"]]]],
                    [10, 0]
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.atoms[0].name, "mention");
        assert_eq!(doc.atoms[0].value, "@bob");
        assert_eq!(doc.atoms[0].payload, json!({"id": 42}));
        assert_eq!(doc.cards[0].name, "hr");
        assert_eq!(doc.markups[0].tag_name, "b");
        assert!(doc.markups[0].attributes.is_empty());
        assert_eq!(
            doc.markups[1].attribute_pairs().collect::<Vec<_>>(),
            vec![("href", "/x")]
        );

        assert_eq!(
            doc.sections[0],
            Section::Markup {
                tag_name: "p".to_owned(),
                markers: vec![
                    Marker::text("bold").with_markups(vec![0], 1),
                    Marker::atom(0),
                ],
                attributes: Vec::new(),
            }
        );
        assert_eq!(
            doc.sections[1],
            Section::Image {
                src: "/legacy.png".to_owned()
            }
        );
        assert_eq!(
            doc.sections[2],
            Section::List {
                tag_name: "ul".to_owned(),
                items: vec![vec![Marker::text("item").with_markups(vec![1], 1)]],
                attributes: Vec::new(),
            }
        );
        assert_eq!(doc.sections[3], Section::Card { index: 0 });
    }

    #[test]
    fn test_missing_tables_default_to_empty() {
        let doc = Mobiledoc::from_json(r#"{"version": "0.3.0"}"#).unwrap();
        assert!(doc.sections.is_empty());
        assert!(doc.cards.is_empty());
    }

    #[test]
    fn test_section_attributes() {
        let doc = Mobiledoc::from_value(json!({
            "version": "0.3.2",
            "sections": [[1, "p", [], ["data-md-text-align", "center"]]]
        }))
        .unwrap();
        let Section::Markup { attributes, .. } = &doc.sections[0] else {
            panic!("expected markup section");
        };
        assert_eq!(attributes, &["data-md-text-align", "center"]);
    }

    #[test]
    fn test_unsupported_version() {
        let err = Mobiledoc::from_json(r#"{"version": "0.2.0", "sections": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedVersion(v) if v == "0.2.0"));
    }

    #[test]
    fn test_unknown_section_type() {
        let err = Mobiledoc::from_json(r#"{"version": "0.3.1", "sections": [[7, "x"]]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("section type"));
    }

    #[test]
    fn test_unknown_marker_type() {
        let err = Mobiledoc::from_json(
            r#"{"version": "0.3.1", "sections": [[1, "p", [[5, [], 0, "x"]]]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("marker type"));
    }

    #[test]
    fn test_truncated_section() {
        let err =
            Mobiledoc::from_json(r#"{"version": "0.3.1", "sections": [[1, "p"]]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }
}
