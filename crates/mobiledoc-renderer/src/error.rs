//! Error types for document loading and rendering.

use mobiledoc_dom::DomError;

/// Error loading a mobiledoc document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// Malformed JSON or structure.
    #[error("invalid mobiledoc: {0}")]
    Json(#[from] serde_json::Error),

    /// Document format version this renderer does not understand.
    #[error("unsupported mobiledoc version: {0}")]
    UnsupportedVersion(String),
}

/// Error raised when a document cannot be rendered at all.
///
/// Unknown card or atom names are not errors: they are reported through the
/// unknown-card/atom handlers and rendering continues.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Document could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Card section points past the card table.
    #[error("card section references missing card {index}")]
    MissingCard {
        /// Referenced card index.
        index: usize,
    },

    /// Atom marker points past the atom table.
    #[error("atom marker references missing atom {index}")]
    MissingAtom {
        /// Referenced atom index.
        index: usize,
    },

    /// Marker opens a markup that is not in the markup table.
    #[error("marker references missing markup {index}")]
    MissingMarkup {
        /// Referenced markup index.
        index: usize,
    },

    /// Marker closes more markups than are open.
    #[error("marker closes more markups than are open")]
    UnbalancedMarkup,

    /// Marker opens more nested markups than the renderer allows.
    #[error("markup nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// Maximum supported nesting depth.
        limit: usize,
    },

    /// Tree mutation failed.
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
