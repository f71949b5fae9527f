//! Payload decoding and shared figure markup.

use mobiledoc_dom::{Document, DomError, NodeId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a card payload, logging and returning `None` when it does not match.
pub(crate) fn decode<T: DeserializeOwned>(card: &str, payload: &Value) -> Option<T> {
    match T::deserialize(payload) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(card, error = %e, "Invalid card payload");
            None
        }
    }
}

/// Keep a string only if it has non-whitespace content.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Create `<figure class="...">`.
pub(crate) fn figure(dom: &mut Document, class: &str) -> Result<NodeId, DomError> {
    let figure = dom.create_element("figure");
    dom.set_attribute(figure, "class", class)?;
    Ok(figure)
}

/// Append `<figcaption>` with HTML caption content when the caption is not blank.
pub(crate) fn append_caption(
    dom: &mut Document,
    figure: NodeId,
    caption: Option<String>,
) -> Result<(), DomError> {
    if let Some(caption) = non_blank(caption) {
        let figcaption = dom.create_element("figcaption");
        let content = dom.create_raw_html(caption);
        dom.append_child(figcaption, content)?;
        dom.append_child(figure, figcaption)?;
    }
    Ok(())
}
