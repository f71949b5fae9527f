//! Raw HTML and embed cards.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Card, CardOptions, RenderEnv};
use serde::Deserialize;
use serde_json::Value;

use crate::payload::{append_caption, decode, figure, non_blank};

#[derive(Debug, Default, Deserialize)]
struct HtmlPayload {
    html: Option<String>,
    caption: Option<String>,
}

/// Inserts the `html` payload verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCard;

impl Card for HtmlCard {
    fn name(&self) -> &str {
        "html"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        Ok(decode::<HtmlPayload>(env.name, payload)
            .and_then(|p| non_blank(p.html))
            .map(|html| env.dom.create_raw_html(html)))
    }
}

/// Wraps third-party embed HTML in `<figure class="kg-card kg-embed-card">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedCard;

impl Card for EmbedCard {
    fn name(&self) -> &str {
        "embed"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        let Some(payload) = decode::<HtmlPayload>(env.name, payload) else {
            return Ok(None);
        };
        let Some(html) = non_blank(payload.html) else {
            return Ok(None);
        };

        let dom = &mut *env.dom;
        let figure = figure(dom, "kg-card kg-embed-card")?;
        let content = dom.create_raw_html(html);
        dom.append_child(figure, content)?;
        append_caption(dom, figure, payload.caption)?;
        Ok(Some(figure))
    }
}
