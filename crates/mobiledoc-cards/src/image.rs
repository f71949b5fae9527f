//! Image card.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Card, CardOptions, RenderEnv};
use serde::Deserialize;
use serde_json::Value;

use crate::payload::{append_caption, decode, figure, non_blank};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload {
    src: Option<String>,
    alt: Option<String>,
    title: Option<String>,
    caption: Option<String>,
    card_width: Option<String>,
}

/// Renders `<figure class="kg-card kg-image-card"><img class="kg-image"></figure>`.
///
/// `cardWidth` of `wide` or `full` adds `kg-width-wide` / `kg-width-full` to
/// the figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCard;

impl Card for ImageCard {
    fn name(&self) -> &str {
        "image"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        let Some(payload) = decode::<ImagePayload>(env.name, payload) else {
            return Ok(None);
        };
        let Some(src) = non_blank(payload.src) else {
            return Ok(None);
        };

        let mut class = String::from("kg-card kg-image-card");
        match payload.card_width.as_deref() {
            Some("wide") => class.push_str(" kg-width-wide"),
            Some("full") => class.push_str(" kg-width-full"),
            _ => {}
        }
        let dom = &mut *env.dom;
        let figure = figure(dom, &class)?;

        let img = dom.create_element("img");
        dom.set_attribute(img, "src", src)?;
        dom.set_attribute(img, "class", "kg-image")?;
        if let Some(alt) = payload.alt {
            dom.set_attribute(img, "alt", alt)?;
        }
        if let Some(title) = non_blank(payload.title) {
            dom.set_attribute(img, "title", title)?;
        }
        dom.append_child(figure, img)?;

        append_caption(dom, figure, payload.caption)?;
        Ok(Some(figure))
    }
}
