//! Horizontal rule card.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Card, CardOptions, RenderEnv};
use serde_json::Value;

/// Renders `<hr>`. The payload is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct HrCard;

impl Card for HrCard {
    fn name(&self) -> &str {
        "hr"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        _payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        Ok(Some(env.dom.create_element("hr")))
    }
}
