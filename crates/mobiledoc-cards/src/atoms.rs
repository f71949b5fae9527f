//! Built-in atoms.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Atom, CardOptions, RenderEnv};
use serde_json::Value;

/// Line break inside a paragraph (shift+enter in the editor).
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftReturnAtom;

impl Atom for SoftReturnAtom {
    fn name(&self) -> &str {
        "soft-return"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        _value: &str,
        _payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        Ok(Some(env.dom.create_element("br")))
    }
}
