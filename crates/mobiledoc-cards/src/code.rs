//! Code card.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Card, CardOptions, RenderEnv};
use serde::Deserialize;
use serde_json::Value;

use crate::payload::{decode, non_blank};

#[derive(Debug, Default, Deserialize)]
struct CodePayload {
    code: Option<String>,
    language: Option<String>,
}

/// Renders `<pre><code class="language-X">...</code></pre>` with escaped source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeCard;

impl Card for CodeCard {
    fn name(&self) -> &str {
        "code"
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        _options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        let Some(payload) = decode::<CodePayload>(env.name, payload) else {
            return Ok(None);
        };
        let Some(code) = payload.code.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };

        let dom = &mut *env.dom;
        let pre = dom.create_element("pre");
        let code_el = dom.create_element("code");
        if let Some(language) = non_blank(payload.language) {
            dom.set_attribute(code_el, "class", format!("language-{}", language.trim()))?;
        }
        let text = dom.create_text_node(code);
        dom.append_child(code_el, text)?;
        dom.append_child(pre, code_el)?;
        Ok(Some(pre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiledoc_dom::{Document, HtmlSerializer};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(payload: &Value) -> String {
        let mut dom = Document::new();
        let mut env = RenderEnv {
            name: "code",
            dom: &mut dom,
        };
        let node = CodeCard
            .render(&mut env, &CardOptions::default(), payload)
            .unwrap();
        node.map(|n| HtmlSerializer::new().serialize(&dom, n))
            .unwrap_or_default()
    }

    #[test]
    fn test_code_with_language() {
        assert_eq!(
            render(&json!({"code": "if a < b {}", "language": "rust"})),
            r#"<pre><code class="language-rust">if a &lt; b {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_without_language() {
        assert_eq!(
            render(&json!({"code": "x"})),
            "<pre><code>x</code></pre>"
        );
    }

    #[test]
    fn test_empty_code_renders_nothing() {
        assert_eq!(render(&json!({"code": ""})), "");
        assert_eq!(render(&json!({"language": "rust"})), "");
    }
}
