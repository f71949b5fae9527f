//! Card and atom registries.
//!
//! Cards are block-level content (images, embeds, code), atoms are inline
//! content (mentions, soft line breaks). Both are resolved by name when a
//! document is rendered. Registries are built once and shared read-only
//! across render calls.

use std::collections::HashMap;
use std::sync::Arc;

use mobiledoc_dom::{Document, DomError, NodeId};
use serde_json::Value;

use crate::options::CardOptions;

/// Rendering environment handed to cards and atoms.
pub struct RenderEnv<'a> {
    /// Name the card or atom was registered under.
    pub name: &'a str,
    /// Document the output node must be created in.
    pub dom: &'a mut Document,
}

/// Block-level content renderer.
pub trait Card: Send + Sync {
    /// Registry name (`"image"`, `"markdown"`, ...).
    fn name(&self) -> &str;

    /// Render the card payload into a detached node.
    ///
    /// Returning `None` renders nothing for this section.
    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError>;
}

/// Inline content renderer.
pub trait Atom: Send + Sync {
    /// Registry name (`"soft-return"`, `"mention"`, ...).
    fn name(&self) -> &str;

    /// Render the atom into a detached node.
    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        options: &CardOptions,
        value: &str,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError>;
}

/// Name-keyed registry of cards or atoms.
pub struct Registry<T: ?Sized> {
    entries: HashMap<String, Arc<T>>,
}

/// Registry of [`Card`] renderers.
pub type CardRegistry = Registry<dyn Card>;

/// Registry of [`Atom`] renderers.
pub type AtomRegistry = Registry<dyn Atom>;

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.entries.get(name)
    }

    /// Whether an entry with `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an entry, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Arc<T>> {
        self.entries.remove(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .finish()
    }
}

impl Registry<dyn Card> {
    /// Register a card under its own name, replacing any previous entry.
    pub fn register(&mut self, card: Arc<dyn Card>) {
        self.entries.insert(card.name().to_owned(), card);
    }

    /// Register a card (builder style).
    #[must_use]
    pub fn with(mut self, card: impl Card + 'static) -> Self {
        self.register(Arc::new(card));
        self
    }
}

impl Registry<dyn Atom> {
    /// Register an atom under its own name, replacing any previous entry.
    pub fn register(&mut self, atom: Arc<dyn Atom>) {
        self.entries.insert(atom.name().to_owned(), atom);
    }

    /// Register an atom (builder style).
    #[must_use]
    pub fn with(mut self, atom: impl Atom + 'static) -> Self {
        self.register(Arc::new(atom));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Divider;

    impl Card for Divider {
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

    struct Named(&'static str);

    impl Card for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn render(
            &self,
            _env: &mut RenderEnv<'_>,
            _options: &CardOptions,
            _payload: &Value,
        ) -> Result<Option<NodeId>, DomError> {
            Ok(None)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let cards = CardRegistry::new().with(Divider).with(Named("code"));
        assert_eq!(cards.len(), 2);
        assert!(cards.contains("hr"));
        assert_eq!(cards.names(), vec!["code", "hr"]);

        let mut dom = Document::new();
        let card = cards.get("hr").unwrap();
        let mut env = RenderEnv {
            name: "hr",
            dom: &mut dom,
        };
        let node = card
            .render(&mut env, &CardOptions::default(), &Value::Null)
            .unwrap()
            .unwrap();
        assert_eq!(dom.tag_name(node), Some("hr"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut cards = CardRegistry::new();
        cards.register(Arc::new(Named("hr")));
        cards.register(Arc::new(Divider));
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut cards = CardRegistry::new().with(Divider);
        assert!(cards.remove("hr").is_some());
        assert!(cards.is_empty());
        assert!(cards.get("hr").is_none());
    }
}
