//! Renderer options shared across render calls.
//!
//! A [`RendererOptions`] value is built once (registries plus error handlers)
//! and never mutated afterwards. Each render derives a copy with its own
//! [`CardOptions`] overlaid, so renders with different versions cannot see
//! each other's settings.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::registry::{AtomRegistry, CardRegistry};

/// Options passed through to every card and atom renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardOptions {
    /// Render profile selector (1 = markdown-only documents, 2 = full documents).
    pub version: u32,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self { version: 1 }
    }
}

/// Arguments passed to the unknown-card handler.
#[derive(Debug)]
pub struct UnknownCardArgs<'a> {
    /// Card name that has no registered renderer.
    pub name: &'a str,
    /// Payload of the unresolved card.
    pub payload: &'a Value,
}

/// Arguments passed to the unknown-atom handler.
#[derive(Debug)]
pub struct UnknownAtomArgs<'a> {
    /// Atom name that has no registered renderer.
    pub name: &'a str,
    /// Display text of the unresolved atom.
    pub value: &'a str,
    /// Payload of the unresolved atom.
    pub payload: &'a Value,
}

/// Callback invoked for card names missing from the registry.
pub type UnknownCardHandler = Arc<dyn Fn(&UnknownCardArgs<'_>) + Send + Sync>;

/// Callback invoked for atom names missing from the registry.
pub type UnknownAtomHandler = Arc<dyn Fn(&UnknownAtomArgs<'_>) + Send + Sync>;

/// Base configuration for rendering documents.
#[derive(Clone)]
pub struct RendererOptions {
    /// Card renderers by name.
    pub cards: Arc<CardRegistry>,
    /// Atom renderers by name.
    pub atoms: Arc<AtomRegistry>,
    /// Called once per card section whose card is not registered.
    pub unknown_card_handler: UnknownCardHandler,
    /// Called once per atom marker whose atom is not registered.
    pub unknown_atom_handler: UnknownAtomHandler,
    /// Options handed to card and atom renderers.
    pub card_options: CardOptions,
}

impl RendererOptions {
    /// Create options with the given registries and logging handlers.
    #[must_use]
    pub fn new(cards: CardRegistry, atoms: AtomRegistry) -> Self {
        Self {
            cards: Arc::new(cards),
            atoms: Arc::new(atoms),
            unknown_card_handler: Arc::new(log_unknown_card),
            unknown_atom_handler: Arc::new(log_unknown_atom),
            card_options: CardOptions::default(),
        }
    }

    /// Replace the unknown-card handler.
    #[must_use]
    pub fn with_unknown_card_handler(
        mut self,
        handler: impl Fn(&UnknownCardArgs<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.unknown_card_handler = Arc::new(handler);
        self
    }

    /// Replace the unknown-atom handler.
    #[must_use]
    pub fn with_unknown_atom_handler(
        mut self,
        handler: impl Fn(&UnknownAtomArgs<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.unknown_atom_handler = Arc::new(handler);
        self
    }

    /// Derive a copy with `card_options` overlaid. `self` is left untouched.
    #[must_use]
    pub fn with_card_options(&self, card_options: CardOptions) -> Self {
        Self {
            card_options,
            ..self.clone()
        }
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self::new(CardRegistry::new(), AtomRegistry::new())
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("cards", &self.cards)
            .field("atoms", &self.atoms)
            .field("card_options", &self.card_options)
            .finish_non_exhaustive()
    }
}

/// Default unknown-card handler: report an internal error and keep rendering.
pub fn log_unknown_card(args: &UnknownCardArgs<'_>) {
    tracing::error!(
        severity = "error/internal",
        error_type = "InternalServerError",
        card = args.name,
        "Mobiledoc card '{}' not found.",
        args.name
    );
}

/// Default unknown-atom handler: report an internal error and keep rendering.
pub fn log_unknown_atom(args: &UnknownAtomArgs<'_>) {
    tracing::error!(
        severity = "error/internal",
        error_type = "InternalServerError",
        atom = args.name,
        "Mobiledoc atom '{}' not found.",
        args.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn test_default_card_options() {
        assert_eq!(CardOptions::default().version, 1);
    }

    #[test]
    fn test_with_card_options_leaves_base_untouched() {
        let base = RendererOptions::default();
        let v2 = base.with_card_options(CardOptions { version: 2 });

        assert_eq!(base.card_options.version, 1);
        assert_eq!(v2.card_options.version, 2);
        assert!(Arc::ptr_eq(&base.cards, &v2.cards));
    }

    #[test]
    fn test_custom_unknown_card_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = RendererOptions::default()
            .with_unknown_card_handler(move |args| sink.lock().unwrap().push(args.name.to_owned()));

        (options.unknown_card_handler)(&UnknownCardArgs {
            name: "gallery",
            payload: &Value::Null,
        });

        assert_eq!(*seen.lock().unwrap(), vec!["gallery".to_owned()]);
    }

    #[test]
    fn test_debug_omits_handlers() {
        let debug = format!("{:?}", RendererOptions::default());
        assert!(debug.starts_with("RendererOptions"));
        assert!(debug.contains("card_options"));
    }
}
