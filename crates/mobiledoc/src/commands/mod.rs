//! CLI command implementations.

pub(crate) mod cards;
pub(crate) mod render;

pub(crate) use cards::CardsArgs;
pub(crate) use render::RenderArgs;

use mobiledoc_cards::{default_atoms, default_cards};
use mobiledoc_config::Config;
use mobiledoc_renderer::{AtomRegistry, CardRegistry};

use crate::output::Output;

/// Built-in registries with the names disabled in `config` removed.
pub(crate) fn configured_registries(
    config: &Config,
    output: &Output,
) -> (CardRegistry, AtomRegistry) {
    let mut cards = default_cards();
    for name in &config.cards.disabled {
        if cards.remove(name).is_none() {
            output.warning(&format!("Warning: disabled card '{name}' is not a built-in card"));
        }
    }

    let mut atoms = default_atoms();
    for name in &config.atoms.disabled {
        if atoms.remove(name).is_none() {
            output.warning(&format!("Warning: disabled atom '{name}' is not a built-in atom"));
        }
    }

    (cards, atoms)
}
