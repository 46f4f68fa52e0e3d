//! Scoped authorization window.
//!
//! Activation is only accepted from the commander that currently holds the
//! window. The window is a guard: it grants on creation and restores the
//! previous holder when dropped, so it closes on every exit path, including
//! early returns through `?`.

use std::ops::{Deref, DerefMut};

use depot_domain::id::CommanderId;

use crate::world::World;

/// Guard holding a world's authorization for one commander.
///
/// Derefs to the [`World`] so activations can be issued while it is open.
pub struct AuthorizationWindow<'w> {
    world: &'w mut World,
    previous: Option<CommanderId>,
}

impl<'w> AuthorizationWindow<'w> {
    pub(crate) fn open(world: &'w mut World, commander: CommanderId) -> Self {
        let previous = world.authority_mut().grant(commander);
        tracing::trace!(%commander, "authorization window opened");
        Self { world, previous }
    }
}

impl Deref for AuthorizationWindow<'_> {
    type Target = World;

    fn deref(&self) -> &Self::Target {
        self.world
    }
}

impl DerefMut for AuthorizationWindow<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.world
    }
}

impl Drop for AuthorizationWindow<'_> {
    fn drop(&mut self) {
        self.world.authority_mut().restore(self.previous);
        tracing::trace!("authorization window closed");
    }
}
