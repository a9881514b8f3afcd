//! Collaborators the popup workflows talk to. Everything here is injected as
//! `Arc<dyn Trait>` so view-models can be driven by fakes in tests.

pub mod connection;
pub mod keystore;
pub mod memory_registry;
#[cfg(test)]
pub(crate) mod testing;

pub use connection::*;
pub use keystore::*;
pub use memory_registry::{MemoryRegistry, RegistrySnapshot};

/// The window hosting a workflow. Closing it ends the workflow for good.
pub trait Surface: Send + Sync {
    fn close(&self);
}

/// Surface for hosts that have no window to close (CLI, tests).
#[derive(Debug, Default)]
pub struct DetachedSurface;

impl Surface for DetachedSurface {
    fn close(&self) {
        log::debug!("Close requested on a detached surface; nothing to do.");
    }
}
