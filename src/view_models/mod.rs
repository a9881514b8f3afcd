//! Popup screen state. Each view-model owns its screen's state, talks to
//! injected collaborators, and publishes a snapshot after every change.

pub mod import_account;
pub mod network_settings;

pub use import_account::{ImportAccountState, ImportAccountViewModel, ImportOutcome, ImportStep};
pub use network_settings::{
    NetworkSettingsState, NetworkSettingsViewModel, Step, UpdateKind, UpdateResult,
};
