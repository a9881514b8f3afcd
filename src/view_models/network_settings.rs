use crate::api::{ConnectionRegistry, Surface};
use crate::errors::Result;
use crate::models::network::{NetworkConfig, NetworkFormValue};
use crate::utils::{BackgroundTasks, ErrorLogger};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

const SWITCH_FAILED: &str = "Failed to switch network";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Settings,
    Edit,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Add,
    Update,
}

/// Outcome of the last successful submit, shown on the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub kind: UpdateKind,
    pub network: NetworkConfig,
}

/// Everything the settings screens render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSettingsState {
    pub step: Step,
    /// Network on the edit screen; `None` while adding a new one.
    pub network: Option<NetworkConfig>,
    pub result: Option<UpdateResult>,
    /// "Network deleted, undo?" banner.
    pub notification_visible: bool,
}

/// View-model behind the custom network settings screens: list, add/edit
/// form, result page, and the undo banner after a delete.
pub struct NetworkSettingsViewModel {
    state: NetworkSettingsState,
    registry: Arc<dyn ConnectionRegistry>,
    surface: Arc<dyn Surface>,
    tasks: BackgroundTasks,
    updates: watch::Sender<NetworkSettingsState>,
    /// Set by a successful delete, consumed by undo.
    last_deleted: Option<NetworkConfig>,
}

impl NetworkSettingsViewModel {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        surface: Arc<dyn Surface>,
        logger: Arc<dyn ErrorLogger>,
    ) -> Self {
        let state = NetworkSettingsState::default();
        let (updates, _) = watch::channel(state.clone());
        NetworkSettingsViewModel {
            state,
            registry,
            surface,
            tasks: BackgroundTasks::new(logger),
            updates,
            last_deleted: None,
        }
    }

    pub fn snapshot(&self) -> NetworkSettingsState {
        self.state.clone()
    }

    /// Receives one snapshot per completed state change.
    pub fn subscribe(&self) -> watch::Receiver<NetworkSettingsState> {
        self.updates.subscribe()
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn network(&self) -> Option<&NetworkConfig> {
        self.state.network.as_ref()
    }

    pub fn result(&self) -> Option<&UpdateResult> {
        self.state.result.as_ref()
    }

    pub fn notification_visible(&self) -> bool {
        self.state.notification_visible
    }

    pub fn networks(&self) -> Vec<NetworkConfig> {
        self.registry.list_networks()
    }

    pub fn selected_connection(&self) -> NetworkConfig {
        self.registry.active_network()
    }

    /// The network in use can be neither deleted nor switched to.
    pub fn can_delete_or_switch(&self) -> bool {
        match &self.state.network {
            Some(network) => network.connection_id != self.selected_connection().connection_id,
            None => false,
        }
    }

    pub fn start_edit(&mut self, network: NetworkConfig) {
        debug!("Editing network {:?} ('{}')", network.connection_id, network.name);
        self.state.network = Some(network);
        self.state.step = Step::Edit;
        self.publish();
    }

    pub fn start_add(&mut self) {
        self.state.network = None;
        self.state.step = Step::Edit;
        self.publish();
    }

    /// Saves the form as a new network or over the one being edited.
    ///
    /// Validation and registry failures are returned untouched for the form
    /// to display; state only changes once the registry has stored the
    /// network.
    pub async fn submit(&mut self, value: &NetworkFormValue) -> Result<()> {
        let connection_id = self.state.network.as_ref().and_then(|n| n.connection_id);
        let update = value.to_payload(connection_id)?;

        let network = self.registry.create_or_update_network(update).await?;
        info!("Saved network {:?} ('{}')", network.connection_id, network.name);

        if network.same_id(&self.selected_connection()) {
            self.switch_in_background(network.clone());
        }

        let kind = if self.state.network.is_some() {
            UpdateKind::Update
        } else {
            UpdateKind::Add
        };
        self.state.result = Some(UpdateResult { kind, network });
        self.state.step = Step::Result;
        self.publish();
        Ok(())
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        if let Some(id) = self.pending_id() {
            self.registry.delete_network(id).await?;
            info!("Deleted network {}", id);
            self.last_deleted = self.state.network.clone();
        }

        self.state.notification_visible = true;
        self.state.step = Step::Settings;
        self.publish();
        Ok(())
    }

    /// Deletes a custom network or restores a built-in one. If the registry
    /// fell back to another network that is now active, it gets reconnected.
    pub async fn reset_to_default(&mut self) -> Result<()> {
        if let Some(id) = self.pending_id() {
            let fallback = self.registry.delete_network(id).await?;

            if let Some(fallback) = fallback {
                if fallback.same_id(&self.selected_connection()) {
                    self.switch_in_background(fallback);
                }
            }
        }

        self.state.step = Step::Settings;
        self.publish();
        Ok(())
    }

    /// Keeps the edited network so the form can be reopened as it was.
    pub fn back(&mut self) {
        self.state.step = Step::Settings;
        self.publish();
    }

    /// Leaves the result screen and closes the window. Returns the pending
    /// background work so the host can wait for it before exiting.
    pub fn close_and_maybe_switch(mut self, should_switch: bool) -> BackgroundTasks {
        if should_switch {
            match self.state.result.take() {
                Some(result) => self.switch_in_background(result.network),
                None => warn!("Switch requested on close but no network was saved"),
            }
        }

        self.surface.close();
        self.tasks
    }

    /// Re-creates the network deleted last, as a new record, at most once per
    /// delete. Step, result and the active selection are left alone.
    pub async fn undo_delete(&mut self) -> Result<()> {
        self.dismiss_notification();

        if let Some(network) = self.last_deleted.take() {
            let update = network.as_new_record();
            let restored = self.registry.create_or_update_network(update).await?;
            info!(
                "Restored deleted network '{}' as {:?}",
                restored.name, restored.connection_id
            );
        }
        Ok(())
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification_visible = false;
        self.publish();
    }

    pub fn raise_notification(&mut self) {
        self.state.notification_visible = true;
        self.publish();
    }

    /// Waits for reconnects spawned so far.
    pub async fn settle(&mut self) {
        self.tasks.settle().await;
    }

    fn pending_id(&self) -> Option<u32> {
        self.state.network.as_ref().and_then(|n| n.connection_id)
    }

    fn switch_in_background(&mut self, network: NetworkConfig) {
        let registry = Arc::clone(&self.registry);
        self.tasks.spawn_logged(SWITCH_FAILED, async move {
            registry.activate_network(network).await
        });
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}
