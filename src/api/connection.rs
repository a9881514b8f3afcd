use crate::errors::Result;
use crate::models::network::NetworkConfig;
use async_trait::async_trait;

/// Durable list of network configurations plus the currently selected one.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// All configured networks, defaults and custom ones.
    fn list_networks(&self) -> Vec<NetworkConfig>;

    /// The network used for live connections.
    fn active_network(&self) -> NetworkConfig;

    /// Creates a record when `payload.connection_id` is `None`, otherwise
    /// replaces the record with that id. Returns the stored network.
    async fn create_or_update_network(&self, payload: NetworkConfig) -> Result<NetworkConfig>;

    /// Deletes (or resets) a network. When the deleted network was active the
    /// registry falls back to a default network and returns it.
    async fn delete_network(&self, connection_id: u32) -> Result<Option<NetworkConfig>>;

    /// Makes `network` the active one. Fails with a connectivity error when
    /// the network cannot be reached.
    async fn activate_network(&self, network: NetworkConfig) -> Result<()>;
}
