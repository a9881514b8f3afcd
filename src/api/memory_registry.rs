use crate::api::connection::ConnectionRegistry;
use crate::errors::{Result, WalletError};
use crate::models::network::{
    ConnectionData, NetworkConfig, NetworkMetadata, TransportType, DEFAULT_LATENCY_DETECTION_INTERVAL_MS,
    DEFAULT_MAX_LATENCY_MS,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Network selected on first start and after the active custom network is deleted.
pub const DEFAULT_NETWORK_ID: u32 = 1;

/// Ids below this are reserved for built-in networks.
pub const CUSTOM_ID_START: u32 = 1000;

/// Built-in networks. These can be edited but never removed; deleting one
/// restores its definition from here.
pub fn default_networks() -> Vec<NetworkConfig> {
    vec![
        mainnet_jrpc(),
        NetworkConfig {
            connection_id: Some(2),
            transport: TransportType::Graphql,
            name: "Mainnet (GQL)".to_string(),
            config: NetworkMetadata {
                symbol: Some("EVER".to_string()),
                tokens_manifest_url: None,
                explorer_base_url: Some("https://everscan.io".to_string()),
            },
            data: ConnectionData::Multi {
                endpoints: vec!["https://mainnet.evercloud.dev/graphql".to_string()],
                local: false,
                latency_detection_interval: DEFAULT_LATENCY_DETECTION_INTERVAL_MS,
                max_latency: DEFAULT_MAX_LATENCY_MS,
            },
        },
        NetworkConfig {
            connection_id: Some(3),
            transport: TransportType::Proto,
            name: "Testnet".to_string(),
            config: NetworkMetadata {
                symbol: Some("EVER".to_string()),
                tokens_manifest_url: None,
                explorer_base_url: Some("https://testnet.everscan.io".to_string()),
            },
            data: ConnectionData::Single {
                endpoint: "https://jrpc-testnet.everwallet.net/proto".to_string(),
            },
        },
    ]
}

fn mainnet_jrpc() -> NetworkConfig {
    NetworkConfig {
        connection_id: Some(DEFAULT_NETWORK_ID),
        transport: TransportType::Jrpc,
        name: "Mainnet (JRPC)".to_string(),
        config: NetworkMetadata {
            symbol: Some("EVER".to_string()),
            tokens_manifest_url: Some(
                "https://raw.githubusercontent.com/broxus/ton-assets/master/manifest.json".to_string(),
            ),
            explorer_base_url: Some("https://everscan.io".to_string()),
        },
        data: ConnectionData::Single {
            endpoint: "https://jrpc.everwallet.net/rpc".to_string(),
        },
    }
}

fn default_for(id: u32) -> Option<NetworkConfig> {
    default_networks().into_iter().find(|n| n.connection_id == Some(id))
}

/// On-disk form of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub networks: Vec<NetworkConfig>,
    pub selected_id: u32,
}

#[derive(Debug)]
struct RegistryState {
    networks: BTreeMap<u32, NetworkConfig>,
    selected_id: u32,
    next_custom_id: u32,
}

/// Reference `ConnectionRegistry` kept in memory, optionally persisted as a
/// JSON snapshot.
#[derive(Debug)]
pub struct MemoryRegistry {
    inner: Mutex<RegistryState>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        let networks = default_networks()
            .into_iter()
            .filter_map(|n| n.connection_id.map(|id| (id, n)))
            .collect();
        MemoryRegistry {
            inner: Mutex::new(RegistryState {
                networks,
                selected_id: DEFAULT_NETWORK_ID,
                next_custom_id: CUSTOM_ID_START,
            }),
        }
    }
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a snapshot. Built-in networks missing from the
    /// snapshot are added back.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut networks = BTreeMap::new();
        for network in default_networks() {
            if let Some(id) = network.connection_id {
                networks.insert(id, network);
            }
        }
        for network in snapshot.networks {
            let id = network.connection_id.ok_or_else(|| {
                WalletError::Validation(format!("Stored network '{}' has no connection id", network.name))
            })?;
            validate_network(&network)?;
            networks.insert(id, network);
        }
        if !networks.contains_key(&snapshot.selected_id) {
            return Err(WalletError::NotFound(format!(
                "Selected network {} is not in the snapshot",
                snapshot.selected_id
            )));
        }
        let next_custom_id = networks
            .keys()
            .next_back()
            .map(|max| {
                max.checked_add(1).map(|next| next.max(CUSTOM_ID_START)).ok_or_else(|| {
                    WalletError::Validation(format!("Stored network id {} leaves no room for new networks", max))
                })
            })
            .transpose()?
            .unwrap_or(CUSTOM_ID_START);

        Ok(MemoryRegistry {
            inner: Mutex::new(RegistryState {
                networks,
                selected_id: snapshot.selected_id,
                next_custom_id,
            }),
        })
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state();
        RegistrySnapshot {
            networks: state.networks.values().cloned().collect(),
            selected_id: state.selected_id,
        }
    }

    /// Loads the snapshot file, or the built-in defaults if it does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Registry file '{}' not found. Starting from built-in networks.", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&contents)?;
        info!(
            "Loaded {} network(s) from {}",
            snapshot.networks.len(),
            path.display()
        );
        Self::from_snapshot(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json_string = serde_json::to_string_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json_string)?;
        debug!("Saved registry snapshot to {}", path.display());
        Ok(())
    }

    pub fn is_default(&self, connection_id: u32) -> bool {
        default_for(connection_id).is_some()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn validate_network(network: &NetworkConfig) -> Result<()> {
    if network.name.trim().is_empty() {
        return Err(WalletError::Validation("Network name is required".to_string()));
    }
    if !network.data.matches(network.transport) {
        return Err(WalletError::Validation(format!(
            "Connection data does not match transport type '{}'",
            network.transport
        )));
    }
    let endpoints = network.data.endpoints();
    if endpoints.is_empty() || endpoints.iter().any(|e| e.trim().is_empty()) {
        return Err(WalletError::Validation("Endpoints must not be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ConnectionRegistry for MemoryRegistry {
    fn list_networks(&self) -> Vec<NetworkConfig> {
        self.state().networks.values().cloned().collect()
    }

    fn active_network(&self) -> NetworkConfig {
        let state = self.state();
        state
            .networks
            .get(&state.selected_id)
            .cloned()
            .unwrap_or_else(mainnet_jrpc)
    }

    async fn create_or_update_network(&self, payload: NetworkConfig) -> Result<NetworkConfig> {
        validate_network(&payload)?;
        let mut state = self.state();

        let id = match payload.connection_id {
            Some(id) => {
                if !state.networks.contains_key(&id) {
                    return Err(WalletError::NotFound(format!("Network {} does not exist", id)));
                }
                id
            }
            None => {
                let id = state.next_custom_id;
                state.next_custom_id = id
                    .checked_add(1)
                    .ok_or_else(|| WalletError::Validation("No network ids left".to_string()))?;
                id
            }
        };

        let stored = NetworkConfig {
            connection_id: Some(id),
            ..payload
        };
        state.networks.insert(id, stored.clone());
        info!("Stored network {} ('{}')", id, stored.name);
        Ok(stored)
    }

    async fn delete_network(&self, connection_id: u32) -> Result<Option<NetworkConfig>> {
        let mut state = self.state();
        if !state.networks.contains_key(&connection_id) {
            return Err(WalletError::NotFound(format!("Network {} does not exist", connection_id)));
        }

        match default_for(connection_id) {
            Some(original) => {
                info!("Resetting built-in network {} to its default definition", connection_id);
                state.networks.insert(connection_id, original);
            }
            None => {
                info!("Deleting custom network {}", connection_id);
                state.networks.remove(&connection_id);
            }
        }

        if state.selected_id != connection_id {
            return Ok(None);
        }

        let fallback_id = if state.networks.contains_key(&connection_id) {
            connection_id
        } else {
            warn!(
                "Deleted network {} was active; falling back to network {}",
                connection_id, DEFAULT_NETWORK_ID
            );
            DEFAULT_NETWORK_ID
        };
        state.selected_id = fallback_id;
        Ok(state.networks.get(&fallback_id).cloned())
    }

    async fn activate_network(&self, network: NetworkConfig) -> Result<()> {
        let mut state = self.state();
        let id = network
            .connection_id
            .filter(|id| state.networks.contains_key(id))
            .ok_or_else(|| WalletError::Connectivity(format!("Network '{}' is not configured", network.name)))?;
        state.selected_id = id;
        info!("Switched active network to {} ('{}')", id, network.name);
        Ok(())
    }
}
