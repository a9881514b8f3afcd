use crate::errors::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Failover tuning used for every multi-endpoint network created from the form.
/// Neither value is user-configurable in the settings flow.
pub const DEFAULT_LATENCY_DETECTION_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_MAX_LATENCY_MS: u64 = 60_000;

/// Transport used to reach a network's backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Jrpc,
    Proto,
    /// Multi-endpoint transport with latency based failover.
    Graphql,
}

impl TransportType {
    pub fn is_multi_endpoint(self) -> bool {
        matches!(self, TransportType::Graphql)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportType::Jrpc => "jrpc",
            TransportType::Proto => "proto",
            TransportType::Graphql => "graphql",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportType {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jrpc" => Ok(TransportType::Jrpc),
            "proto" => Ok(TransportType::Proto),
            "graphql" => Ok(TransportType::Graphql),
            other => Err(WalletError::Validation(format!("Unknown transport type: {}", other))),
        }
    }
}

/// Type-specific connection data. Exactly one shape is populated, chosen by
/// the network's transport type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionData {
    Single {
        endpoint: String,
    },
    #[serde(rename_all = "camelCase")]
    Multi {
        endpoints: Vec<String>,
        local: bool,
        latency_detection_interval: u64,
        max_latency: u64,
    },
}

impl ConnectionData {
    pub fn matches(&self, transport: TransportType) -> bool {
        match self {
            ConnectionData::Single { .. } => !transport.is_multi_endpoint(),
            ConnectionData::Multi { .. } => transport.is_multi_endpoint(),
        }
    }

    pub fn endpoints(&self) -> Vec<&str> {
        match self {
            ConnectionData::Single { endpoint } => vec![endpoint.as_str()],
            ConnectionData::Multi { endpoints, .. } => endpoints.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_manifest_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_base_url: Option<String>,
}

/// One configured network. `connection_id` is `None` only for a payload that
/// asks the registry to create a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<u32>,
    #[serde(rename = "type")]
    pub transport: TransportType,
    pub name: String,
    #[serde(default)]
    pub config: NetworkMetadata,
    pub data: ConnectionData,
}

impl NetworkConfig {
    /// Same network with its identifier cleared, so the registry stores it as
    /// a brand new record.
    pub fn as_new_record(&self) -> NetworkConfig {
        NetworkConfig {
            connection_id: None,
            ..self.clone()
        }
    }

    pub fn same_id(&self, other: &NetworkConfig) -> bool {
        self.connection_id.is_some() && self.connection_id == other.connection_id
    }
}

/// Raw values of the network form. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFormValue {
    pub transport: TransportType,
    pub name: String,
    pub endpoints: Vec<String>,
    pub local: bool,
    pub symbol: String,
    pub tokens_manifest_url: String,
    pub explorer_base_url: String,
}

impl NetworkFormValue {
    pub fn new(transport: TransportType, name: impl Into<String>, endpoints: Vec<String>) -> Self {
        NetworkFormValue {
            transport,
            name: name.into(),
            endpoints,
            local: false,
            symbol: String::new(),
            tokens_manifest_url: String::new(),
            explorer_base_url: String::new(),
        }
    }

    /// Prefills the form from an existing network, the way the edit screen does.
    pub fn from_network(network: &NetworkConfig) -> Self {
        let local = matches!(network.data, ConnectionData::Multi { local: true, .. });
        NetworkFormValue {
            transport: network.transport,
            name: network.name.clone(),
            endpoints: network.data.endpoints().into_iter().map(str::to_string).collect(),
            local,
            symbol: network.config.symbol.clone().unwrap_or_default(),
            tokens_manifest_url: network.config.tokens_manifest_url.clone().unwrap_or_default(),
            explorer_base_url: network.config.explorer_base_url.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WalletError::Validation("Network name is required".to_string()));
        }
        if self.endpoints.is_empty() {
            return Err(WalletError::Validation("At least one endpoint is required".to_string()));
        }
        for endpoint in &self.endpoints {
            Url::parse(endpoint)
                .map_err(|e| WalletError::Validation(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        }
        for (label, value) in [
            ("tokens manifest URL", &self.tokens_manifest_url),
            ("explorer URL", &self.explorer_base_url),
        ] {
            if !value.is_empty() {
                Url::parse(value)
                    .map_err(|e| WalletError::Validation(format!("Invalid {} '{}': {}", label, value, e)))?;
            }
        }
        Ok(())
    }

    /// Builds the create-or-update payload. `connection_id` comes from the
    /// network being edited; `None` asks for a new record.
    pub fn to_payload(&self, connection_id: Option<u32>) -> Result<NetworkConfig> {
        self.validate()?;

        let data = if self.transport.is_multi_endpoint() {
            ConnectionData::Multi {
                endpoints: self.endpoints.clone(),
                local: self.local,
                latency_detection_interval: DEFAULT_LATENCY_DETECTION_INTERVAL_MS,
                max_latency: DEFAULT_MAX_LATENCY_MS,
            }
        } else {
            ConnectionData::Single {
                endpoint: self.endpoints[0].clone(),
            }
        };

        Ok(NetworkConfig {
            connection_id,
            transport: self.transport,
            name: self.name.clone(),
            config: NetworkMetadata {
                symbol: non_empty(&self.symbol),
                tokens_manifest_url: non_empty(&self.tokens_manifest_url),
                explorer_base_url: non_empty(&self.explorer_base_url),
            },
            data,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
