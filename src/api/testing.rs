//! Recording fakes shared by the view-model tests.

use crate::api::{AccountabilityStore, ConnectionRegistry, KeystoreRpc, Surface, WalletEngine};
use crate::errors::{Result, WalletError};
use crate::models::account::{
    AccountEntry, ContractType, KeyStoreEntry, MnemonicType, NewAccount, NewMasterKey,
};
use crate::models::network::{ConnectionData, NetworkConfig, NetworkMetadata, TransportType};
use crate::utils::ErrorLogger;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub fn network(id: u32, name: &str) -> NetworkConfig {
    NetworkConfig {
        connection_id: Some(id),
        transport: TransportType::Jrpc,
        name: name.to_string(),
        config: NetworkMetadata::default(),
        data: ConnectionData::Single {
            endpoint: format!("https://{}.example", name.to_lowercase()),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCall {
    CreateOrUpdate(NetworkConfig),
    Delete(u32),
    Activate(NetworkConfig),
}

#[derive(Default)]
pub struct FakeRegistry {
    pub networks: Mutex<Vec<NetworkConfig>>,
    pub active: Mutex<Option<NetworkConfig>>,
    pub calls: Mutex<Vec<RegistryCall>>,
    /// Id assigned to payloads without one.
    pub next_id: Mutex<u32>,
    /// Returned from `delete_network`.
    pub delete_fallback: Mutex<Option<NetworkConfig>>,
    pub fail_create: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_activate: AtomicBool,
}

impl FakeRegistry {
    pub fn with_active(active: NetworkConfig) -> Self {
        let registry = FakeRegistry::default();
        *registry.networks.lock().unwrap() = vec![active.clone()];
        *registry.active.lock().unwrap() = Some(active);
        *registry.next_id.lock().unwrap() = 100;
        registry
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn activations(&self) -> Vec<NetworkConfig> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RegistryCall::Activate(n) => Some(n),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ConnectionRegistry for FakeRegistry {
    fn list_networks(&self) -> Vec<NetworkConfig> {
        self.networks.lock().unwrap().clone()
    }

    fn active_network(&self) -> NetworkConfig {
        self.active.lock().unwrap().clone().expect("fake registry has no active network")
    }

    async fn create_or_update_network(&self, payload: NetworkConfig) -> Result<NetworkConfig> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::CreateOrUpdate(payload.clone()));
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(WalletError::Transport("backend rejected the network".to_string()));
        }
        let id = match payload.connection_id {
            Some(id) => id,
            None => {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                *next
            }
        };
        let stored = NetworkConfig {
            connection_id: Some(id),
            ..payload
        };
        let mut networks = self.networks.lock().unwrap();
        networks.retain(|n| n.connection_id != Some(id));
        networks.push(stored.clone());
        Ok(stored)
    }

    async fn delete_network(&self, connection_id: u32) -> Result<Option<NetworkConfig>> {
        self.calls.lock().unwrap().push(RegistryCall::Delete(connection_id));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(WalletError::Transport("delete failed".to_string()));
        }
        self.networks
            .lock()
            .unwrap()
            .retain(|n| n.connection_id != Some(connection_id));
        Ok(self.delete_fallback.lock().unwrap().clone())
    }

    async fn activate_network(&self, network: NetworkConfig) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Activate(network.clone()));
        if self.fail_activate.load(Ordering::SeqCst) {
            return Err(WalletError::Connectivity("network unreachable".to_string()));
        }
        *self.active.lock().unwrap() = Some(network);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSurface {
    pub closed: AtomicBool,
}

impl FakeSurface {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Surface for FakeSurface {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub entries: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl ErrorLogger for RecordingLogger {
    fn error(&self, context: &str, err: &WalletError) {
        self.entries.lock().unwrap().push(format!("{}: {}", context, err));
    }
}

/// Accepts any phrase whose word count matches the mnemonic type.
#[derive(Default)]
pub struct FakeEngine;

impl WalletEngine for FakeEngine {
    fn validate_mnemonic(&self, phrase: &str, mnemonic_type: MnemonicType) -> Result<()> {
        let expected = match mnemonic_type {
            MnemonicType::Legacy => 24,
            MnemonicType::Labs { .. } => 12,
        };
        let words = phrase.split(' ').filter(|w| !w.is_empty()).count();
        if words == expected {
            Ok(())
        } else {
            Err(WalletError::Mnemonic(format!("Expected {} words, got {}", expected, words)))
        }
    }

    fn bip39_hints(&self, prefix: &str) -> Vec<String> {
        ["abandon", "ability", "able", "about", "zoo"]
            .iter()
            .filter(|w| w.starts_with(prefix))
            .map(|w| w.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeystoreCall {
    CreateMasterKey(NewMasterKey),
    CreateAccount(NewAccount),
    RemoveKey(String),
    AddExistingWallets(String, Vec<ContractType>),
}

#[derive(Default)]
pub struct FakeKeystore {
    pub calls: Mutex<Vec<KeystoreCall>>,
    pub fail_create_key: AtomicBool,
    pub fail_create_account: AtomicBool,
    pub fail_remove_key: AtomicBool,
    pub fail_add_existing: AtomicBool,
}

impl FakeKeystore {
    pub fn calls(&self) -> Vec<KeystoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

pub const FAKE_PUBLIC_KEY: &str = "a1b2c3";

#[async_trait]
impl KeystoreRpc for FakeKeystore {
    async fn create_master_key(&self, params: NewMasterKey) -> Result<KeyStoreEntry> {
        self.calls
            .lock()
            .unwrap()
            .push(KeystoreCall::CreateMasterKey(params));
        if self.fail_create_key.load(Ordering::SeqCst) {
            return Err(WalletError::Keystore("Invalid password".to_string()));
        }
        Ok(KeyStoreEntry {
            public_key: FAKE_PUBLIC_KEY.to_string(),
            master_key: FAKE_PUBLIC_KEY.to_string(),
            name: None,
        })
    }

    async fn create_account(&self, params: NewAccount) -> Result<AccountEntry> {
        self.calls
            .lock()
            .unwrap()
            .push(KeystoreCall::CreateAccount(params.clone()));
        if self.fail_create_account.load(Ordering::SeqCst) {
            return Err(WalletError::Keystore("Account already exists".to_string()));
        }
        Ok(AccountEntry {
            name: params.name,
            address: "0:deadbeef".to_string(),
            public_key: params.public_key,
            contract_type: params.contract_type,
        })
    }

    async fn remove_key(&self, public_key: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(KeystoreCall::RemoveKey(public_key.to_string()));
        if self.fail_remove_key.load(Ordering::SeqCst) {
            return Err(WalletError::Keystore("Key is locked".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountabilityStore for FakeKeystore {
    async fn add_existing_wallets(&self, public_key: &str, contract_types: Vec<ContractType>) -> Result<()> {
        self.calls.lock().unwrap().push(KeystoreCall::AddExistingWallets(
            public_key.to_string(),
            contract_types,
        ));
        if self.fail_add_existing.load(Ordering::SeqCst) {
            return Err(WalletError::Transport("explorer unavailable".to_string()));
        }
        Ok(())
    }
}
