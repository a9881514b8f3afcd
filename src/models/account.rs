use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallet contract flavours a key can be deployed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    SafeMultisigWallet,
    SafeMultisigWallet24h,
    SetcodeMultisigWallet,
    SetcodeMultisigWallet24h,
    BridgeMultisigWallet,
    SurfWallet,
    WalletV3,
    HighloadWalletV2,
    EverWallet,
    Multisig2,
    #[serde(rename = "Multisig2_1")]
    Multisig2_1,
}

pub const DEFAULT_CONTRACT_TYPE: ContractType = ContractType::EverWallet;

/// Every contract type that is scanned for existing wallets after an import.
pub const CONTRACT_TYPES: [ContractType; 11] = [
    ContractType::SafeMultisigWallet,
    ContractType::SafeMultisigWallet24h,
    ContractType::SetcodeMultisigWallet,
    ContractType::SetcodeMultisigWallet24h,
    ContractType::BridgeMultisigWallet,
    ContractType::SurfWallet,
    ContractType::WalletV3,
    ContractType::HighloadWalletV2,
    ContractType::EverWallet,
    ContractType::Multisig2,
    ContractType::Multisig2_1,
];

impl ContractType {
    /// WalletV3 keys come from 24-word legacy phrases.
    pub fn uses_legacy_mnemonic(self) -> bool {
        self == ContractType::WalletV3
    }

    pub fn word_count(self) -> usize {
        if self.uses_legacy_mnemonic() {
            24
        } else {
            12
        }
    }

    pub fn mnemonic_type(self) -> MnemonicType {
        if self.uses_legacy_mnemonic() {
            MnemonicType::Legacy
        } else {
            MnemonicType::Labs { account_id: 0 }
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MnemonicType {
    Legacy,
    Labs {
        #[serde(rename = "accountId")]
        account_id: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMnemonic {
    pub phrase: String,
    pub mnemonic_type: MnemonicType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStoreEntry {
    pub public_key: String,
    pub master_key: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMasterKey {
    pub password: String,
    pub seed: GeneratedMnemonic,
    pub select: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub contract_type: ContractType,
    pub public_key: String,
    pub workchain: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub name: String,
    pub address: String,
    pub public_key: String,
    pub contract_type: ContractType,
}
