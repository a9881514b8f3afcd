use crate::errors::Result;
use crate::models::account::{
    AccountEntry, ContractType, KeyStoreEntry, MnemonicType, NewAccount, NewMasterKey,
};
use async_trait::async_trait;

/// Mnemonic handling provided by the external wallet engine.
pub trait WalletEngine: Send + Sync {
    fn validate_mnemonic(&self, phrase: &str, mnemonic_type: MnemonicType) -> Result<()>;

    fn bip39_hints(&self, prefix: &str) -> Vec<String>;
}

/// Key and account calls forwarded to the wallet backend.
#[async_trait]
pub trait KeystoreRpc: Send + Sync {
    async fn create_master_key(&self, params: NewMasterKey) -> Result<KeyStoreEntry>;

    async fn create_account(&self, params: NewAccount) -> Result<AccountEntry>;

    async fn remove_key(&self, public_key: &str) -> Result<()>;
}

#[async_trait]
pub trait AccountabilityStore: Send + Sync {
    /// Looks up wallets already deployed for `public_key` under the given
    /// contract types and adds them to the account list.
    async fn add_existing_wallets(&self, public_key: &str, contract_types: Vec<ContractType>) -> Result<()>;
}
