use crate::api::{AccountabilityStore, KeystoreRpc, Surface, WalletEngine};
use crate::errors::{Result, WalletError};
use crate::models::account::{
    ContractType, GeneratedMnemonic, KeyStoreEntry, NewAccount, NewMasterKey, CONTRACT_TYPES,
    DEFAULT_CONTRACT_TYPE,
};
use crate::utils::ErrorLogger;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportStep {
    #[default]
    SelectContractType,
    EnterPhrase,
    EnterPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAccountState {
    pub step: ImportStep,
    pub contract_type: ContractType,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ImportAccountState {
    fn default() -> Self {
        ImportAccountState {
            step: ImportStep::default(),
            contract_type: DEFAULT_CONTRACT_TYPE,
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Key and account created, window closed.
    Completed,
    /// Error stored in the state for display.
    Failed,
}

pub struct ImportAccountViewModel {
    state: ImportAccountState,
    seed: Option<GeneratedMnemonic>,
    engine: Arc<dyn WalletEngine>,
    keystore: Arc<dyn KeystoreRpc>,
    accountability: Arc<dyn AccountabilityStore>,
    surface: Arc<dyn Surface>,
    logger: Arc<dyn ErrorLogger>,
    updates: watch::Sender<ImportAccountState>,
}

impl ImportAccountViewModel {
    pub fn new(
        engine: Arc<dyn WalletEngine>,
        keystore: Arc<dyn KeystoreRpc>,
        accountability: Arc<dyn AccountabilityStore>,
        surface: Arc<dyn Surface>,
        logger: Arc<dyn ErrorLogger>,
    ) -> Self {
        let state = ImportAccountState::default();
        let (updates, _) = watch::channel(state.clone());
        ImportAccountViewModel {
            state,
            seed: None,
            engine,
            keystore,
            accountability,
            surface,
            logger,
            updates,
        }
    }

    pub fn snapshot(&self) -> ImportAccountState {
        self.state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ImportAccountState> {
        self.updates.subscribe()
    }

    pub fn word_count(&self) -> usize {
        self.state.contract_type.word_count()
    }

    pub fn set_contract_type(&mut self, contract_type: ContractType) {
        self.state.contract_type = contract_type;
        self.state.step = ImportStep::EnterPhrase;
        self.publish();
    }

    pub fn reset_error(&mut self) {
        self.state.error = None;
        self.publish();
    }

    /// Checks the phrase with the wallet engine. A valid phrase moves on to
    /// the password step; an invalid one is reported through `error`.
    pub fn submit_seed(&mut self, words: &[String]) {
        let phrase = words.join(" ");
        let mnemonic_type = self.state.contract_type.mnemonic_type();

        match self.engine.validate_mnemonic(&phrase, mnemonic_type) {
            Ok(()) => {
                self.seed = Some(GeneratedMnemonic { phrase, mnemonic_type });
                self.state.step = ImportStep::EnterPassword;
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
            }
        }
        self.publish();
    }

    /// Creates the master key and the account, then scans the other contract
    /// types for wallets that already exist. If anything fails after the key
    /// was created, the key is removed again on a best-effort basis.
    pub async fn submit(&mut self, name: &str, password: &str) -> ImportOutcome {
        self.state.loading = true;
        self.publish();

        let mut created_key: Option<KeyStoreEntry> = None;
        let outcome = match self.import(name, password, &mut created_key).await {
            Ok(()) => {
                info!("Imported account '{}' ({})", name, self.state.contract_type);
                self.surface.close();
                ImportOutcome::Completed
            }
            Err(e) => {
                warn!("Account import failed: {}", e);
                if let Some(key) = created_key {
                    if let Err(remove_err) = self.keystore.remove_key(&key.public_key).await {
                        self.logger.error("Failed to remove key after import error", &remove_err);
                    }
                }
                self.state.error = Some(e.user_message());
                ImportOutcome::Failed
            }
        };

        self.state.loading = false;
        self.publish();
        outcome
    }

    pub fn bip39_hints(&self, prefix: &str) -> Vec<String> {
        self.engine.bip39_hints(prefix)
    }

    async fn import(&self, name: &str, password: &str, created_key: &mut Option<KeyStoreEntry>) -> Result<()> {
        let seed = self
            .seed
            .clone()
            .ok_or_else(|| WalletError::Validation("Seed must be specified".to_string()))?;

        let key = self
            .keystore
            .create_master_key(NewMasterKey {
                password: password.to_string(),
                seed,
                select: true,
            })
            .await?;
        let public_key = key.public_key.clone();
        *created_key = Some(key);

        let contract_type = self.state.contract_type;
        self.keystore
            .create_account(NewAccount {
                name: name.to_string(),
                contract_type,
                public_key: public_key.clone(),
                workchain: 0,
            })
            .await?;

        let others: Vec<ContractType> = CONTRACT_TYPES
            .iter()
            .copied()
            .filter(|t| *t != contract_type)
            .collect();
        self.accountability.add_existing_wallets(&public_key, others).await
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{
        FakeEngine, FakeKeystore, FakeSurface, KeystoreCall, RecordingLogger, FAKE_PUBLIC_KEY,
    };
    use crate::models::account::MnemonicType;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    struct Harness {
        vm: ImportAccountViewModel,
        keystore: Arc<FakeKeystore>,
        surface: Arc<FakeSurface>,
        logger: Arc<RecordingLogger>,
    }

    fn harness() -> Harness {
        let keystore = Arc::new(FakeKeystore::default());
        let surface = Arc::new(FakeSurface::default());
        let logger = Arc::new(RecordingLogger::default());
        let vm = ImportAccountViewModel::new(
            Arc::new(FakeEngine),
            keystore.clone(),
            keystore.clone(),
            surface.clone(),
            logger.clone(),
        );
        Harness {
            vm,
            keystore,
            surface,
            logger,
        }
    }

    fn words(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("word{}", i)).collect()
    }

    #[test]
    fn wallet_v3_needs_24_words() {
        let mut h = harness();
        assert_eq!(h.vm.word_count(), 12);
        h.vm.set_contract_type(ContractType::WalletV3);
        assert_eq!(h.vm.word_count(), 24);
        assert_eq!(h.vm.snapshot().step, ImportStep::EnterPhrase);
    }

    #[test]
    fn valid_seed_moves_to_password_step() {
        let mut h = harness();
        h.vm.set_contract_type(ContractType::WalletV3);
        h.vm.submit_seed(&words(24));
        let state = h.vm.snapshot();
        assert_eq!(state.step, ImportStep::EnterPassword);
        assert_eq!(state.error, None);
        assert_eq!(
            h.vm.seed.as_ref().map(|s| s.mnemonic_type),
            Some(MnemonicType::Legacy)
        );
    }

    #[test]
    fn invalid_seed_sets_error_and_stays() {
        let mut h = harness();
        h.vm.set_contract_type(ContractType::EverWallet);
        h.vm.submit_seed(&words(11));
        let state = h.vm.snapshot();
        assert_eq!(state.step, ImportStep::EnterPhrase);
        assert_eq!(state.error.as_deref(), Some("Expected 12 words, got 11"));

        h.vm.reset_error();
        assert_eq!(h.vm.snapshot().error, None);
    }

    #[tokio::test]
    async fn submit_creates_key_and_account_then_closes() {
        let mut h = harness();
        h.vm.set_contract_type(ContractType::EverWallet);
        h.vm.submit_seed(&words(12));

        let outcome = h.vm.submit("Main", "secret").await;
        assert_eq!(outcome, ImportOutcome::Completed);
        assert!(h.surface.is_closed());
        assert!(!h.vm.snapshot().loading);

        let calls = h.keystore.calls();
        assert_eq!(calls.len(), 3);
        match &calls[0] {
            KeystoreCall::CreateMasterKey(params) => {
                assert!(params.select);
                assert_eq!(params.seed.mnemonic_type, MnemonicType::Labs { account_id: 0 });
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(
            calls[1],
            KeystoreCall::CreateAccount(NewAccount {
                name: "Main".to_string(),
                contract_type: ContractType::EverWallet,
                public_key: FAKE_PUBLIC_KEY.to_string(),
                workchain: 0,
            })
        );
        match &calls[2] {
            KeystoreCall::AddExistingWallets(key, types) => {
                assert_eq!(key, FAKE_PUBLIC_KEY);
                assert_eq!(types.len(), CONTRACT_TYPES.len() - 1);
                assert!(!types.contains(&ContractType::EverWallet));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn submit_without_seed_fails_before_any_call() {
        let mut h = harness();
        let outcome = h.vm.submit("Main", "secret").await;
        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(h.vm.snapshot().error.as_deref(), Some("Seed must be specified"));
        assert!(h.keystore.calls().is_empty());
        assert!(!h.surface.is_closed());
    }

    #[tokio::test]
    async fn failure_after_key_creation_removes_the_key() {
        let mut h = harness();
        h.vm.submit_seed(&words(12));
        h.keystore.fail_create_account.store(true, Ordering::SeqCst);

        let outcome = h.vm.submit("Main", "secret").await;
        assert_eq!(outcome, ImportOutcome::Failed);
        assert_eq!(
            h.keystore.calls().last(),
            Some(&KeystoreCall::RemoveKey(FAKE_PUBLIC_KEY.to_string()))
        );
        let state = h.vm.snapshot();
        assert_eq!(state.error.as_deref(), Some("Account already exists"));
        assert!(!state.loading);
        assert!(!h.surface.is_closed());
    }

    #[tokio::test]
    async fn failed_key_creation_has_nothing_to_remove() {
        let mut h = harness();
        h.vm.submit_seed(&words(12));
        h.keystore.fail_create_key.store(true, Ordering::SeqCst);

        h.vm.submit("Main", "wrong").await;
        assert_eq!(h.keystore.calls().len(), 1);
        assert_eq!(h.vm.snapshot().error.as_deref(), Some("Invalid password"));
    }

    #[tokio::test]
    async fn removal_failure_is_logged_and_original_error_shown() {
        let mut h = harness();
        h.vm.submit_seed(&words(12));
        h.keystore.fail_add_existing.store(true, Ordering::SeqCst);
        h.keystore.fail_remove_key.store(true, Ordering::SeqCst);

        h.vm.submit("Main", "secret").await;
        assert_eq!(h.vm.snapshot().error.as_deref(), Some("explorer unavailable"));
        assert_eq!(
            h.logger.entries(),
            vec!["Failed to remove key after import error: Keystore error: Key is locked".to_string()]
        );
    }

    #[test]
    fn hints_come_from_the_engine() {
        let h = harness();
        assert_eq!(h.vm.bip39_hints("ab"), vec!["abandon", "ability", "able", "about"]);
    }

    #[tokio::test]
    async fn loading_is_cleared_after_submit() {
        let mut h = harness();
        h.vm.submit_seed(&words(12));
        let rx = h.vm.subscribe();
        h.vm.submit("Main", "secret").await;
        assert!(!rx.borrow().loading);
    }
}
