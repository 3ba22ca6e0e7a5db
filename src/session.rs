//! Encryption session: the operations a GUI or CLI calls.
//!
//! A session owns a key store, a [`CipherConfig`] and one CBC initialization
//! vector. The IV is drawn when the session is created and is only replaced
//! by [`EncryptionSession::reseed_iv`], so successive CBC messages from one
//! session share it. Keys are loaded from the store on every call.

use log::info;

use crate::config::{CipherConfig, KeyGenConfig};
use crate::error::{CipherError, Result};
use crate::keystore::{save_keypair, KeyStore};
use crate::rsa::decrypt::decrypt_message;
use crate::rsa::encrypt::{encrypt_message, CipherOutput};
use crate::rsa::keygen::{generate_keypair, KeyPair, KeyRole};
use crate::rsa::mode::{InitVector, Mode};
use crate::rsa::search::SearchControl;

/// Whether `set_mode_name` changed the mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeUpdate {
    Applied(Mode),
    Ignored,
}

pub struct EncryptionSession<S: KeyStore> {
    store: S,
    config: CipherConfig,
    keygen: KeyGenConfig,
    iv: InitVector,
}

impl<S: KeyStore> EncryptionSession<S> {
    /// Session over an existing store; no keys are generated.
    pub fn new(store: S, config: CipherConfig) -> Self {
        let iv = InitVector::random(config.block_size);
        info!(
            "Using {} mode with {} byte block size.",
            config.mode, config.block_size
        );
        Self {
            store,
            config,
            keygen: KeyGenConfig::default(),
            iv,
        }
    }

    /// Session that makes sure a key pair exists.
    ///
    /// With `regenerate` set a fresh pair is always generated; otherwise only
    /// when either record is missing.
    pub fn open(
        store: S,
        config: CipherConfig,
        keygen: KeyGenConfig,
        regenerate: bool,
        control: &SearchControl,
    ) -> Result<Self> {
        let mut session = Self::new(store, config).with_keygen_config(keygen);
        if regenerate || !session.store.has_keypair()? {
            session.generate_pair_of_keys(control)?;
        }
        Ok(session)
    }

    pub fn with_keygen_config(mut self, keygen: KeyGenConfig) -> Self {
        self.keygen = keygen;
        self
    }

    pub fn with_iv(mut self, iv: InitVector) -> Self {
        self.iv = iv;
        self
    }

    /// Generate a key pair and write both records to the store
    pub fn generate_pair_of_keys(&mut self, control: &SearchControl) -> Result<KeyPair> {
        let keypair = generate_keypair(&self.keygen, control)?;
        save_keypair(&mut self.store, &keypair)?;
        Ok(keypair)
    }

    pub fn encrypt(&self, message: &str) -> Result<CipherOutput> {
        if message.is_empty() {
            return Ok(CipherOutput::Empty);
        }
        let key = self.store.load(KeyRole::Public)?;
        encrypt_message(message, &key, &self.config, &self.iv)
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<CipherOutput> {
        if ciphertext.is_empty() {
            return Ok(CipherOutput::Empty);
        }
        let key = self.store.load(KeyRole::Private)?;
        decrypt_message(ciphertext, &key, &self.config, &self.iv)
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    /// Accepts "ECB" or "CBC"; any other name leaves the mode unchanged.
    pub fn set_mode_name(&mut self, name: &str) -> ModeUpdate {
        match name.parse::<Mode>() {
            Ok(mode) => {
                self.set_mode(mode);
                ModeUpdate::Applied(mode)
            }
            Err(_) => ModeUpdate::Ignored,
        }
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Changes the block size only; the IV keeps its original width.
    pub fn set_block_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(CipherError::InvalidBlockSize(size));
        }
        self.config.block_size = size;
        Ok(())
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    pub fn iv(&self) -> &InitVector {
        &self.iv
    }

    /// Draw a new IV sized for the current block size
    pub fn reseed_iv(&mut self) -> &InitVector {
        self.iv = InitVector::random(self.config.block_size);
        &self.iv
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
