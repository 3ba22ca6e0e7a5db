//! Persisted key records.
//!
//! A record is two newline-terminated lines of lowercase hexadecimal without
//! a prefix: the modulus, then the exponent. Public and private keys are two
//! independent records that happen to share the modulus.

use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;
use num_traits::Zero;

use crate::config::StoreConfig;
use crate::error::{CipherError, Result};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::keygen::{KeyPair, KeyRole, RsaKey};
use crate::util::file_ops::{read_text, write_text};

/// Storage medium for key records
pub trait KeyStore {
    fn save(&mut self, key: &RsaKey) -> Result<()>;

    /// Fails with `KeyNotFound` when no record exists for `role`.
    fn load(&self, role: KeyRole) -> Result<RsaKey>;

    /// True when both records are present
    fn has_keypair(&self) -> Result<bool> {
        for role in [KeyRole::Public, KeyRole::Private] {
            match self.load(role) {
                Ok(_) => {}
                Err(CipherError::KeyNotFound { .. }) => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }
}

pub fn save_keypair<S: KeyStore + ?Sized>(store: &mut S, keypair: &KeyPair) -> Result<()> {
    store.save(&keypair.public_key)?;
    store.save(&keypair.private_key)
}

pub fn encode_record(key: &RsaKey) -> String {
    format!("{:x}\n{:x}\n", key.modulus, key.exponent)
}

fn parse_hex_line(line: Option<&str>, number: usize) -> Result<RsaBigInt> {
    let line = line.map(str::trim).ok_or_else(|| CipherError::KeyFormat {
        line: number,
        reason: "missing line".to_string(),
    })?;
    if line.is_empty() {
        return Err(CipherError::KeyFormat {
            line: number,
            reason: "empty line".to_string(),
        });
    }

    // hex works on whole bytes
    let padded = if line.len() % 2 == 1 {
        format!("0{}", line)
    } else {
        line.to_string()
    };
    let bytes = hex::decode(padded).map_err(|e| CipherError::KeyFormat {
        line: number,
        reason: e.to_string(),
    })?;

    Ok(RsaBigInt::from_bytes_be(&bytes))
}

pub fn decode_record(text: &str, role: KeyRole) -> Result<RsaKey> {
    let mut lines = text.lines();
    let modulus = parse_hex_line(lines.next(), 1)?;
    if modulus.is_zero() {
        return Err(CipherError::KeyFormat {
            line: 1,
            reason: "zero modulus".to_string(),
        });
    }
    let exponent = parse_hex_line(lines.next(), 2)?;
    Ok(RsaKey::new(modulus, exponent, role))
}

/// Records kept as two files in one directory.
///
/// The directory must already exist.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    config: StoreConfig,
}

impl FileKeyStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn path_for(&self, role: KeyRole) -> PathBuf {
        match role {
            KeyRole::Public => self.config.public_path(),
            KeyRole::Private => self.config.private_path(),
        }
    }
}

impl KeyStore for FileKeyStore {
    fn save(&mut self, key: &RsaKey) -> Result<()> {
        let path = self.path_for(key.role);
        debug!("saving {} key to {}", key.role, path.display());
        write_text(&path, &encode_record(key))?;
        Ok(())
    }

    fn load(&self, role: KeyRole) -> Result<RsaKey> {
        let path = self.path_for(role);
        match read_text(&path)? {
            Some(text) => decode_record(&text, role),
            None => Err(CipherError::KeyNotFound {
                role,
                location: path.display().to_string(),
            }),
        }
    }
}

/// Records held in memory in their serialized form
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    records: HashMap<KeyRole, String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw record text as-is
    pub fn put_record(&mut self, role: KeyRole, text: impl Into<String>) {
        self.records.insert(role, text.into());
    }

    pub fn record(&self, role: KeyRole) -> Option<&str> {
        self.records.get(&role).map(String::as_str)
    }

    pub fn remove(&mut self, role: KeyRole) {
        self.records.remove(&role);
    }
}

impl KeyStore for MemoryKeyStore {
    fn save(&mut self, key: &RsaKey) -> Result<()> {
        self.put_record(key.role, encode_record(key));
        Ok(())
    }

    fn load(&self, role: KeyRole) -> Result<RsaKey> {
        match self.records.get(&role) {
            Some(text) => decode_record(text, role),
            None => Err(CipherError::KeyNotFound {
                role,
                location: "memory".to_string(),
            }),
        }
    }
}
