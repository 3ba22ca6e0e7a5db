use std::env;

use anyhow::{Context, Result};
use log::info;

use rsa_block_cipher::{
    CipherConfig, EncryptionSession, FileKeyStore, KeyGenConfig, SearchControl, StoreConfig,
};

const DEFAULT_MESSAGE: &str = "Hello, my name is Piotr Malesa and I am a student";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let message = env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let message = if message.is_empty() {
        DEFAULT_MESSAGE.to_string()
    } else {
        message
    };

    let store_config = StoreConfig::default();
    std::fs::create_dir_all(&store_config.directory)
        .with_context(|| format!("creating {}", store_config.directory.display()))?;

    let session = EncryptionSession::open(
        FileKeyStore::new(store_config),
        CipherConfig::default(),
        KeyGenConfig::default(),
        false,
        &SearchControl::unbounded(),
    )
    .context("preparing key pair")?;

    println!("Message: {}", message);

    let ciphertext = session
        .encrypt(&message)?
        .into_text()
        .unwrap_or_default();
    info!("ciphertext has {} blocks", ciphertext.split_whitespace().count());

    let decrypted = session.decrypt(&ciphertext)?.into_text().unwrap_or_default();
    println!("Decrypted message: {}", decrypted.replace('\0', ""));

    Ok(())
}
