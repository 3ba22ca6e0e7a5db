use rsa_block_cipher::keystore::save_keypair;
use rsa_block_cipher::rsa::bigint::from_u64;
use rsa_block_cipher::rsa::{derive_keypair, InitVector};
use rsa_block_cipher::{
    CancelToken, CipherConfig, CipherError, CipherOutput, EncryptionSession, FileKeyStore,
    KeyGenConfig, KeyRole, KeyStore, MemoryKeyStore, Mode, SearchControl, StoreConfig,
};

const MESSAGE: &str = "Hello, my name is Piotr Malesa and I am a student";

fn keygen() -> KeyGenConfig {
    KeyGenConfig::default().with_prime_bits(256)
}

fn generated_session(mode: Mode) -> Result<EncryptionSession<MemoryKeyStore>, CipherError> {
    let config = CipherConfig::default().with_mode(mode).with_block_size(16);
    EncryptionSession::open(
        MemoryKeyStore::new(),
        config,
        keygen(),
        false,
        &SearchControl::unbounded(),
    )
}

fn text(output: CipherOutput) -> String {
    output.into_text().expect("non-empty output")
}

#[test]
fn ecb_round_trip_keeps_padding() -> Result<(), CipherError> {
    let session = generated_session(Mode::Ecb)?;
    assert!(session.store().has_keypair()?);

    let ciphertext = text(session.encrypt(MESSAGE)?);
    assert_eq!(ciphertext.split(' ').count(), 4);

    let decrypted = text(session.decrypt(&ciphertext)?);
    // 49 characters in blocks of 16: the final block holds one character
    assert_eq!(decrypted.chars().count(), 64);
    assert_eq!(decrypted.replace('\0', ""), MESSAGE);
    assert!(decrypted.ends_with(&format!("{}t", "\0".repeat(15))));

    Ok(())
}

#[test]
fn cbc_round_trip() -> Result<(), CipherError> {
    let session = generated_session(Mode::Cbc)?;

    let ciphertext = text(session.encrypt(MESSAGE)?);
    let decrypted = text(session.decrypt(&ciphertext)?);
    assert_eq!(decrypted.replace('\0', ""), MESSAGE);

    Ok(())
}

#[test]
fn cbc_reuses_session_iv_until_reseeded() -> Result<(), CipherError> {
    let mut session = generated_session(Mode::Cbc)?;

    let first = text(session.encrypt(MESSAGE)?);
    let second = text(session.encrypt(MESSAGE)?);
    assert_eq!(first, second);

    session.reseed_iv();
    let third = text(session.encrypt(MESSAGE)?);
    assert_ne!(first, third);

    // the old ciphertext no longer decrypts cleanly under the new IV
    let decrypted = text(session.decrypt(&first)?);
    assert_ne!(decrypted.replace('\0', ""), MESSAGE);

    Ok(())
}

#[test]
fn ecb_repeats_blocks_cbc_does_not() -> Result<(), CipherError> {
    let mut store = MemoryKeyStore::new();
    let keypair = derive_keypair(&from_u64(1009), &from_u64(1013), &from_u64(17))?;
    save_keypair(&mut store, &keypair)?;

    let config = CipherConfig::default().with_block_size(2);
    let mut session = EncryptionSession::new(store, config).with_iv(InitVector::from(12345u64));

    assert_eq!(text(session.encrypt("hihi")?), "258089 258089");

    session.set_mode(Mode::Cbc);
    assert_eq!(text(session.encrypt("hihi")?), "796707 326448");
    assert_eq!(text(session.decrypt("796707 326448")?), "hihi");

    Ok(())
}

#[test]
fn keys_are_read_on_every_call() -> Result<(), CipherError> {
    let mut store = MemoryKeyStore::new();
    save_keypair(
        &mut store,
        &derive_keypair(&from_u64(1009), &from_u64(1013), &from_u64(17))?,
    )?;
    let config = CipherConfig::default().with_block_size(2);
    let mut session = EncryptionSession::new(store, config);

    assert_eq!(text(session.encrypt("hi")?), "258089");

    // swap in another key pair behind the session's back
    let other = derive_keypair(&from_u64(1009), &from_u64(1013), &from_u64(5))?;
    save_keypair(session.store_mut(), &other)?;
    let ciphertext = text(session.encrypt("hi")?);
    assert_ne!(ciphertext, "258089");
    assert_eq!(text(session.decrypt(&ciphertext)?), "hi");

    session.store_mut().put_record(KeyRole::Private, "zz\n11\n");
    assert!(matches!(
        session.decrypt(&ciphertext),
        Err(CipherError::KeyFormat { line: 1, .. })
    ));

    Ok(())
}

#[test]
fn file_store_keys_survive_reopening() -> Result<(), CipherError> {
    let dir = std::env::temp_dir().join(format!("rsa_block_cipher_session_{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let store_config = StoreConfig::default().with_directory(&dir);
    let config = CipherConfig::default().with_block_size(16);

    let session = EncryptionSession::open(
        FileKeyStore::new(store_config.clone()),
        config,
        keygen(),
        false,
        &SearchControl::unbounded(),
    )?;
    let public = session.store().load(KeyRole::Public)?;
    let ciphertext = text(session.encrypt(MESSAGE)?);

    let reopened = EncryptionSession::open(
        FileKeyStore::new(store_config),
        config,
        keygen(),
        false,
        &SearchControl::unbounded(),
    )?;
    assert_eq!(reopened.store().load(KeyRole::Public)?, public);
    assert_eq!(text(reopened.decrypt(&ciphertext)?).replace('\0', ""), MESSAGE);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn cancelled_key_generation_stores_nothing() -> Result<(), CipherError> {
    let token = CancelToken::new();
    token.cancel();
    let control = SearchControl::default().with_cancel_token(token);

    let result = EncryptionSession::open(
        MemoryKeyStore::new(),
        CipherConfig::default(),
        KeyGenConfig::default(),
        true,
        &control,
    );
    assert!(matches!(result, Err(CipherError::Cancelled)));

    let mut session = EncryptionSession::new(MemoryKeyStore::new(), CipherConfig::default());
    assert!(matches!(
        session.generate_pair_of_keys(&control),
        Err(CipherError::Cancelled)
    ));
    assert!(!session.store().has_keypair()?);

    Ok(())
}

#[test]
fn zero_modulus_record_is_a_format_error() {
    let mut store = MemoryKeyStore::new();
    store.put_record(KeyRole::Public, "0\n11\n");
    let session = EncryptionSession::new(store, CipherConfig::default());

    assert!(matches!(
        session.encrypt("hi"),
        Err(CipherError::KeyFormat { line: 1, .. })
    ));
}

#[test]
fn empty_input_is_a_no_op() -> Result<(), CipherError> {
    let session = generated_session(Mode::Cbc)?;
    assert_eq!(session.encrypt("")?, CipherOutput::Empty);
    assert_eq!(session.decrypt("")?, CipherOutput::Empty);
    Ok(())
}
