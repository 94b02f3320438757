//! End-to-end tests for configuration and the batch driver

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use autolykos::algorithm::batch::nonce_digest;
use autolykos::algorithm::{Sequential, U256};
use autolykos::{build_table, blake2b256, search, ConfigError, MinerConfig, Threshold};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("autolykos-test-{}", std::process::id()))
        .join(name)
}

#[test]
fn test_config_save_and_load() {
    let path = temp_path("saved.json");
    let config = MinerConfig {
        threshold: "0x00ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff".to_string(),
        batch_size: 64,
        threads: 2,
        table_size: 128,
        prefix: "deadbeef".to_string(),
    };

    config.save(&path).unwrap();
    let loaded = MinerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert_eq!(loaded.prefix_bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(
        *loaded.threshold().unwrap().value(),
        U256([0x00ff_ffff_ffff_ffff, u64::MAX, u64::MAX, u64::MAX])
    );
}

#[test]
fn test_config_load_errors() {
    let missing = temp_path("does-not-exist.json");
    assert!(matches!(
        MinerConfig::load(&missing),
        Err(ConfigError::FileError(_))
    ));

    let garbage = temp_path("garbage.json");
    std::fs::create_dir_all(garbage.parent().unwrap()).unwrap();
    std::fs::write(&garbage, "not json").unwrap();
    let result = MinerConfig::load(&garbage);
    std::fs::remove_file(&garbage).ok();
    assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
}

#[test]
fn test_search_with_config_settings() {
    let config = MinerConfig {
        // About one digest in eight is below 2^253
        threshold: format!("{:x}", U256([1 << 61, 0, 0, 0])),
        batch_size: 5,
        prefix: "0102030405".to_string(),
        ..MinerConfig::default()
    };
    let prefix = config.prefix_bytes().unwrap();
    let threshold = config.threshold().unwrap();

    let stop = AtomicBool::new(false);
    let solution = search(&prefix, 0..500, &threshold, &config.batch_config(), &stop).unwrap();

    let mut message = prefix.clone();
    message.extend_from_slice(&solution.nonce.to_be_bytes());
    assert_eq!(solution.digest, blake2b256(&message));
    assert!(threshold.admits(&solution.digest));

    // No earlier nonce qualifies
    for nonce in 0..solution.nonce {
        assert!(!threshold.admits(&nonce_digest::<Sequential>(&prefix, nonce)));
    }
}

#[test]
fn test_table_entries_hash_index_then_seed() {
    let config = MinerConfig {
        threads: 1,
        ..MinerConfig::default()
    };
    let seed = [0x33u8; 32];
    let table = build_table(&seed, 0..16, config.batch_config().context);

    for (index, entry) in table.iter().enumerate() {
        let mut message = (index as u32).to_be_bytes().to_vec();
        message.extend_from_slice(&seed);
        assert_eq!(*entry, blake2b256(&message));
    }
}

#[test]
fn test_q_admits_typical_digests() {
    // Q only rejects digests in the top 2^-127 of the range
    let digest = blake2b256(b"typical");
    assert!(Threshold::Q.admits(&digest));
}
