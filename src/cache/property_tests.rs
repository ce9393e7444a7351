//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the contract on both backends and the codec.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use crate::cache::{
    codec, Cache, InMemoryCollection, MemoryStore, MemoryStoreOptions, PersistentStore,
    PersistentStoreOptions,
};
use crate::error::CacheError;

// == Test Fixtures ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u64,
    label: String,
    scores: Vec<i32>,
    attributes: BTreeMap<String, bool>,
    parent: Option<u64>,
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn memory_store() -> MemoryStore<Record> {
    MemoryStore::new(MemoryStoreOptions {
        default_expiration: Duration::from_secs(300),
        initial_entries: HashMap::new(),
        cleanup_interval: Duration::ZERO,
    })
}

fn persistent_store() -> PersistentStore<InMemoryCollection> {
    PersistentStore::new(InMemoryCollection::new(), &PersistentStoreOptions::default())
}

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

/// Generates arbitrary records to store
fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        ".{0,32}",
        prop::collection::vec(any::<i32>(), 0..8),
        prop::collection::btree_map("[a-z]{1,8}", any::<bool>(), 0..4),
        any::<Option<u64>>(),
    )
        .prop_map(|(id, label, scores, attributes, parent)| Record {
            id,
            label,
            scores,
            attributes,
            parent,
        })
}

/// Generates a sequence of cache operations
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Record },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    let key = "[a-d]";
    prop_oneof![
        (key, record_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key.prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Delete { key }),
    ]
}

/// Replays `ops` against `store` and a plain map, checking every read.
async fn replay<S: Cache<Record>>(store: &S, ops: Vec<CacheOp>) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, Record> = HashMap::new();

    for op in ops {
        match op {
            CacheOp::Set { key, value } => {
                store.set(&key, &value, None).await.unwrap();
                model.insert(key, value);
            }
            CacheOp::Get { key } => match (store.fetch(&key).await, model.get(&key)) {
                (Ok(found), Some(expected)) => prop_assert_eq!(&found, expected),
                (Err(CacheError::KeyNotFound(_)), None) => {}
                (result, expected) => {
                    return Err(TestCaseError::fail(format!(
                        "get {key}: store returned {result:?}, model has {expected:?}"
                    )))
                }
            },
            CacheOp::Delete { key } => {
                store.delete(&key).await.unwrap();
                model.remove(&key);
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Encoding then decoding reproduces an equal value.
    #[test]
    fn prop_codec_roundtrip(record in record_strategy()) {
        let text = codec::encode(&record).unwrap();
        let decoded: Record = codec::decode(text.as_bytes()).unwrap();
        prop_assert_eq!(decoded, record);
    }

    // Truncated payloads never decode.
    #[test]
    fn prop_codec_truncated_is_unmarshal(record in record_strategy(), cut in 1usize..8) {
        let text = codec::encode(&record).unwrap();
        let cut = cut.min(text.len());
        let result = codec::decode::<Record>(&text.as_bytes()[..text.len() - cut]);
        prop_assert!(matches!(result, Err(CacheError::Unmarshal(_))));
    }

    // Set followed by get yields an equal value on the memory store.
    #[test]
    fn prop_memory_roundtrip(key in key_strategy(), record in record_strategy()) {
        let fetched = block_on(async {
            let store = memory_store();
            store.set(&key, &record, None).await.unwrap();
            store.fetch(&key).await
        });
        prop_assert_eq!(fetched.unwrap(), record);
    }

    // Set followed by get yields an equal value on the persistent store.
    #[test]
    fn prop_persistent_roundtrip(key in key_strategy(), record in record_strategy()) {
        let fetched = block_on(async {
            let store = persistent_store();
            store.set(&key, &record, None).await.unwrap();
            Cache::<Record>::fetch(&store, &key).await
        });
        prop_assert_eq!(fetched.unwrap(), record);
    }

    // Any operation sequence on the memory store matches a plain map.
    #[test]
    fn prop_memory_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        block_on(replay(&memory_store(), ops))?;
    }

    // Any operation sequence on the persistent store matches a plain map.
    #[test]
    fn prop_persistent_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let store = persistent_store();
        block_on(replay(&store, ops))?;
        prop_assert!(store.collection().len() <= 4, "at most one record per key");
    }
}
