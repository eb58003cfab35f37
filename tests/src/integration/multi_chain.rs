//! # Multi-Chain Isolation
//!
//! Several chains share one physical store. Each must behave as if it had
//! the store to itself.

#[cfg(test)]
mod tests {
    use crate::integration::{build, memory_store};
    use mc_01_chain_store::{chain_prefix, prefix_end_bound, ChainDb, KeyValueStore};
    use mc_05_dispatch::AppKind;
    use shared_types::{
        AppError, ChainId, RequestCommit, RequestDeliverTx, RequestInfo, RequestQuery,
    };
    use std::sync::Arc;

    fn deliver(chain_id: &str, tx: &[u8]) -> RequestDeliverTx {
        RequestDeliverTx {
            chain_id: chain_id.to_string(),
            tx: tx.to_vec(),
        }
    }

    fn query(chain_id: &str, data: &[u8]) -> RequestQuery {
        RequestQuery {
            chain_id: chain_id.to_string(),
            data: data.to_vec(),
            ..Default::default()
        }
    }

    fn commit(chain_id: &str) -> RequestCommit {
        RequestCommit {
            chain_id: chain_id.to_string(),
        }
    }

    #[test]
    fn test_kvstore_chains_do_not_see_each_other() {
        let mut app = build(AppKind::KvStore, memory_store(), "chain-a");

        app.deliver_tx(deliver("chain-a", b"k=from-a")).unwrap();
        app.deliver_tx(deliver("chain-b", b"other=from-b")).unwrap();

        let a = app.query(query("chain-a", b"k")).unwrap();
        assert_eq!(a.value, b"from-a".to_vec());
        assert_eq!(a.log, "exists");

        let b = app.query(query("chain-b", b"k")).unwrap();
        assert!(b.value.is_empty());
        assert_eq!(b.log, "does not exist");
    }

    #[test]
    fn test_commits_are_tracked_per_chain() {
        let mut app = build(AppKind::KvStore, memory_store(), "chain-a");

        for tx in [&b"a=1"[..], b"b=2", b"c=3"] {
            app.deliver_tx(deliver("chain-a", tx)).unwrap();
        }
        app.deliver_tx(deliver("chain-b", b"x=1")).unwrap();

        let hash_a = app.commit(commit("chain-a")).unwrap().data;
        let hash_b = app.commit(commit("chain-b")).unwrap().data;
        assert_eq!(hash_a, vec![6, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(hash_b, vec![2, 0, 0, 0, 0, 0, 0, 0]);

        let info_a = app.info(RequestInfo::default()).unwrap();
        assert_eq!(info_a.data, r#"{"size":3}"#);
        let info_b = app
            .info(RequestInfo {
                chain_id: "chain-b".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(info_b.data, r#"{"size":1}"#);
    }

    #[test]
    fn test_full_range_iteration_yields_only_own_keys() {
        let store = memory_store();
        let mut app = build(AppKind::KvStore, Arc::clone(&store), "a");

        // "a" is a string prefix of "ab": the namespaces must still not overlap.
        app.deliver_tx(deliver("a", b"k2=v")).unwrap();
        app.deliver_tx(deliver("a", b"k1=v")).unwrap();
        app.deliver_tx(deliver("ab", b"k0=v")).unwrap();
        app.commit(commit("a")).unwrap();
        app.commit(commit("ab")).unwrap();

        let view = ChainDb::new(ChainId::new("a").unwrap(), Arc::clone(&store));
        let keys: Vec<Vec<u8>> = view.iterator(None, None).unwrap().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                b"kvPairKey:k1".to_vec(),
                b"kvPairKey:k2".to_vec(),
                b"stateKey:".to_vec(),
            ]
        );

        // Physically, chain "a" owns exactly the keys in its prefix range.
        let prefix = chain_prefix(&ChainId::new("a").unwrap());
        let end = prefix_end_bound(&prefix).unwrap();
        let physical = store.iterator(Some(prefix.as_slice()), Some(end.as_slice())).unwrap().count();
        assert_eq!(physical, 3);
    }

    #[test]
    fn test_counter_chains_keep_separate_nonces() {
        let mut app = build(AppKind::Counter, memory_store(), "chain-a");

        assert!(app.deliver_tx(deliver("", &[0x00])).unwrap().is_ok());
        assert!(app.deliver_tx(deliver("", &[0x01])).unwrap().is_ok());
        // chain-b starts over at nonce 0.
        assert!(app.deliver_tx(deliver("chain-b", &[0x00])).unwrap().is_ok());
        assert!(!app.deliver_tx(deliver("chain-b", &[0x02])).unwrap().is_ok());

        let a = app.commit(commit("chain-a")).unwrap();
        let b = app.commit(commit("chain-b")).unwrap();
        assert_eq!(a.data, 2u64.to_be_bytes().to_vec());
        assert_eq!(b.data, 1u64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_invalid_chain_ids_are_faults() {
        let mut app = build(AppKind::KvStore, memory_store(), "");

        assert_eq!(
            app.deliver_tx(deliver("", b"k=v")).unwrap_err(),
            AppError::EmptyChainId
        );
        assert!(matches!(
            app.commit(commit("evil\0chain")).unwrap_err(),
            AppError::InvalidChainId { .. }
        ));
    }

    #[test]
    fn test_chains_written_from_separate_threads() {
        let store = memory_store();
        let chains: Vec<ChainDb> = ["t-1", "t-2", "t-3", "t-4"]
            .iter()
            .map(|id| ChainDb::new(ChainId::new(*id).unwrap(), Arc::clone(&store)))
            .collect();

        std::thread::scope(|scope| {
            for db in &chains {
                scope.spawn(move || {
                    for i in 0..200u32 {
                        let mut batch = db.new_batch();
                        batch
                            .set(&i.to_be_bytes(), db.chain_id().as_bytes())
                            .set(b"last", &i.to_be_bytes());
                        batch.write().unwrap();
                    }
                });
            }
        });

        for db in &chains {
            let entries: Vec<_> = db.iterator(None, None).unwrap().collect();
            assert_eq!(entries.len(), 201);
            assert!(entries
                .iter()
                .filter(|(k, _)| k.as_slice() != b"last")
                .all(|(_, v)| v.as_slice() == db.chain_id().as_bytes()));
        }
    }
}
