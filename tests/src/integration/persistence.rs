//! # Persistence
//!
//! Chain state committed to a durable store is picked up again by a new
//! process, and a damaged state record is reported instead of ignored.

#[cfg(test)]
mod tests {
    use crate::integration::build;
    use mc_01_chain_store::{chain_prefix_key, FileBackedKVStore, KeyValueStore};
    use mc_02_chain_state::STATE_KEY;
    use mc_05_dispatch::AppKind;
    use shared_types::{
        AppError, ChainId, RequestCommit, RequestDeliverTx, RequestInfo, RequestQuery,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Arc<dyn KeyValueStore> {
        Arc::new(FileBackedKVStore::open(dir.path().join("chains.db")).unwrap())
    }

    fn deliver(chain_id: &str, tx: &[u8]) -> RequestDeliverTx {
        RequestDeliverTx {
            chain_id: chain_id.to_string(),
            tx: tx.to_vec(),
        }
    }

    #[test]
    fn test_committed_state_survives_restart() {
        let dir = TempDir::new().unwrap();

        {
            let store = open(&dir);
            let mut app = build(AppKind::KvStore, Arc::clone(&store), "main");
            app.deliver_tx(deliver("main", b"name=satoshi")).unwrap();
            app.deliver_tx(deliver("side", b"x=y")).unwrap();
            app.commit(RequestCommit {
                chain_id: "main".to_string(),
            })
            .unwrap();
            app.commit(RequestCommit {
                chain_id: "side".to_string(),
            })
            .unwrap();
            store.close().unwrap();
        }

        let mut app = build(AppKind::KvStore, open(&dir), "main");

        let info = app.info(RequestInfo::default()).unwrap();
        assert_eq!(info.data, r#"{"size":1}"#);
        assert_eq!(info.last_block_height, 1);
        assert_eq!(info.last_block_app_hash, vec![2, 0, 0, 0, 0, 0, 0, 0]);

        let res = app
            .query(RequestQuery {
                data: b"name".to_vec(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(res.value, b"satoshi".to_vec());
        assert_eq!(res.height, 1);

        let side = app
            .query(RequestQuery {
                chain_id: "side".to_string(),
                data: b"x".to_vec(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(side.value, b"y".to_vec());
    }

    #[test]
    fn test_corrupt_state_record_is_a_fault() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        let chain = ChainId::new("damaged").unwrap();
        store
            .set_sync(&chain_prefix_key(&chain, STATE_KEY), b"{not json")
            .unwrap();

        let mut app = build(AppKind::KvStore, store, "damaged");
        let err = app.info(RequestInfo::default()).unwrap_err();

        assert!(matches!(
            err,
            AppError::CorruptState { ref chain_id, .. } if chain_id == "damaged"
        ));
    }

    #[test]
    fn test_closed_store_is_a_storage_fault() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        let mut app = build(AppKind::KvStore, Arc::clone(&store), "main");
        store.close().unwrap();

        let err = app.deliver_tx(deliver("main", b"k=v")).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(!err.is_precondition());
    }
}
