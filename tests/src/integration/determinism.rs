//! # Determinism
//!
//! Replicas fed the same transaction history must return byte-identical app
//! hashes, whether they run uninterrupted or restart between blocks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A block is the list of transactions delivered before one commit.
pub type Block = Vec<Vec<u8>>;

/// Generate `blocks` blocks of kvstore transactions from `seed`.
///
/// Mixes `key=value` pairs, raw payloads, multi-separator payloads and
/// repeated keys.
pub fn kv_history(seed: u64, blocks: usize) -> Vec<Block> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..blocks)
        .map(|_| {
            let txs = rng.gen_range(0..8);
            (0..txs)
                .map(|_| {
                    let key = format!("key-{}", rng.gen_range(0..16));
                    match rng.gen_range(0..4) {
                        0 => key.into_bytes(),
                        1 => format!("{}=a=b", key).into_bytes(),
                        _ => format!("{}={}", key, rng.gen::<u32>()).into_bytes(),
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{build, memory_store};
    use mc_05_dispatch::AppKind;
    use shared_types::{Application, RequestCommit, RequestDeliverTx, RequestInfo};
    use std::sync::Arc;

    const CHAIN: &str = "replica-chain";

    fn apply(app: &mut dyn Application, blocks: &[Block]) -> Vec<Vec<u8>> {
        blocks
            .iter()
            .map(|block| {
                for tx in block {
                    let res = app
                        .deliver_tx(RequestDeliverTx {
                            chain_id: CHAIN.to_string(),
                            tx: tx.clone(),
                        })
                        .unwrap();
                    assert!(res.is_ok());
                }
                app.commit(RequestCommit {
                    chain_id: CHAIN.to_string(),
                })
                .unwrap()
                .data
            })
            .collect()
    }

    #[test]
    fn test_history_generation_is_seeded() {
        assert_eq!(kv_history(7, 20), kv_history(7, 20));
        assert_ne!(kv_history(7, 20), kv_history(8, 20));
    }

    #[test]
    fn test_replicas_agree_on_app_hashes() {
        let history = kv_history(42, 50);

        let mut first = build(AppKind::KvStore, memory_store(), CHAIN);
        let mut second = build(AppKind::KvStore, memory_store(), CHAIN);

        let hashes_a = apply(first.as_mut(), &history);
        let hashes_b = apply(second.as_mut(), &history);

        assert_eq!(hashes_a.len(), 50);
        assert_eq!(hashes_a, hashes_b);
        assert!(hashes_a.iter().all(|h| h.len() == 8));
    }

    #[test]
    fn test_restart_between_blocks_does_not_change_hashes() {
        let history = kv_history(1234, 30);

        let mut uninterrupted = build(AppKind::KvStore, memory_store(), CHAIN);
        let expected = apply(uninterrupted.as_mut(), &history);

        // Same store, fresh application (and registry) every ten blocks.
        let store = memory_store();
        let mut actual = Vec::new();
        for chunk in history.chunks(10) {
            let mut app = build(AppKind::KvStore, Arc::clone(&store), CHAIN);
            actual.extend(apply(app.as_mut(), chunk));
        }

        assert_eq!(actual, expected);

        let mut app = build(AppKind::KvStore, store, CHAIN);
        let info = app.info(RequestInfo::default()).unwrap();
        assert_eq!(info.last_block_height, 30);
        assert_eq!(info.last_block_app_hash, expected[29]);
    }

    #[test]
    fn test_counter_replicas_agree() {
        let nonces: Vec<Block> = (0u64..20)
            .collect::<Vec<_>>()
            .chunks(3)
            .map(|chunk| chunk.iter().map(|n| n.to_be_bytes().to_vec()).collect())
            .collect();

        let mut first = build(AppKind::Counter, memory_store(), CHAIN);
        let mut second = build(AppKind::Counter, memory_store(), CHAIN);

        let hashes = apply(first.as_mut(), &nonces);
        assert_eq!(hashes, apply(second.as_mut(), &nonces));
        assert_eq!(hashes.last().unwrap(), &20u64.to_be_bytes().to_vec());
    }
}
