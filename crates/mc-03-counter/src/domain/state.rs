/// Per-chain counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    /// Whether transactions must carry sequential nonces.
    pub serial: bool,
    /// Accepted `DeliverTx` calls.
    pub tx_count: u64,
    /// `Commit` calls.
    pub hash_count: u64,
}

impl CounterState {
    pub fn new(serial: bool) -> Self {
        Self {
            serial,
            ..Default::default()
        }
    }

    pub fn record_tx(&mut self) {
        self.tx_count += 1;
    }

    /// Count a commit and return its app hash: empty before the first
    /// transaction, otherwise `tx_count` as 8 big-endian bytes.
    pub fn record_commit(&mut self) -> Vec<u8> {
        self.hash_count += 1;
        if self.tx_count == 0 {
            Vec::new()
        } else {
            self.tx_count.to_be_bytes().to_vec()
        }
    }

    /// `{"hashes":H,"txs":T}`
    pub fn info_json(&self) -> String {
        serde_json::json!({
            "hashes": self.hash_count,
            "txs": self.tx_count,
        })
        .to_string()
    }
}
