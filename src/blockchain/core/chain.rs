use crate::blockchain::core::state::UtxoState;
use crate::blockchain::core::validation::{validate_candidate, validate_no_double_spend};
use crate::crypto::{sha256, Sha256Hash, ZERO_HASH};
use crate::error::LedgerError;
use crate::transaction::Transaction;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

/// One link in the ledger. The embedded `hash` always equals the SHA-256
/// digest of the block's canonical bytes; `previous_hash` is the zero
/// sentinel only for the genesis block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub index: u64,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: Sha256Hash,
    pub hash: Sha256Hash,
}

impl Block {
    /// Canonical byte serialization of everything except the embedded hash:
    /// index as 8-byte big-endian, previous hash, timestamp as 8-byte
    /// big-endian, then each transaction's signable bytes in order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&self.index.to_be_bytes());
        data.extend_from_slice(&self.previous_hash);
        data.extend_from_slice(&self.timestamp.to_be_bytes());
        for tx in &self.transactions {
            data.extend_from_slice(&tx.signable_bytes());
        }
        data
    }

    /// Recompute the content hash from the block's other fields.
    pub fn compute_hash(&self) -> Sha256Hash {
        sha256(&self.canonical_bytes())
    }

    /// The first block of a chain: index 0, zero-hash sentinel predecessor,
    /// and a single minting transaction paying `initial_supply` to the
    /// empty placeholder owner key.
    pub fn genesis(initial_supply: u64, timestamp: i64) -> Block {
        let coinbase = Transaction::coinbase(initial_supply, Vec::new());

        let mut block = Block {
            index: 0,
            timestamp,
            transactions: vec![coinbase],
            previous_hash: ZERO_HASH,
            hash: ZERO_HASH,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Assemble the block extending `previous` with the given transactions,
    /// embedding the correct hash. Pure construction: nothing is validated
    /// against or appended to any chain here. `timestamp` is passed in so
    /// callers control the clock.
    pub fn build_next(
        previous: &Block,
        transactions: Vec<Transaction>,
        timestamp: i64,
    ) -> Result<Block, LedgerError> {
        if transactions.is_empty() {
            return Err(LedgerError::InvalidBlock(
                "Block must carry at least one transaction".to_string(),
            ));
        }

        let mut block = Block {
            index: previous.index + 1,
            timestamp,
            transactions,
            previous_hash: previous.hash,
            hash: ZERO_HASH,
        };
        block.hash = block.compute_hash();
        Ok(block)
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Ordered, append-only sequence of accepted blocks plus the UTXO state
/// derived from them. Created with exactly one genesis block; mutated only
/// by appending a validated block at the tail.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Blockchain {
    pub blocks: Vec<Block>,
    pub state: UtxoState,
}

impl Blockchain {
    /// Create a chain holding only the genesis block minting `initial_supply`.
    pub fn new(initial_supply: u64, timestamp: i64) -> Result<Self, LedgerError> {
        let genesis = Block::genesis(initial_supply, timestamp);

        let mut state = UtxoState::new();
        for tx in &genesis.transactions {
            state.apply_transaction(tx)?;
        }

        Ok(Blockchain {
            blocks: vec![genesis],
            state,
        })
    }

    /// The most recently appended block. None never occurs after
    /// construction; validation treats it as an invalid-block error rather
    /// than panicking.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Validate `block` against the current tip and state, then append it.
    /// Runs the structural checks (index continuity, linkage, hash
    /// integrity), then the transaction layer (signatures against owner
    /// keys, double-spend detection), then applies the block to the UTXO
    /// state. The chain is unchanged on any failure.
    pub fn append_block(&mut self, block: Block) -> Result<(), LedgerError> {
        validate_candidate(self, &block)?;
        validate_no_double_spend(&block)?;

        // Transactions are validated and applied against a scratch state so
        // an intra-block spend chain resolves and a failure discards all
        // partial effects.
        let mut next_state = self.state.clone();
        for tx in &block.transactions {
            if tx.is_coinbase() {
                return Err(LedgerError::InvalidBlock(
                    "Minting transaction is only valid in the genesis block".to_string(),
                ));
            }
            tx.validate_with_state(&next_state)?;
            next_state.apply_transaction(tx)?;
        }

        debug!(
            "Appending block {} ({} transactions, hash {})",
            block.index,
            block.transactions.len(),
            block.hash_str()
        );

        self.blocks.push(block);
        self.state = next_state;
        Ok(())
    }
}

/// Thread-safe handle to a chain shared between concurrent callers.
/// Appends are serialized behind the write lock; committed blocks are
/// immutable, so reads only take the read lock.
#[derive(Clone)]
pub struct SharedChain {
    inner: Arc<RwLock<Blockchain>>,
}

impl SharedChain {
    pub fn new(chain: Blockchain) -> Self {
        SharedChain {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    pub fn append_block(&self, block: Block) -> Result<(), LedgerError> {
        self.inner.write().append_block(block)
    }

    /// Run a closure against the committed chain under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Blockchain) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn tip_hash(&self) -> Option<Sha256Hash> {
        self.inner.read().tip().map(|b| b.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::transaction::OutPoint;

    const GENESIS_TIME: i64 = 1_700_000_000;

    #[test]
    fn test_genesis_chain() {
        let chain = Blockchain::new(1000, GENESIS_TIME).unwrap();

        assert_eq!(chain.len(), 1);
        let genesis = chain.tip().unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, ZERO_HASH);
        assert_ne!(genesis.hash, ZERO_HASH);
        assert_eq!(genesis.hash, genesis.compute_hash());

        // The minted supply is spendable state.
        let coinbase = &genesis.transactions[0];
        let outpoint = OutPoint::new(coinbase.hash(), 0);
        assert_eq!(chain.state.resolve(&outpoint).unwrap().value, 1000);
    }

    #[test]
    fn test_append_spend_of_genesis_output() {
        let mut chain = Blockchain::new(1000, GENESIS_TIME).unwrap();
        let keypair = KeyPair::generate().unwrap();

        let genesis = chain.tip().unwrap().clone();
        let coinbase = &genesis.transactions[0];
        let source = OutPoint::new(coinbase.hash(), 0);

        let mut tx = Transaction::transfer(
            source,
            1000,
            600,
            10,
            keypair.public_key_bytes().to_vec(),
            keypair.public_key_bytes().to_vec(),
        )
        .unwrap();
        tx.sign_all_inputs(&keypair).unwrap();

        let block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 30).unwrap();
        chain.append_block(block).unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.tip().unwrap().index, 1);
        assert_eq!(chain.tip().unwrap().previous_hash, genesis.hash);
        assert!(chain.state.resolve(&source).is_none());
        assert_eq!(chain.state.balance_of(&keypair.public_key_bytes()), 990);
    }

    #[test]
    fn test_rejected_block_leaves_chain_unchanged() {
        let mut chain = Blockchain::new(1000, GENESIS_TIME).unwrap();
        let genesis = chain.tip().unwrap().clone();

        // Unsigned spend: structural checks pass, transaction layer fails.
        let tx = Transaction::transfer(
            OutPoint::new(genesis.transactions[0].hash(), 0),
            1000,
            600,
            10,
            vec![2u8; 33],
            vec![3u8; 33],
        )
        .unwrap();
        let block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 30).unwrap();

        assert!(chain.append_block(block).is_err());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.state.len(), 1);
    }

    #[test]
    fn test_coinbase_rejected_after_genesis() {
        let mut chain = Blockchain::new(1000, GENESIS_TIME).unwrap();
        let genesis = chain.tip().unwrap().clone();

        let mint = Transaction::coinbase(5000, vec![2u8; 33]);
        let block = Block::build_next(&genesis, vec![mint], GENESIS_TIME + 30).unwrap();

        match chain.append_block(block) {
            Err(LedgerError::InvalidBlock(msg)) => assert!(msg.contains("genesis")),
            other => panic!("Expected InvalidBlock, got {:?}", other),
        }
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_empty_block_rejected_at_construction() {
        let genesis = Block::genesis(1000, GENESIS_TIME);
        assert!(Block::build_next(&genesis, vec![], GENESIS_TIME + 30).is_err());
    }

    #[test]
    fn test_intra_block_spend_chain_resolves() {
        let mut chain = Blockchain::new(1000, GENESIS_TIME).unwrap();
        let keypair = KeyPair::generate().unwrap();
        let genesis = chain.tip().unwrap().clone();

        let mut first = Transaction::transfer(
            OutPoint::new(genesis.transactions[0].hash(), 0),
            1000,
            600,
            0,
            keypair.public_key_bytes().to_vec(),
            keypair.public_key_bytes().to_vec(),
        )
        .unwrap();
        first.sign_all_inputs(&keypair).unwrap();

        // Spend the first transaction's recipient output in the same block.
        let mut second = Transaction::transfer(
            OutPoint::new(first.hash(), 0),
            600,
            100,
            0,
            keypair.public_key_bytes().to_vec(),
            keypair.public_key_bytes().to_vec(),
        )
        .unwrap();
        second.sign_all_inputs(&keypair).unwrap();

        let block =
            Block::build_next(&genesis, vec![first, second], GENESIS_TIME + 30).unwrap();
        chain.append_block(block).unwrap();
        assert_eq!(chain.len(), 2);
    }
}
