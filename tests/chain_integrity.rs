//! Integration tests for block linkage, hashing, and chain validation

use utxo_ledger::blockchain::{validate_candidate, Block, Blockchain, SharedChain};
use utxo_ledger::crypto::{KeyPair, ZERO_HASH};
use utxo_ledger::error::LedgerError;
use utxo_ledger::transaction::{OutPoint, Transaction};

const GENESIS_TIME: i64 = 1_700_000_000;

/// Build a signed spend of the given prior output.
fn signed_spend(
    source: OutPoint,
    source_value: u64,
    amount: u64,
    fee: u64,
    keypair: &KeyPair,
) -> Result<Transaction, Box<dyn std::error::Error>> {
    let mut tx = Transaction::transfer(
        source,
        source_value,
        amount,
        fee,
        keypair.public_key_bytes().to_vec(),
        keypair.public_key_bytes().to_vec(),
    )?;
    tx.sign_all_inputs(keypair)?;
    Ok(tx)
}

#[test]
fn test_genesis_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1000, GENESIS_TIME)?;

    assert_eq!(chain.len(), 1);
    let genesis = chain.tip().expect("genesis present");
    assert_eq!(genesis.index, 0);
    assert_eq!(genesis.previous_hash, ZERO_HASH);
    assert_ne!(genesis.hash, ZERO_HASH);

    // Exactly one minting transaction, no inputs, the full supply in one output.
    assert_eq!(genesis.transactions.len(), 1);
    assert!(genesis.transactions[0].is_coinbase());
    assert_eq!(genesis.transactions[0].outputs[0].value, 1000);

    Ok(())
}

#[test]
fn test_single_extension_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    let genesis = chain.tip().expect("genesis present").clone();
    let source = OutPoint::new(genesis.transactions[0].hash(), 0);
    let tx = signed_spend(source, 1_000_000, 123_456, 10_000, &keypair)?;

    // Change output carries supply - amount - fee.
    assert_eq!(tx.outputs[1].value, 866_544);

    let block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 60)?;
    assert!(validate_candidate(&chain, &block).is_ok());
    chain.append_block(block)?;

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.tip().expect("tip present").index, 1);
    Ok(())
}

#[test]
fn test_serialization_and_hash_determinism() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1000, GENESIS_TIME)?;
    let genesis = chain.tip().expect("genesis present");

    let tx = &genesis.transactions[0];
    assert_eq!(tx.signable_bytes(), tx.signable_bytes());
    assert_eq!(tx.hash(), tx.hash());

    assert_eq!(genesis.canonical_bytes(), genesis.canonical_bytes());
    assert_eq!(genesis.compute_hash(), genesis.compute_hash());
    Ok(())
}

#[test]
fn test_linkage_and_self_consistency_over_many_blocks(
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    // Repeatedly spend the change output forward.
    let mut source = OutPoint::new(chain.tip().unwrap().transactions[0].hash(), 0);
    let mut source_value = 1_000_000u64;
    for i in 0..5i64 {
        let tip = chain.tip().expect("tip present").clone();
        let tx = signed_spend(source, source_value, 1_000, 10, &keypair)?;
        source = OutPoint::new(tx.hash(), 1);
        source_value -= 1_010;

        let block = Block::build_next(&tip, vec![tx], GENESIS_TIME + 30 * (i + 1))?;
        chain.append_block(block)?;
    }

    assert_eq!(chain.len(), 6);
    for pair in chain.blocks.windows(2) {
        assert_eq!(pair[1].index, pair[0].index + 1);
        assert_eq!(pair[1].previous_hash, pair[0].hash);
    }
    for block in &chain.blocks {
        assert_eq!(block.compute_hash(), block.hash);
    }
    Ok(())
}

#[test]
fn test_tampered_previous_hash_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    let genesis = chain.tip().expect("genesis present").clone();
    let source = OutPoint::new(genesis.transactions[0].hash(), 0);
    let tx = signed_spend(source, 1_000_000, 123_456, 10_000, &keypair)?;
    let mut block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 60)?;

    // Flip one byte of the accepted block's previous_hash and re-validate.
    block.previous_hash[7] ^= 0x20;
    block.hash = block.compute_hash();
    assert_eq!(
        validate_candidate(&chain, &block),
        Err(LedgerError::BrokenLink)
    );
    Ok(())
}

#[test]
fn test_stale_embedded_hash_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    let genesis = chain.tip().expect("genesis present").clone();
    let source = OutPoint::new(genesis.transactions[0].hash(), 0);
    let tx = signed_spend(source, 1_000_000, 123_456, 10_000, &keypair)?;
    let mut block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 60)?;

    // Change content after construction without recomputing the hash.
    block.transactions[0].outputs[0].value += 1;
    assert_eq!(
        validate_candidate(&chain, &block),
        Err(LedgerError::HashMismatch)
    );
    Ok(())
}

#[test]
fn test_index_off_by_more_than_one_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    let genesis = chain.tip().expect("genesis present").clone();
    let source = OutPoint::new(genesis.transactions[0].hash(), 0);

    for bad_index in [0u64, 2, 3, 100] {
        let tx = signed_spend(source, 1_000_000, 123_456, 10_000, &keypair)?;
        let mut block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 60)?;
        block.index = bad_index;
        block.hash = block.compute_hash();

        match validate_candidate(&chain, &block) {
            Err(LedgerError::DiscontinuousIndex { expected: 1, got }) => {
                assert_eq!(got, bad_index)
            }
            other => panic!("Expected DiscontinuousIndex for {}, got {:?}", bad_index, other),
        }
    }
    Ok(())
}

#[test]
fn test_shared_chain_serializes_appends() -> Result<(), Box<dyn std::error::Error>> {
    let chain = Blockchain::new(1_000_000, GENESIS_TIME)?;
    let keypair = KeyPair::generate()?;

    let genesis = chain.tip().expect("genesis present").clone();
    let source = OutPoint::new(genesis.transactions[0].hash(), 0);
    let tx = signed_spend(source, 1_000_000, 123_456, 10_000, &keypair)?;
    let block = Block::build_next(&genesis, vec![tx], GENESIS_TIME + 60)?;

    let shared = SharedChain::new(chain);

    // Several writers race to append the same candidate; the write lock
    // serializes them and only the first can extend the tip.
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let block = block.clone();
            std::thread::spawn(move || shared.append_block(block).is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("writer thread panicked"))
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(shared.len(), 2);
    assert_eq!(shared.tip_hash(), Some(block.hash));
    Ok(())
}
