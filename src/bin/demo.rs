#![forbid(unsafe_code)]
//! Build a two-block demo chain and print it.

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use utxo_ledger::blockchain::{Block, Blockchain};
use utxo_ledger::config::load_config;
use utxo_ledger::crypto::KeyPair;
use utxo_ledger::transaction::{OutPoint, Transaction};

#[derive(Parser)]
#[command(name = "ledger-demo", about = "Append-only UTXO ledger demo")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "ledger.toml")]
    config: PathBuf,

    /// Override the genesis supply from the config
    #[arg(long)]
    initial_supply: Option<u64>,

    /// Override the demo transfer amount from the config
    #[arg(long)]
    amount: Option<u64>,

    /// Override the demo transfer fee from the config
    #[arg(long)]
    fee: Option<u64>,

    /// Dump the chain as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    let initial_supply = args.initial_supply.unwrap_or(config.ledger.initial_supply);
    let amount = args.amount.unwrap_or(config.demo.amount);
    let fee = args.fee.unwrap_or(config.demo.fee);

    let mut chain = Blockchain::new(initial_supply, chrono::Utc::now().timestamp())?;

    // Spend the genesis output: amount to the recipient, the rest minus the
    // fee back to the sender as change.
    let sender = KeyPair::generate()?;
    let recipient = KeyPair::generate()?;

    let genesis = chain
        .tip()
        .ok_or("chain is missing its genesis block")?
        .clone();
    let minting_tx = &genesis.transactions[0];
    let source = OutPoint::new(minting_tx.hash(), 0);

    let mut tx = Transaction::transfer(
        source,
        minting_tx.outputs[0].value,
        amount,
        fee,
        recipient.public_key_bytes().to_vec(),
        sender.public_key_bytes().to_vec(),
    )?;
    tx.sign_all_inputs(&sender)?;

    let block = Block::build_next(&genesis, vec![tx], chrono::Utc::now().timestamp())?;
    chain.append_block(block)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chain.blocks)?);
    } else {
        print_chain(&chain);
    }

    Ok(())
}

fn print_chain(chain: &Blockchain) {
    for block in &chain.blocks {
        println!("{} {}", "Index:".bright_cyan(), block.index);
        println!("{} {}", "Timestamp:".bright_cyan(), block.timestamp);
        println!(
            "{} {}",
            "Transactions:".bright_cyan(),
            describe_transactions(block)
        );
        println!(
            "{} {}",
            "Previous Hash:".bright_cyan(),
            hex::encode(block.previous_hash)
        );
        println!("{} {}", "Hash:".bright_cyan(), block.hash_str());
        println!();
    }
}

fn describe_transactions(block: &Block) -> String {
    block
        .transactions
        .iter()
        .map(|tx| {
            let outputs = tx
                .outputs
                .iter()
                .map(|o| o.value.to_string())
                .collect::<Vec<_>>()
                .join("+");
            format!(
                "{} ({} in, out {})",
                tx.hash_str(),
                tx.inputs.len(),
                outputs
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
