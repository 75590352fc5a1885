// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # txnbuild CLI
//!
//! Entry point for the `txnbuild` binary. Parses CLI arguments, initializes
//! logging, and runs one offline command against a transaction envelope.
//!
//! The binary supports five subcommands:
//!
//! - `decode`    — print a JSON summary of an envelope
//! - `hash`      — print the network-bound transaction hash
//! - `sign`      — add signatures and print the new envelope
//! - `challenge` — build or verify an authentication challenge
//! - `version`   — print build version information

mod cli;
mod logging;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use txnbuild::config::network_passphrase;
use txnbuild::{Keypair, Memo, Operation, Transaction};

use cli::{ChallengeCommands, Commands, TxnbuildCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = TxnbuildCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, LogFormat::from_str_lossy(&cli.log_format));

    let passphrase = network_passphrase(&cli.network);
    tracing::debug!(network = passphrase, "resolved network");

    match cli.command {
        Commands::Decode(args) => decode(&args.envelope, passphrase),
        Commands::Hash(args) => {
            let tx = parse_envelope(&args.envelope, passphrase)?;
            println!("{}", tx.hash_hex()?);
            Ok(())
        }
        Commands::Sign(args) => sign(&args.envelope, &args.secrets, passphrase),
        Commands::Challenge(ChallengeCommands::Build(args)) => {
            let challenge = txnbuild::build_challenge_tx(
                &args.server_secret,
                &args.client,
                &args.anchor,
                passphrase,
                Duration::from_secs(args.timeout),
            )
            .context("failed to build challenge")?;
            println!("{challenge}");
            Ok(())
        }
        Commands::Challenge(ChallengeCommands::Verify(args)) => {
            txnbuild::verify_challenge_tx(&args.envelope, &args.server, passphrase)
                .context("challenge rejected")?;
            tracing::info!(server = %args.server, "challenge verified");
            println!("ok");
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn parse_envelope(envelope: &str, passphrase: &str) -> Result<Transaction> {
    Transaction::from_base64(envelope.trim(), passphrase).context("failed to decode envelope")
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// What `decode` prints.
#[derive(Serialize)]
struct EnvelopeSummary<'a> {
    hash: String,
    source_account: &'a str,
    sequence: i64,
    fee: u32,
    base_fee: u32,
    memo: Option<&'a Memo>,
    time_bounds: Option<TimeBoundsSummary>,
    operations: &'a [Operation],
    signatures: Vec<SignatureSummary>,
}

#[derive(Serialize)]
struct TimeBoundsSummary {
    min_time: i64,
    max_time: i64,
    /// RFC 3339 rendering of `max_time`, absent when unbounded.
    expires: Option<String>,
}

#[derive(Serialize)]
struct SignatureSummary {
    hint: String,
    length: usize,
}

fn decode(envelope: &str, passphrase: &str) -> Result<()> {
    let tx = parse_envelope(envelope, passphrase)?;

    let summary = EnvelopeSummary {
        hash: tx.hash_hex()?,
        source_account: &tx.source_account().account_id,
        sequence: tx.source_account().sequence,
        fee: tx.transaction_fee(),
        base_fee: tx.base_fee(),
        memo: tx.memo(),
        time_bounds: tx.time_bounds().map(|tb| TimeBoundsSummary {
            min_time: tb.min_time(),
            max_time: tb.max_time(),
            expires: (tb.max_time() != 0)
                .then(|| DateTime::<Utc>::from_timestamp(tb.max_time(), 0))
                .flatten()
                .map(|t| t.to_rfc3339()),
        }),
        operations: tx.operations(),
        signatures: tx
            .signatures()
            .iter()
            .map(|sig| SignatureSummary {
                hint: hex::encode(sig.hint),
                length: sig.signature.len(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// sign
// ---------------------------------------------------------------------------

fn sign(envelope: &str, secrets: &[String], passphrase: &str) -> Result<()> {
    let mut tx = parse_envelope(envelope, passphrase)?;

    let keypairs = secrets
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            Keypair::from_seed(seed.trim()).with_context(|| format!("secret #{} is invalid", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&Keypair> = keypairs.iter().collect();

    tx.sign(&refs).context("failed to sign")?;
    for kp in &keypairs {
        tracing::info!(signer = %kp.address(), "added signature");
    }
    println!("{}", tx.base64()?);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("txnbuild {}", env!("CARGO_PKG_VERSION"));
    println!("rustc    {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
