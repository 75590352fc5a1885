//! Terminal walkthrough of the transaction lifecycle.
//!
//! Derives keys, builds and signs a payment, decodes it back, adds a second
//! signer, and runs an authentication challenge from both sides.
//!
//! Run with:
//!   cargo run --example walkthrough

use std::time::{Duration, Instant};

use txnbuild::config::TEST_NETWORK_PASSPHRASE;
use txnbuild::{
    build_challenge_tx, verify_challenge_tx, verify_tx_signature, Asset, ChangeTrust, Keypair,
    Memo, Payment, SimpleAccount, TimeBounds, Transaction, TransactionBuilder,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]======================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn short(envelope: &str) -> String {
    if envelope.len() <= 48 {
        return envelope.to_string();
    }
    format!("{}...{} ({} chars)", &envelope[..24], &envelope[envelope.len() - 16..], envelope.len())
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    section(1, "Keys");
    let alice = Keypair::from_seed("SBPQUZ6G4FZNWFHKUWC5BEYWF6R52E3SEP7R3GWYSM2XTKGF5LNTWW4R")?;
    let bob = Keypair::random();
    info("alice", &alice.address());
    info("bob", &bob.address());

    section(2, "Build and sign a payment");
    let start = Instant::now();
    let mut payment = TransactionBuilder::new(
        SimpleAccount::new(alice.address(), 9605939170639897),
        TEST_NETWORK_PASSPHRASE,
    )
    .operation(Payment::new(bob.address(), "25.5", Asset::Native))
    .memo(Memo::text("rent, march"))
    .time_bounds(TimeBounds::timeout(300))
    .finish();
    let envelope = payment.build_sign_encode(&[&alice])?;
    timing("build + sign + encode", start.elapsed());
    info("sequence", &payment.source_account().sequence.to_string());
    info("fee", &format!("{} stroops", payment.transaction_fee()));
    info("hash", &payment.hash_hex()?);
    info("envelope", &short(&envelope));

    section(3, "Decode and check the signature");
    let decoded = Transaction::from_base64(&envelope, TEST_NETWORK_PASSPHRASE)?;
    verify_tx_signature(&decoded, &alice.address())?;
    success("alice's signature verifies against the decoded envelope");
    if verify_tx_signature(&decoded, &bob.address()).is_err() {
        success("bob has not signed");
    }

    section(4, "Two signers, one transaction");
    let usd = Asset::credit("USD", alice.address());
    let mut trust = ChangeTrust::with_limit(usd, "1000");
    trust.source_account = Some(bob.address());
    let mut shared = TransactionBuilder::new(
        SimpleAccount::new(alice.address(), payment.source_account().sequence),
        TEST_NETWORK_PASSPHRASE,
    )
    .operation(trust)
    .time_bounds(TimeBounds::timeout(300))
    .build()?;
    shared.sign(&[&alice, &bob])?;
    info("signatures", &shared.signatures().len().to_string());
    success("bob's trustline operation carries both signatures");

    section(5, "Authentication challenge");
    let start = Instant::now();
    let challenge = build_challenge_tx(
        "SBPQUZ6G4FZNWFHKUWC5BEYWF6R52E3SEP7R3GWYSM2XTKGF5LNTWW4R",
        &bob.address(),
        "walkthrough.example",
        TEST_NETWORK_PASSPHRASE,
        Duration::from_secs(300),
    )?;
    info("challenge", &short(&challenge));

    let mut response = Transaction::from_base64(&challenge, TEST_NETWORK_PASSPHRASE)?;
    response.sign(&[&bob])?;
    verify_challenge_tx(&response.base64()?, &alice.address(), TEST_NETWORK_PASSPHRASE)?;
    timing("challenge round trip", start.elapsed());
    success("bob proved control of the client account");

    println!();
    Ok(())
}
