//! # CLI Interface
//!
//! Defines the command-line argument structure for `txnbuild` using
//! `clap` derive. Envelopes are passed as base64 arguments and results are
//! written to stdout, so commands compose with pipes.

use clap::{Args, Parser, Subcommand};

use txnbuild::config::RECOMMENDED_CHALLENGE_TIMEOUT;

/// Offline transaction tool.
///
/// Decodes, hashes and signs transaction envelopes, and builds and verifies
/// authentication challenges. Never touches the network.
#[derive(Parser, Debug)]
#[command(
    name = "txnbuild",
    about = "Decode, sign and challenge ledger transactions",
    version,
    propagate_version = true
)]
pub struct TxnbuildCli {
    /// Network the signatures are bound to: `public`, `test`, or a full
    /// passphrase for a private network.
    #[arg(long, short = 'n', global = true, env = "TXNBUILD_NETWORK", default_value = "test")]
    pub network: String,

    /// Log output format: `pretty` or `json`. Logs go to stderr.
    #[arg(long, global = true, env = "TXNBUILD_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a JSON summary of an envelope.
    Decode(EnvelopeArgs),
    /// Print the hex hash signers sign.
    Hash(EnvelopeArgs),
    /// Add signatures to an envelope and print the result.
    Sign(SignArgs),
    /// Authentication challenges.
    #[command(subcommand)]
    Challenge(ChallengeCommands),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct EnvelopeArgs {
    /// Base64 transaction envelope.
    pub envelope: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Base64 transaction envelope.
    pub envelope: String,

    /// `S...` secret seed. Repeat the flag, or separate with commas, to sign
    /// with several keys.
    ///
    /// Prefer the environment variable over the flag so the seed stays out
    /// of shell history.
    #[arg(
        long = "secret",
        short = 's',
        env = "TXNBUILD_SECRET",
        value_delimiter = ',',
        required = true,
        hide_env_values = true
    )]
    pub secrets: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ChallengeCommands {
    /// Build a server-signed challenge for a client account.
    Build(ChallengeBuildArgs),
    /// Verify a challenge co-signed by the client.
    Verify(ChallengeVerifyArgs),
}

#[derive(Args, Debug)]
pub struct ChallengeBuildArgs {
    /// `S...` secret seed of the server account.
    #[arg(long = "secret", short = 's', env = "TXNBUILD_SECRET", hide_env_values = true)]
    pub server_secret: String,

    /// `G...` address of the client account.
    #[arg(long)]
    pub client: String,

    /// Anchor name. The data entry is named `<anchor> auth`.
    #[arg(long)]
    pub anchor: String,

    /// Validity window in seconds.
    #[arg(long, default_value_t = RECOMMENDED_CHALLENGE_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(Args, Debug)]
pub struct ChallengeVerifyArgs {
    /// Base64 challenge envelope.
    pub envelope: String,

    /// `G...` address of the server account.
    #[arg(long)]
    pub server: String,
}
