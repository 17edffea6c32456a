use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "capsule",
    about = "Capsule — time-locked encrypted messages on an append-only ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path of the ledger snapshot file.
    #[arg(long, global = true, default_value = "capsules.json")]
    pub ledger: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new capsule ledger owned by an identity
    Init(InitArgs),
    /// Seal a new time-locked capsule
    Seal(SealArgs),
    /// List all capsules with their public metadata
    List(ListArgs),
    /// Show one capsule's metadata and lock state
    Show(ShowArgs),
    /// Reveal and decrypt a capsule
    Open(OpenArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Owner identity: an account label or `acct:` hex address
    #[arg(long)]
    pub owner: String,
}

#[derive(Args)]
pub struct SealArgs {
    /// Sender identity (the authenticated caller)
    #[arg(long = "as")]
    pub sender: String,
    /// Receiver identity
    #[arg(long)]
    pub to: String,
    /// Unlock time: absolute seconds since epoch, or `+N` seconds from now
    #[arg(long)]
    pub unlock: String,
    /// Message text to seal
    #[arg(long)]
    pub text: String,
    /// Encryption passphrase
    #[arg(long)]
    pub passphrase: String,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct ShowArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct OpenArgs {
    pub id: u64,
    /// Caller identity (must be the sender or the receiver)
    #[arg(long = "as")]
    pub caller: String,
    /// Decryption passphrase
    #[arg(long)]
    pub passphrase: String,
}
