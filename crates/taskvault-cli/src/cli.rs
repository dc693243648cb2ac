use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use taskvault_core::VERSION;

/// Taskvault - end-to-end encryption for team task boards
#[derive(Parser)]
#[command(name = "taskvault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "TASKVAULT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Team the text belongs to
    #[arg(short, long, value_name = "ID")]
    pub team: String,

    /// Text to encrypt (read from stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Team the text belongs to
    #[arg(short, long, value_name = "ID")]
    pub team: String,

    /// Envelope string to decrypt (read from stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// String to classify (read from stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for the `board` command group
#[derive(Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommands,
}

/// Arguments shared by the board file commands
#[derive(Args)]
pub struct BoardFileArgs {
    /// Board JSON file to process
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum BoardCommands {
    /// Encrypt every task title and description on a board
    Encrypt(BoardFileArgs),

    /// Decrypt every task title and description on a board
    Decrypt(BoardFileArgs),
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a string for a team
    Encrypt(EncryptArgs),

    /// Decrypt a string for a team (legacy plaintext passes through)
    Decrypt(DecryptArgs),

    /// Report whether a string is Taskvault ciphertext
    Check(CheckArgs),

    /// Encrypt or decrypt a whole board file
    Board(BoardArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
