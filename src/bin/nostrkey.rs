//! Key helper for quill users: turns hex keys into the bech32 forms the
//! login and new-post forms expect.

use clap::{Parser, Subcommand};
use nostr_sdk::Keys;

use quill::identity::{npub_from_public_hex, KeyEncodings};

#[derive(Parser, Debug)]
#[command(name = "nostrkey", about = "Encode Nostr keys as nsec / npub")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hex secret key to nsec, hex public key and npub.
    EncodeKey { secret_hex: String },
    /// Hex public key to npub.
    EncodePublicKey { public_hex: String },
    /// A fresh random keypair.
    Generate,
}

fn print_encodings(encodings: &KeyEncodings) {
    println!("nsec: {}", encodings.nsec);
    println!("pk: {}", encodings.public_hex);
    println!("npub: {}", encodings.npub);
}

fn main() -> anyhow::Result<()> {
    match Args::parse().command {
        Command::EncodeKey { secret_hex } => {
            println!("Given hex secret key: {secret_hex}");
            print_encodings(&KeyEncodings::from_secret_hex(&secret_hex)?);
        }
        Command::EncodePublicKey { public_hex } => {
            println!("Given hex public key: {public_hex}");
            println!("npub: {}", npub_from_public_hex(&public_hex)?);
        }
        Command::Generate => print_encodings(&KeyEncodings::from_keys(&Keys::generate())?),
    }
    Ok(())
}
