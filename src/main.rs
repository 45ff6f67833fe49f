use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use rsa_messenger::app::{Config, LocalDirectory, Messenger};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "messenger", version, about = "Exchange RSA keys and messages through a key directory")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder holding public.key, private.key and contact keys
    #[arg(long, global = true)]
    key_dir: Option<PathBuf>,

    /// Root folder of the key/message directory
    #[arg(long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair and store it locally as public.key and private.key.
    /// It is not associated with an email address until sent with send-key.
    KeyGen {
        /// Modulus size in bits, a multiple of 8
        #[arg(allow_negative_numbers = true)]
        keysize: i64,
    },
    /// Publish the public key for <email> and register the address as one
    /// whose messages can be decoded locally
    SendKey { email: String },
    /// Retrieve the public key of <email>
    GetKey { email: String },
    /// Encrypt <plaintext> for <email> and post it
    SendMsg { email: String, plaintext: String },
    /// Retrieve the message for <email> and decode it if possible
    GetMsg { email: String },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.key_dir {
        config = config.with_key_dir(dir);
    }
    if let Some(dir) = &cli.directory {
        config = config.with_directory(dir);
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let directory = LocalDirectory::new(config.directory.clone());
    let messenger = Messenger::new(config, directory);

    match cli.command {
        Command::KeyGen { keysize } => messenger.key_gen(keysize)?,
        Command::SendKey { email } => messenger.send_key(&email)?,
        Command::GetKey { email } => messenger.get_key(&email)?,
        Command::SendMsg { email, plaintext } => messenger.send_msg(&email, &plaintext)?,
        Command::GetMsg { email } => println!("{}", messenger.get_msg(&email)?),
    }
    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
