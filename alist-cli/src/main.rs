//! AList command line client.

mod store;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alist_sdk::{AList, AListUser, Downloader};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use store::{StoredUser, UserStore, DEFAULT_MARKER};

#[derive(Parser, Debug)]
#[command(name = "alist-cli")]
#[command(about = "Command line client for AList servers", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage stored server credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Download a URL over multiple range connections
    Download {
        /// Source URL
        url: String,
        /// Destination file
        output: PathBuf,
        /// Number of concurrent connections
        #[arg(long, short, env = "ALIST_CONNECTIONS", default_value_t = 4)]
        connections: u64,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommands {
    /// Verify and store credentials given as username:password@endpoint
    Add {
        /// Credential URI, e.g. admin:123456@http://alist.example.com
        uri: String,
        /// Mark this account as the default
        #[arg(long)]
        default: bool,
        /// Free-form label shown in listings
        #[arg(long, default_value = "")]
        tag: String,
        /// Overwrite an existing record for the same username
        #[arg(long)]
        cover: bool,
    },
    /// Remove stored credentials
    Rm {
        /// Username to remove
        username: String,
    },
    /// List stored credentials
    Ls,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Add {
                uri,
                default,
                tag,
                cover,
            } => auth_add(&uri, default, tag, cover).await,
            AuthCommands::Rm { username } => auth_rm(&username),
            AuthCommands::Ls => auth_ls(),
        },
        Commands::Download {
            url,
            output,
            connections,
        } => download(url, output, connections).await,
    }
}

async fn auth_add(uri: &str, default: bool, tag: String, cover: bool) -> Result<()> {
    let (user, endpoint) = AListUser::from_uri(uri)?;
    if user.username().contains(DEFAULT_MARKER) {
        bail!("username may not contain the reserved marker {DEFAULT_MARKER:?}");
    }

    // Make sure the endpoint is real before persisting anything.
    let client = AList::new(&endpoint)?;
    if !client.ping().await.context("endpoint unreachable")? {
        bail!("{endpoint} did not answer the ping probe; is it an AList server?");
    }

    let store = UserStore::open_default()?;
    let record = StoredUser {
        username: user.username().to_string(),
        password_hash: user.password_hash().to_string(),
        endpoint,
        tag,
    };
    store.save(&record, default, cover)?;
    info!(
        "stored credentials for {} ({})",
        record.username, record.endpoint
    );
    Ok(())
}

fn auth_rm(username: &str) -> Result<()> {
    let store = UserStore::open_default()?;
    if store.remove(username)? {
        info!("removed credentials for {username}");
        Ok(())
    } else {
        bail!("no stored credentials for {username}");
    }
}

fn auth_ls() -> Result<()> {
    let store = UserStore::open_default()?;
    let records = store.list()?;
    if records.is_empty() {
        println!("no stored credentials ({})", store.dir().display());
        return Ok(());
    }

    let name_width = records
        .iter()
        .map(|(r, _)| r.username.len())
        .max()
        .unwrap_or(0)
        .max("USERNAME".len());
    let tag_width = records
        .iter()
        .map(|(r, _)| r.tag.len())
        .max()
        .unwrap_or(0)
        .max("TAG".len());

    println!("{:<name_width$}  {:<7}  {:<tag_width$}  ENDPOINT", "USERNAME", "KIND", "TAG");
    for (record, is_default) in records {
        let kind = if is_default { "default" } else { "user" };
        println!(
            "{:<name_width$}  {kind:<7}  {:<tag_width$}  {}",
            record.username, record.tag, record.endpoint
        );
    }
    Ok(())
}

async fn download(url: String, output: PathBuf, connections: u64) -> Result<()> {
    let downloader = Arc::new(Downloader::new(url).with_connections(connections));
    let task = tokio::spawn({
        let downloader = Arc::clone(&downloader);
        let output = output.clone();
        async move { downloader.run(&output).await }
    });

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )?
        .progress_chars("#>-"),
    );
    while !task.is_finished() {
        bar.set_length(downloader.total());
        bar.set_position(downloader.progress());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let stats = task.await.context("download task panicked")??;
    bar.set_length(stats.bytes);
    bar.set_position(stats.bytes);
    bar.finish();

    info!(
        "wrote {} bytes to {} in {:.1?}",
        stats.bytes,
        output.display(),
        stats.elapsed
    );
    Ok(())
}
