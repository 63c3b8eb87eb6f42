// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pagecraft terminal driver
//!
//! Reads one line at a time from stdin. Lines starting with `/` are editing
//! commands; anything else is a chat turn with the assistant. Logs go to
//! stderr so stdout only carries replies.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use pagecraft_bridges::AssistantConfig;
use pagecraft_core::KeyValueStore;
use pagecraft_store::FileStore;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{Reply, Session};
use config::ShellConfig;

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = ShellConfig::parse();

    pagecraft_core::defaults::verify().context("block defaults are incomplete")?;

    let storage: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&args.data_dir)
            .with_context(|| format!("cannot open data dir {}", args.data_dir.display()))?,
    );
    let assistant = AssistantConfig::resolve(args.config.as_deref())
        .await
        .context("cannot load assistant config")?;

    tracing::info!(
        data_dir = %args.data_dir.display(),
        model = %assistant.model,
        "pagecraft ready"
    );

    let mut session = Session::open(storage, assistant, args.chat_mode());
    println!("{}", session.banner());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle(&line).await {
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Ok(Reply::Quit) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
