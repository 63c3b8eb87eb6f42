// SPDX-License-Identifier: AGPL-3.0-or-later
//! Command-line configuration

use clap::Parser;
use pagecraft_bridges::ChatMode;
use std::path::PathBuf;

/// Build pages block by block from the terminal.
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(about = "Block-based page builder with an AI assistant")]
pub struct ShellConfig {
    /// Directory for the saved document, theme and API key
    #[arg(long, default_value = ".pagecraft")]
    pub data_dir: PathBuf,

    /// Assistant settings file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Send chat text as-is; replies never edit the page
    #[arg(long)]
    pub plain: bool,
}

impl ShellConfig {
    pub fn chat_mode(&self) -> ChatMode {
        if self.plain {
            ChatMode::Plain
        } else {
            ChatMode::Builder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::parse_from(["pagecraft"]);
        assert_eq!(config.data_dir, PathBuf::from(".pagecraft"));
        assert_eq!(config.config, None);
        assert_eq!(config.chat_mode(), ChatMode::Builder);
    }

    #[test]
    fn test_flags() {
        let config = ShellConfig::parse_from([
            "pagecraft",
            "--data-dir",
            "/tmp/site",
            "--config",
            "assistant.toml",
            "--plain",
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/site"));
        assert_eq!(config.config, Some(PathBuf::from("assistant.toml")));
        assert_eq!(config.chat_mode(), ChatMode::Plain);
    }
}
