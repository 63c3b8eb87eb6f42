// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line commands for a builder session
//!
//! Every command returns `Result<Reply, String>`; the error string is shown
//! to the user as-is. Blocks are referenced by 1-based position or by an id
//! prefix, and most commands fall back to the selected block.

use pagecraft_bridges::{
    remix_theme, ApiKeyStore, AssistantConfig, AssistantError, ChatMode, ChatSession,
    GeminiClient, LanguageAssistant, TurnOutcome,
};
use pagecraft_core::reorder::{keyboard_drop, Direction};
use pagecraft_core::theme::ThemeColors;
use pagecraft_core::{
    BlockContent, BlockId, BlockKind, BlockUpdate, DeviceType, DocumentStore, DragSession,
    KeyValueStore, Template, ThemePatch, ThemeStore, Viewport,
};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

type CommandResult = Result<Reply, String>;

const NEEDS_KEY: &str =
    "Setup Gemini API: paste your key with /key <API key>. It is stored locally.";

const HELP: &str = "\
Type a request to chat with the assistant, or use a command:
  /add <type>                  append a block (hero, header, features, ...)
  /template [name]             insert a template, or list them
  /list                        show the page (* marks the selection)
  /select <block>|none         select a block
  /show [block]                print a block as JSON
  /remove [block]              delete a block
  /move <block> <target>       drop a block onto another one
  /up [block], /down [block]   move a block one slot
  /style <block> <key> [value] set a style; no value removes it
  /content <block> <json>      merge fields into a block's content
  /theme [font|radius|color|reset] ...
  /remix                       let the assistant pick a theme
  /device [desktop|tablet|mobile], /zoom [factor]
  /key [API key|clear]         set the assistant key
  /export                      print the page as JSON
  /clear                       remove every block
  /quit";

/// Builder state behind the terminal: stores, chat and preview settings
pub struct Session {
    documents: DocumentStore,
    themes: ThemeStore,
    keys: ApiKeyStore,
    config: AssistantConfig,
    assistant: Box<dyn LanguageAssistant>,
    chat: ChatSession,
    viewport: Viewport,
    drag: DragSession,
}

/// A saved key wins over one from config or the environment.
fn connect(config: &AssistantConfig, keys: &ApiKeyStore) -> Box<dyn LanguageAssistant> {
    let mut client = GeminiClient::new(config);
    if keys.is_set() {
        client.set_api_key(keys.api_key());
    }
    Box::new(client)
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn summary(content: &BlockContent) -> String {
    let count = |n: usize, what: &str| format!("{n} {what}");
    let text = match content {
        BlockContent::Hero(c) => c.title.clone(),
        BlockContent::Header(c) => c.title.clone(),
        BlockContent::Features(c) => count(c.items.len(), "features"),
        BlockContent::Footer(c) => c.text.clone(),
        BlockContent::Text(c) => c.text.clone(),
        BlockContent::Image(c) => c.alt.clone(),
        BlockContent::Button(c) => c.label.clone(),
        BlockContent::Form(c) => c.title.clone(),
        BlockContent::Columns(c) => count(c.columns.len(), "columns"),
        BlockContent::Pricing(c) => count(c.plans.len(), "plans"),
        BlockContent::Stats(c) => count(c.items.len(), "stats"),
        BlockContent::Testimonials(c) => count(c.items.len(), "testimonials"),
    };
    truncate(&text, 40)
}

/// Style values are JSON when they parse as JSON, plain strings otherwise.
fn style_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl Session {
    pub fn open(storage: Arc<dyn KeyValueStore>, config: AssistantConfig, mode: ChatMode) -> Self {
        let keys = ApiKeyStore::open(storage.clone());
        let assistant = connect(&config, &keys);
        Self::build(storage, keys, config, mode, assistant)
    }

    fn build(
        storage: Arc<dyn KeyValueStore>,
        keys: ApiKeyStore,
        config: AssistantConfig,
        mode: ChatMode,
        assistant: Box<dyn LanguageAssistant>,
    ) -> Self {
        Self {
            documents: DocumentStore::open(storage.clone()),
            themes: ThemeStore::open(storage),
            keys,
            config,
            assistant,
            chat: ChatSession::new(mode),
            viewport: Viewport::default(),
            drag: DragSession::new(),
        }
    }

    pub fn banner(&self) -> String {
        let mut banner = format!(
            "Pagecraft: {} blocks loaded. Type /help for commands.",
            self.documents.document().len()
        );
        if !self.assistant.has_credential() {
            banner.push('\n');
            banner.push_str(NEEDS_KEY);
        }
        banner
    }

    pub async fn handle(&mut self, line: &str) -> CommandResult {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Ok(self.chat(line).await);
        };
        let (name, rest) = split_word(command);

        match name {
            "help" | "?" => Ok(Reply::text(HELP)),
            "quit" | "exit" => Ok(Reply::Quit),
            "list" | "ls" => Ok(Reply::text(self.list())),
            "add" => self.add(rest),
            "template" => self.template(rest),
            "select" => self.select(rest),
            "show" => self.show(rest),
            "remove" | "rm" => self.remove(rest),
            "move" => self.move_block(rest),
            "up" => self.nudge(rest, Direction::Up),
            "down" => self.nudge(rest, Direction::Down),
            "style" => self.style(rest),
            "content" => self.content(rest),
            "theme" => self.theme(rest),
            "remix" => self.remix().await,
            "device" => self.device(rest),
            "zoom" => self.zoom(rest),
            "key" => Ok(self.key(rest)),
            "export" => self.export(),
            "clear" => {
                self.documents.clear();
                Ok(Reply::text("Cleared the page"))
            }
            other => Err(format!("Unknown command: /{other} (try /help)")),
        }
    }

    async fn chat(&mut self, line: &str) -> Reply {
        let outcome = self
            .chat
            .send(self.assistant.as_ref(), &mut self.documents, line)
            .await;
        Reply::Text(match outcome {
            TurnOutcome::Ignored => String::new(),
            TurnOutcome::CredentialRequired => NEEDS_KEY.to_string(),
            TurnOutcome::Replied {
                text,
                added: Some(id),
            } => format!("{text}\n[added block {}]", id.short()),
            TurnOutcome::Replied { text, added: None } => text,
            TurnOutcome::Failed { text } => text,
        })
    }

    /// Position or id prefix; empty means the selection.
    fn resolve(&self, reference: &str) -> Result<BlockId, String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return self
                .documents
                .selection()
                .cloned()
                .ok_or_else(|| "No block selected".to_string());
        }

        let blocks = self.documents.blocks();
        if let Ok(position) = reference.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| blocks.get(index))
                .map(|block| block.id().clone())
                .ok_or_else(|| format!("No block at position {position}"));
        }

        let mut matches = blocks
            .iter()
            .filter(|block| block.id().as_str().starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(block), None) => Ok(block.id().clone()),
            (None, _) => Err(format!("No block matches '{reference}'")),
            _ => Err(format!("'{reference}' matches more than one block")),
        }
    }

    fn list(&self) -> String {
        let blocks = self.documents.blocks();
        if blocks.is_empty() {
            return "The page is empty. Try /add hero or /template landing.".to_string();
        }
        let selection = self.documents.selection();
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let marker = if selection == Some(block.id()) { '*' } else { ' ' };
                format!(
                    "{marker}{:>2}. {:<12} {}  {}",
                    index + 1,
                    block.kind().as_str(),
                    block.id().short(),
                    summary(block.content())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn add(&mut self, rest: &str) -> CommandResult {
        let kind: BlockKind = rest.parse().map_err(|e| {
            let known: Vec<_> = BlockKind::ALL.iter().map(|k| k.as_str()).collect();
            format!("{e}. Known types: {}", known.join(", "))
        })?;
        let id = self.documents.add_block(kind);
        Ok(Reply::text(format!(
            "Added {kind} block {} ({})",
            id.short(),
            kind.label()
        )))
    }

    fn template(&mut self, rest: &str) -> CommandResult {
        if rest.is_empty() {
            let names: Vec<_> = Template::ALL
                .iter()
                .map(|t| format!("  {} ({})", t.name(), t.label()))
                .collect();
            return Ok(Reply::text(format!("Templates:\n{}", names.join("\n"))));
        }
        let template =
            Template::from_name(rest).ok_or_else(|| format!("Unknown template: {rest}"))?;
        let count = self.documents.insert_template(template.name());
        Ok(Reply::text(format!(
            "Inserted {} ({count} blocks)",
            template.label()
        )))
    }

    fn select(&mut self, rest: &str) -> CommandResult {
        match rest {
            "" => Err("Usage: /select <block>|none".to_string()),
            "none" => {
                self.documents.select_block(None);
                Ok(Reply::text("Selection cleared"))
            }
            reference => {
                let id = self.resolve(reference)?;
                let reply = format!("Selected {}", id.short());
                self.documents.select_block(Some(id));
                Ok(Reply::text(reply))
            }
        }
    }

    fn show(&self, rest: &str) -> CommandResult {
        let id = self.resolve(rest)?;
        let block = self
            .documents
            .document()
            .get(&id)
            .ok_or_else(|| format!("No block {id}"))?;
        serde_json::to_string_pretty(block)
            .map(Reply::Text)
            .map_err(|e| e.to_string())
    }

    fn remove(&mut self, rest: &str) -> CommandResult {
        let id = self.resolve(rest)?;
        self.documents.remove_block(&id);
        Ok(Reply::text(format!("Removed block {}", id.short())))
    }

    /// Runs the same drop a pointer gesture would produce.
    fn move_block(&mut self, rest: &str) -> CommandResult {
        let (active, over) = split_word(rest);
        if active.is_empty() || over.is_empty() || over.contains(char::is_whitespace) {
            return Err("Usage: /move <block> <target>".to_string());
        }
        let active = self.resolve(active)?;
        let over = self.resolve(over)?;

        self.drag.start(active);
        self.drag.hover(over);
        let moved = self
            .drag
            .release()
            .is_some_and(|end| self.documents.apply_drag(&end));
        Ok(Reply::text(if moved { "Moved" } else { "Nothing to move" }))
    }

    fn nudge(&mut self, rest: &str, direction: Direction) -> CommandResult {
        let id = self.resolve(rest)?;
        let end = keyboard_drop(self.documents.document(), &id, direction);
        if self.documents.apply_drag(&end) {
            Ok(Reply::text("Moved"))
        } else {
            Ok(Reply::text(match direction {
                Direction::Up => "Already at the top",
                Direction::Down => "Already at the bottom",
            }))
        }
    }

    fn style(&mut self, rest: &str) -> CommandResult {
        let (reference, rest) = split_word(rest);
        let (key, value) = split_word(rest);
        if key.is_empty() {
            return Err("Usage: /style <block> <key> [value]".to_string());
        }
        let id = self.resolve(reference)?;
        let mut styles = self
            .documents
            .document()
            .get(&id)
            .map(|block| block.styles().clone())
            .ok_or_else(|| format!("No block {id}"))?;

        if value.is_empty() {
            styles.remove(key);
        } else {
            styles.set(key, style_value(value));
        }
        let changed = self.documents.update_block(&id, BlockUpdate::styles(styles));
        Ok(Reply::text(if changed {
            "Styles updated"
        } else {
            "Styles unchanged"
        }))
    }

    fn content(&mut self, rest: &str) -> CommandResult {
        let (reference, json) = split_word(rest);
        if json.is_empty() {
            return Err("Usage: /content <block> <json>".to_string());
        }
        let id = self.resolve(reference)?;
        let patch: Value = serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {e}"))?;
        let Value::Object(patch) = patch else {
            return Err("Content must be a JSON object".to_string());
        };

        let block = self
            .documents
            .document()
            .get(&id)
            .ok_or_else(|| format!("No block {id}"))?;
        let mut merged = serde_json::to_value(block.content()).map_err(|e| e.to_string())?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(patch);
        }
        let content = BlockContent::from_value(block.kind(), merged).map_err(|e| e.to_string())?;

        let changed = self.documents.update_block(&id, BlockUpdate::content(content));
        Ok(Reply::text(if changed {
            "Content updated"
        } else {
            "Content unchanged"
        }))
    }

    fn theme(&mut self, rest: &str) -> CommandResult {
        let (field, value) = split_word(rest);
        let patch = match field {
            "" => {
                return serde_json::to_string_pretty(self.themes.theme())
                    .map(Reply::Text)
                    .map_err(|e| e.to_string())
            }
            "reset" => {
                self.themes.reset();
                return Ok(Reply::text("Theme reset"));
            }
            "font" if !value.is_empty() => ThemePatch::font(value),
            "radius" => {
                let px = value
                    .trim_end_matches("px")
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid radius: {value}"))?;
                ThemePatch::border_radius_px(px)
            }
            "color" => {
                let (name, hex) = split_word(value);
                if hex.is_empty() {
                    return Err("Usage: /theme color <name> <value>".to_string());
                }
                let mut colors: ThemeColors = self.themes.theme().colors.clone();
                let slot = match name {
                    "primary" => &mut colors.primary,
                    "secondary" => &mut colors.secondary,
                    "accent" => &mut colors.accent,
                    "background" => &mut colors.background,
                    "text" => &mut colors.text,
                    other => return Err(format!("Unknown color: {other}")),
                };
                *slot = hex.to_string();
                ThemePatch::colors(colors)
            }
            _ => return Err("Usage: /theme [font <family>|radius <px>|color <name> <value>|reset]".to_string()),
        };
        let changed = self.themes.update(patch);
        Ok(Reply::text(if changed {
            "Theme updated"
        } else {
            "Theme unchanged"
        }))
    }

    async fn remix(&mut self) -> CommandResult {
        match remix_theme(self.assistant.as_ref(), &mut self.themes).await {
            Ok(_) => {
                let theme = self.themes.theme();
                Ok(Reply::text(format!(
                    "Theme remixed: {} with primary {}",
                    theme.font, theme.colors.primary
                )))
            }
            Err(AssistantError::MissingApiKey) => {
                Err("Please enter your Gemini API key with /key to use Magic Remix.".to_string())
            }
            Err(e) => Err(format!("Remix failed: {e}")),
        }
    }

    fn device(&mut self, rest: &str) -> CommandResult {
        if !rest.is_empty() {
            let device: DeviceType = rest.parse()?;
            self.viewport.set_device(device);
        }
        let device = self.viewport.device();
        let width = device
            .canvas_width()
            .map_or_else(|| "full width".to_string(), |w| format!("{w}px"));
        Ok(Reply::text(format!("Previewing on {} ({width})", device.as_str())))
    }

    fn zoom(&mut self, rest: &str) -> CommandResult {
        if !rest.is_empty() {
            let zoom = match rest.strip_suffix('%') {
                Some(percent) => percent.trim().parse::<f32>().map(|p| p / 100.0),
                None => rest.parse::<f32>(),
            }
            .map_err(|_| format!("Invalid zoom: {rest}"))?;
            if !self.viewport.set_zoom(zoom) {
                return Err("Zoom must be a positive number".to_string());
            }
        }
        Ok(Reply::text(format!(
            "Zoom {:.0}%",
            self.viewport.zoom() * 100.0
        )))
    }

    fn key(&mut self, rest: &str) -> Reply {
        match rest {
            "" => Reply::text(if self.assistant.has_credential() {
                "API key is set"
            } else {
                "No API key set"
            }),
            "clear" => {
                self.keys.clear();
                self.assistant = connect(&self.config, &self.keys);
                Reply::text("API key removed")
            }
            key => {
                self.keys.set(key);
                self.assistant = connect(&self.config, &self.keys);
                Reply::text("API key saved")
            }
        }
    }

    fn export(&self) -> CommandResult {
        serde_json::to_string_pretty(self.documents.document())
            .map(Reply::Text)
            .map_err(|e| e.to_string())
    }
}
