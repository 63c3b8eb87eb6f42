// SPDX-License-Identifier: AGPL-3.0-or-later
//! Block model for the page canvas
//!
//! A block is one typed content unit. The variant tag and its payload travel
//! together in [`BlockContent`], so a hero block can only ever carry hero
//! content. Styles stay an open string-keyed map since they are purely
//! presentational.
//!
//! On the wire (and in the persistence store) a block is the record
//! `{ "id", "type", "content", "styles" }`.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::traits::BuilderError;

/// Opaque block identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random identifier (UUIDv4 text form).
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for human display only.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The closed set of block variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Header,
    Features,
    Footer,
    Text,
    Image,
    Button,
    Form,
    Columns,
    Pricing,
    Stats,
    Testimonials,
}

impl BlockKind {
    /// All variants in palette order
    pub const ALL: [Self; 12] = [
        Self::Hero,
        Self::Header,
        Self::Features,
        Self::Text,
        Self::Image,
        Self::Button,
        Self::Footer,
        Self::Form,
        Self::Columns,
        Self::Pricing,
        Self::Stats,
        Self::Testimonials,
    ];

    /// Wire name, as used in the `type` field
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Header => "header",
            Self::Features => "features",
            Self::Footer => "footer",
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Form => "form",
            Self::Columns => "columns",
            Self::Pricing => "pricing",
            Self::Stats => "stats",
            Self::Testimonials => "testimonials",
        }
    }

    /// Palette label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hero => "Hero Section",
            Self::Header => "Navbar",
            Self::Features => "Feature Grid",
            Self::Footer => "Footer",
            Self::Text => "Text Block",
            Self::Image => "Image",
            Self::Button => "Button",
            Self::Form => "Form",
            Self::Columns => "Columns",
            Self::Pricing => "Pricing Table",
            Self::Stats => "Stats",
            Self::Testimonials => "Testimonials",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BuilderError::UnknownBlockKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    /// Call-to-action button label
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderContent {
    pub title: String,
    pub nav: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeaturesContent {
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureItem {
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonContent {
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormContent {
    pub title: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormField {
    pub label: String,
    /// Input kind (`text`, `email`, `textarea`, ...)
    pub kind: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnsContent {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Column {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingContent {
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    pub features: Vec<String>,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsContent {
    pub items: Vec<StatItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsContent {
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
}

/// Variant-shaped block payload.
///
/// Serializes as the bare inner record; the variant travels separately in
/// the block's `type` field and drives deserialization through
/// [`BlockContent::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Hero(HeroContent),
    Header(HeaderContent),
    Features(FeaturesContent),
    Footer(FooterContent),
    Text(TextContent),
    Image(ImageContent),
    Button(ButtonContent),
    Form(FormContent),
    Columns(ColumnsContent),
    Pricing(PricingContent),
    Stats(StatsContent),
    Testimonials(TestimonialsContent),
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Hero(_) => BlockKind::Hero,
            Self::Header(_) => BlockKind::Header,
            Self::Features(_) => BlockKind::Features,
            Self::Footer(_) => BlockKind::Footer,
            Self::Text(_) => BlockKind::Text,
            Self::Image(_) => BlockKind::Image,
            Self::Button(_) => BlockKind::Button,
            Self::Form(_) => BlockKind::Form,
            Self::Columns(_) => BlockKind::Columns,
            Self::Pricing(_) => BlockKind::Pricing,
            Self::Stats(_) => BlockKind::Stats,
            Self::Testimonials(_) => BlockKind::Testimonials,
        }
    }

    /// Build content of the given variant from a loosely-shaped JSON value.
    ///
    /// `null` yields the variant default. Objects may omit fields; missing
    /// fields take their default values. Anything other than an object or
    /// `null` is rejected.
    pub fn from_value(kind: BlockKind, value: Value) -> Result<Self, BuilderError> {
        match value {
            Value::Null => return Ok(crate::defaults::default_content(kind)),
            Value::Object(_) => {}
            other => {
                return Err(BuilderError::InvalidContent {
                    kind,
                    message: format!("expected an object, found {}", json_type_name(&other)),
                })
            }
        }

        let invalid = |e: serde_json::Error| BuilderError::InvalidContent {
            kind,
            message: e.to_string(),
        };

        let content = match kind {
            BlockKind::Hero => Self::Hero(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Header => Self::Header(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Features => Self::Features(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Footer => Self::Footer(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Text => Self::Text(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Image => Self::Image(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Button => Self::Button(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Form => Self::Form(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Columns => Self::Columns(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Pricing => Self::Pricing(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Stats => Self::Stats(serde_json::from_value(value).map_err(invalid)?),
            BlockKind::Testimonials => {
                Self::Testimonials(serde_json::from_value(value).map_err(invalid)?)
            }
        };
        Ok(content)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Well-known style keys. Any other key is allowed too.
pub mod style_keys {
    pub const PADDING: &str = "padding";
    pub const MARGIN: &str = "margin";
    pub const BACKGROUND: &str = "background";
    pub const COLOR: &str = "color";
    pub const FONT_SIZE: &str = "fontSize";
    pub const TEXT_ALIGN: &str = "textAlign";
    pub const BORDER_RADIUS: &str = "borderRadius";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Open mapping of presentational properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Styles(BTreeMap<String, Value>);

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow overlay: keys in `other` win.
    pub fn merged(&self, other: &Styles) -> Styles {
        let mut out = self.clone();
        for (key, value) in &other.0 {
            out.0.insert(key.clone(), value.clone());
        }
        out
    }

    pub fn padding(&self) -> Option<f64> {
        self.get(style_keys::PADDING).and_then(Value::as_f64)
    }

    pub fn margin(&self) -> Option<f64> {
        self.get(style_keys::MARGIN).and_then(Value::as_f64)
    }

    pub fn font_size(&self) -> Option<f64> {
        self.get(style_keys::FONT_SIZE).and_then(Value::as_f64)
    }

    pub fn border_radius(&self) -> Option<f64> {
        self.get(style_keys::BORDER_RADIUS).and_then(Value::as_f64)
    }

    pub fn background(&self) -> Option<&str> {
        self.get(style_keys::BACKGROUND).and_then(Value::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.get(style_keys::COLOR).and_then(Value::as_str)
    }

    pub fn text_align(&self) -> Option<TextAlign> {
        self.get(style_keys::TEXT_ALIGN)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

/// A single content unit on the canvas
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BlockRecord")]
pub struct Block {
    id: BlockId,
    content: BlockContent,
    styles: Styles,
}

impl Block {
    /// New block with a fresh id
    pub fn new(content: BlockContent, styles: Styles) -> Self {
        Self::from_parts(BlockId::new(), content, styles)
    }

    /// New block of `kind` with variant default content and styles
    pub fn with_defaults(kind: BlockKind) -> Self {
        Self::new(
            crate::defaults::default_content(kind),
            crate::defaults::default_styles(kind),
        )
    }

    /// Reassemble a block with a known id (hydration, tests)
    pub fn from_parts(id: BlockId, content: BlockContent, styles: Styles) -> Self {
        Self {
            id,
            content,
            styles,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub(crate) fn set_content(&mut self, content: BlockContent) {
        self.content = content;
    }

    pub(crate) fn set_styles(&mut self, styles: Styles) {
        self.styles = styles;
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("styles", &self.styles)?;
        state.end()
    }
}

/// Stored shape of a block, before the content is checked against its type
#[derive(Deserialize)]
struct BlockRecord {
    id: BlockId,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    styles: Option<Styles>,
}

impl TryFrom<BlockRecord> for Block {
    type Error = BuilderError;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        let content = BlockContent::from_value(record.kind, record.content)?;
        Ok(Self::from_parts(
            record.id,
            content,
            record.styles.unwrap_or_default(),
        ))
    }
}

/// Partial update for a block: each present part replaces the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockUpdate {
    pub content: Option<BlockContent>,
    pub styles: Option<Styles>,
}

impl BlockUpdate {
    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            styles: None,
        }
    }

    pub fn styles(styles: Styles) -> Self {
        Self {
            content: None,
            styles: Some(styles),
        }
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.styles.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_kind_wire_names() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        assert!(matches!(
            "carousel".parse::<BlockKind>(),
            Err(BuilderError::UnknownBlockKind(name)) if name == "carousel"
        ));
        assert_eq!(" Hero ".parse::<BlockKind>().unwrap(), BlockKind::Hero);
    }

    #[test]
    fn test_block_record_shape() {
        let block = Block::from_parts(
            BlockId::from("b1"),
            BlockContent::Text(TextContent {
                text: "hello".to_string(),
            }),
            Styles::new().with(style_keys::PADDING, 20),
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "type": "text",
                "content": { "text": "hello" },
                "styles": { "padding": 20 }
            })
        );
    }

    #[test]
    fn test_partial_content_takes_defaults() {
        let content =
            BlockContent::from_value(BlockKind::Hero, json!({ "title": "Launch day" })).unwrap();
        let BlockContent::Hero(hero) = content else {
            panic!("expected hero content");
        };
        assert_eq!(hero.title, "Launch day");
        assert_eq!(hero.cta, HeroContent::default().cta);
    }

    #[test]
    fn test_non_object_content_rejected() {
        let err = BlockContent::from_value(BlockKind::Image, json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidContent { kind: BlockKind::Image, .. }));
    }

    #[test]
    fn test_missing_styles_deserialize_empty() {
        let block: Block =
            serde_json::from_value(json!({ "id": "x", "type": "footer", "content": null }))
                .unwrap();
        assert!(block.styles().is_empty());
        assert_eq!(block.content(), &crate::defaults::default_content(BlockKind::Footer));
    }

    #[test]
    fn test_style_accessors() {
        let styles = Styles::new()
            .with(style_keys::TEXT_ALIGN, "center")
            .with(style_keys::FONT_SIZE, 18)
            .with("letterSpacing", "0.1em");
        assert_eq!(styles.text_align(), Some(TextAlign::Center));
        assert_eq!(styles.font_size(), Some(18.0));
        assert_eq!(styles.get("letterSpacing"), Some(&json!("0.1em")));
        assert_eq!(styles.padding(), None);
    }

    #[test]
    fn test_styles_merged_overlay() {
        let base = Styles::new().with("padding", 20).with("margin", 0);
        let merged = base.merged(&Styles::new().with("padding", 60));
        assert_eq!(merged.padding(), Some(60.0));
        assert_eq!(merged.margin(), Some(0.0));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(BlockId::from("abcdefghijk").short(), "abcdefgh");
        assert_eq!(BlockId::from("abc").short(), "abc");
    }
}
