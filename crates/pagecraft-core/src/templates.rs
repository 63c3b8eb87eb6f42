// SPDX-License-Identifier: AGPL-3.0-or-later
//! Named groups of blocks inserted in one step

use crate::block::{
    style_keys, Block, BlockContent, FeatureItem, FeaturesContent, FooterContent, HeaderContent,
    HeroContent, Styles,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Landing,
}

impl Template {
    pub const ALL: [Self; 1] = [Self::Landing];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Landing => "Landing Page",
        }
    }

    /// Look up a template by name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name.trim())
    }

    /// Fresh blocks for this template, each with a new id
    pub fn blocks(&self) -> Vec<Block> {
        match self {
            Self::Landing => landing(),
        }
    }
}

fn landing() -> Vec<Block> {
    let feature = |title: &str, desc: &str| FeatureItem {
        title: title.to_string(),
        desc: desc.to_string(),
    };

    vec![
        Block::new(
            BlockContent::Header(HeaderContent {
                title: "Brand".to_string(),
                nav: vec![
                    "Home".to_string(),
                    "Features".to_string(),
                    "Pricing".to_string(),
                ],
            }),
            Styles::new()
                .with(style_keys::BACKGROUND, "#ffffff")
                .with(style_keys::PADDING, 20),
        ),
        Block::new(
            BlockContent::Hero(HeroContent {
                title: "Build Faster".to_string(),
                subtitle: "The ultimate builder for modern web apps.".to_string(),
                cta: "Get Started".to_string(),
            }),
            Styles::new()
                .with(
                    style_keys::BACKGROUND,
                    "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
                )
                .with(style_keys::COLOR, "white")
                .with(style_keys::PADDING, 80)
                .with(style_keys::TEXT_ALIGN, "center"),
        ),
        Block::new(
            BlockContent::Features(FeaturesContent {
                items: vec![
                    feature("Fast", "Blazing fast performance"),
                    feature("Secure", "Enterprise grade security"),
                    feature("Easy", "Drag and drop interface"),
                ],
            }),
            Styles::new()
                .with(style_keys::PADDING, 60)
                .with(style_keys::BACKGROUND, "#f8fafc"),
        ),
        Block::new(
            BlockContent::Footer(FooterContent {
                text: "© 2024 Brand Inc.".to_string(),
            }),
            Styles::new()
                .with(style_keys::BACKGROUND, "#1a202c")
                .with(style_keys::COLOR, "#cbd5e0")
                .with(style_keys::PADDING, 40)
                .with(style_keys::TEXT_ALIGN, "center"),
        ),
    ]
}
