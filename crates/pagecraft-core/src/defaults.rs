// SPDX-License-Identifier: AGPL-3.0-or-later
//! Default content and styles per block variant
//!
//! Resolution depends on the variant alone. Every match here is exhaustive,
//! so a new [`BlockKind`] does not compile until it has both a content and a
//! style default.

use crate::block::{
    style_keys, BlockContent, BlockKind, ButtonContent, Column, ColumnsContent, FeatureItem,
    FeaturesContent, FooterContent, FormContent, FormField, HeaderContent, HeroContent,
    ImageContent, PricingContent, PricingPlan, StatItem, StatsContent, Styles, Testimonial,
    TestimonialsContent, TextContent,
};
use crate::traits::{BuilderError, Result};

/// Default payload for `kind`
pub fn default_content(kind: BlockKind) -> BlockContent {
    match kind {
        BlockKind::Hero => BlockContent::Hero(HeroContent::default()),
        BlockKind::Header => BlockContent::Header(HeaderContent::default()),
        BlockKind::Features => BlockContent::Features(FeaturesContent::default()),
        BlockKind::Footer => BlockContent::Footer(FooterContent::default()),
        BlockKind::Text => BlockContent::Text(TextContent::default()),
        BlockKind::Image => BlockContent::Image(ImageContent::default()),
        BlockKind::Button => BlockContent::Button(ButtonContent::default()),
        BlockKind::Form => BlockContent::Form(FormContent::default()),
        BlockKind::Columns => BlockContent::Columns(ColumnsContent::default()),
        BlockKind::Pricing => BlockContent::Pricing(PricingContent::default()),
        BlockKind::Stats => BlockContent::Stats(StatsContent::default()),
        BlockKind::Testimonials => BlockContent::Testimonials(TestimonialsContent::default()),
    }
}

fn base_styles() -> Styles {
    Styles::new()
        .with(style_keys::PADDING, 20)
        .with(style_keys::MARGIN, 0)
        .with(style_keys::BACKGROUND, "transparent")
}

/// Default styles for `kind`
pub fn default_styles(kind: BlockKind) -> Styles {
    let base = base_styles();
    match kind {
        BlockKind::Hero => base
            .with(style_keys::PADDING, 60)
            .with(style_keys::TEXT_ALIGN, "center")
            .with(style_keys::BACKGROUND, "#f3f4f6"),
        BlockKind::Header => base
            .with("display", "flex")
            .with("justifyContent", "space-between")
            .with("alignItems", "center")
            .with(style_keys::BACKGROUND, "#ffffff")
            .with("borderBottom", "1px solid #e5e7eb"),
        BlockKind::Footer => base
            .with(style_keys::BACKGROUND, "#1f2937")
            .with(style_keys::COLOR, "#f3f4f6")
            .with(style_keys::TEXT_ALIGN, "center"),
        BlockKind::Features
        | BlockKind::Text
        | BlockKind::Image
        | BlockKind::Button
        | BlockKind::Form
        | BlockKind::Columns
        | BlockKind::Pricing
        | BlockKind::Stats
        | BlockKind::Testimonials => base,
    }
}

/// Startup check that every variant resolves to content of its own kind.
pub fn verify() -> Result<()> {
    for kind in BlockKind::ALL {
        if default_content(kind).kind() != kind {
            return Err(BuilderError::MissingDefaults(kind));
        }
    }
    Ok(())
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Hero Headline".to_string(),
            subtitle: "Subheadline goes here".to_string(),
            cta: "Click Me".to_string(),
        }
    }
}

impl Default for HeaderContent {
    fn default() -> Self {
        Self {
            title: "Logo".to_string(),
            nav: vec![
                "Link 1".to_string(),
                "Link 2".to_string(),
                "Link 3".to_string(),
            ],
        }
    }
}

impl Default for FeaturesContent {
    fn default() -> Self {
        let item = |title: &str, desc: &str| FeatureItem {
            title: title.to_string(),
            desc: desc.to_string(),
        };
        Self {
            items: vec![
                item("Feature One", "Describe what makes this great."),
                item("Feature Two", "Explain the benefit in one line."),
                item("Feature Three", "Close with a reason to sign up."),
            ],
        }
    }
}

impl Default for FooterContent {
    fn default() -> Self {
        Self {
            text: "© 2024 Company Name. All rights reserved.".to_string(),
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Lorem ipsum dolor sit amet, consectetur adipiscing elit.".to_string(),
        }
    }
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            src: "https://via.placeholder.com/800x400".to_string(),
            alt: "Placeholder".to_string(),
        }
    }
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            label: "Button".to_string(),
            link: "#".to_string(),
        }
    }
}

impl Default for FormContent {
    fn default() -> Self {
        let field = |label: &str, kind: &str, placeholder: &str| FormField {
            label: label.to_string(),
            kind: kind.to_string(),
            placeholder: placeholder.to_string(),
        };
        Self {
            title: "Contact Us".to_string(),
            fields: vec![
                field("Name", "text", "Your name"),
                field("Email", "email", "you@example.com"),
                field("Message", "textarea", "How can we help?"),
            ],
            submit_label: "Send".to_string(),
        }
    }
}

impl Default for ColumnsContent {
    fn default() -> Self {
        let column = |title: &str| Column {
            title: title.to_string(),
            text: "Add supporting copy for this column.".to_string(),
        };
        Self {
            columns: vec![column("Column One"), column("Column Two")],
        }
    }
}

impl Default for PricingContent {
    fn default() -> Self {
        let plan = |name: &str, price: &str, features: &[&str]| PricingPlan {
            name: name.to_string(),
            price: price.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            cta: "Get Started".to_string(),
        };
        Self {
            plans: vec![
                plan("Free", "$0/mo", &["One app", "Community support"]),
                plan("Standard", "$24/mo", &["All apps", "Email support"]),
                plan("Custom", "$37/mo", &["All apps", "Multi-company", "Priority support"]),
            ],
        }
    }
}

impl Default for StatsContent {
    fn default() -> Self {
        let stat = |label: &str, value: &str| StatItem {
            label: label.to_string(),
            value: value.to_string(),
        };
        Self {
            items: vec![
                stat("Active users", "12M+"),
                stat("Apps", "80+"),
                stat("Customer satisfaction", "98%"),
            ],
        }
    }
}

impl Default for TestimonialsContent {
    fn default() -> Self {
        Self {
            items: vec![Testimonial {
                quote: "We replaced five tools with one and never looked back.".to_string(),
                author: "Jordan Lee".to_string(),
                role: "Operations Lead".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TextAlign;

    #[test]
    fn test_verify_passes() {
        verify().unwrap();
    }

    #[test]
    fn test_every_kind_resolves_to_itself() {
        for kind in BlockKind::ALL {
            assert_eq!(default_content(kind).kind(), kind);
            assert!(!default_styles(kind).is_empty(), "{kind} has no styles");
        }
    }

    #[test]
    fn test_hero_overrides_base() {
        let styles = default_styles(BlockKind::Hero);
        assert_eq!(styles.padding(), Some(60.0));
        assert_eq!(styles.margin(), Some(0.0));
        assert_eq!(styles.text_align(), Some(TextAlign::Center));
        assert_eq!(styles.background(), Some("#f3f4f6"));
    }

    #[test]
    fn test_plain_kinds_use_base() {
        let styles = default_styles(BlockKind::Text);
        assert_eq!(styles, base_styles());
        assert_eq!(styles.background(), Some("transparent"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for kind in BlockKind::ALL {
            assert_eq!(default_content(kind), default_content(kind));
            assert_eq!(default_styles(kind), default_styles(kind));
        }
    }
}
