//! Color palettes for the platform styles
//!
//! Each (style, mode) pair resolves to exactly one fully specified palette.
//! Palettes are plain structs rather than maps: a missing color is a compile
//! error, so the renderer never needs per-token fallbacks.

use crate::model::StyleVariant;

/// The complete named-color set for one style and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page and chat-area base color
    pub background: &'static str,
    /// Status-bar and header fill
    pub header: &'static str,
    /// Outgoing (right-hand) bubble fill
    pub sent_bubble: &'static str,
    /// Incoming (left-hand) bubble fill
    pub received_bubble: &'static str,
    /// Message body text
    pub text: &'static str,
    /// Timestamp text inside bubbles
    pub timestamp: &'static str,
    /// Input-bar background
    pub input_bar: &'static str,
    /// Text-box fill inside the input bar
    pub input_box: &'static str,
    /// Input-bar icon tint
    pub icon: &'static str,
    /// Mic button fill
    pub accent: &'static str,
    /// Avatar circle fill behind the initials
    pub avatar: &'static str,
    /// Delivered double-tick tint
    pub tick: &'static str,
}

const IOS_LIGHT: Palette = Palette {
    background: "#efeae2",
    header: "#075e54",
    sent_bubble: "#d9fdd3",
    received_bubble: "#ffffff",
    text: "#111b21",
    timestamp: "#667781",
    input_bar: "#f0f2f5",
    input_box: "#ffffff",
    icon: "#54656f",
    accent: "#00a884",
    avatar: "#128c7e",
    tick: "#53bdeb",
};

const IOS_DARK: Palette = Palette {
    background: "#0b141a",
    header: "#1f2c34",
    sent_bubble: "#005c4b",
    received_bubble: "#1f2c34",
    text: "#e9edef",
    timestamp: "#8696a0",
    input_bar: "#1f2c34",
    input_box: "#2a3942",
    icon: "#8696a0",
    accent: "#00a884",
    avatar: "#128c7e",
    tick: "#53bdeb",
};

const ANDROID_LIGHT: Palette = Palette {
    background: "#ece5dd",
    header: "#008069",
    sent_bubble: "#dcf8c6",
    received_bubble: "#ffffff",
    text: "#111b21",
    timestamp: "#667781",
    input_bar: "#f0f2f5",
    input_box: "#ffffff",
    icon: "#54656f",
    accent: "#00a884",
    avatar: "#128c7e",
    tick: "#4fc3f7",
};

const ANDROID_DARK: Palette = Palette {
    background: "#111b21",
    header: "#202c33",
    sent_bubble: "#005c4b",
    received_bubble: "#202c33",
    text: "#e9edef",
    timestamp: "#8696a0",
    input_bar: "#202c33",
    input_box: "#2a3942",
    icon: "#8696a0",
    accent: "#00a884",
    avatar: "#128c7e",
    tick: "#4fc3f7",
};

/// Resolve the palette for a style variant and color mode
pub fn resolve(variant: StyleVariant, dark: bool) -> &'static Palette {
    match (variant, dark) {
        (StyleVariant::Ios, false) => &IOS_LIGHT,
        (StyleVariant::Ios, true) => &IOS_DARK,
        (StyleVariant::Android, false) => &ANDROID_LIGHT,
        (StyleVariant::Android, true) => &ANDROID_DARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_and_dark_palettes_differ() {
        for variant in [StyleVariant::Ios, StyleVariant::Android] {
            let light = resolve(variant, false);
            let dark = resolve(variant, true);
            assert_ne!(light.background, dark.background);
            assert_ne!(light.sent_bubble, dark.sent_bubble);
            assert_ne!(light.text, dark.text);
        }
    }

    #[test]
    fn test_styles_have_distinct_accents() {
        let ios = resolve(StyleVariant::Ios, false);
        let android = resolve(StyleVariant::Android, false);
        assert_ne!(ios.sent_bubble, android.sent_bubble);
        assert_ne!(ios.header, android.header);
    }

    #[test]
    fn test_resolution_is_stable() {
        let first = resolve(StyleVariant::Ios, true);
        let second = resolve(StyleVariant::Ios, true);
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_all_colors_are_hex() {
        for variant in [StyleVariant::Ios, StyleVariant::Android] {
            for dark in [false, true] {
                let p = resolve(variant, dark);
                for color in [
                    p.background,
                    p.header,
                    p.sent_bubble,
                    p.received_bubble,
                    p.text,
                    p.timestamp,
                    p.input_bar,
                    p.input_box,
                    p.icon,
                    p.accent,
                    p.avatar,
                    p.tick,
                ] {
                    assert!(color.starts_with('#') && color.len() == 7, "bad color {color}");
                }
            }
        }
    }
}
