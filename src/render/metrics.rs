//! Fixed layout numbers for each platform style

use crate::model::StyleVariant;

/// Layout constants for one style variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Status-bar height in px
    pub status_bar_height: u32,
    /// Header height in px
    pub header_height: u32,
    /// Input-bar height in px
    pub input_bar_height: u32,
    /// Bubble corner radius in px
    pub bubble_radius: f64,
    /// Maximum bubble width as a percentage of the chat area
    pub bubble_max_width: u32,
    /// Top margin opening a sender group
    pub group_start_margin: u32,
    /// Top margin between bubbles inside a group
    pub continuation_margin: u32,
    /// Bottom margin closing a sender group
    pub group_end_margin: u32,
    /// Whether the first bubble of a group gets a directional tail
    pub bubble_tail: bool,
    /// Static clock shown in the status bar
    pub clock: &'static str,
    /// Device-scale factor the capture applies
    pub device_scale: f64,
}

const IOS: Metrics = Metrics {
    status_bar_height: 44,
    header_height: 56,
    input_bar_height: 56,
    bubble_radius: 7.5,
    bubble_max_width: 85,
    group_start_margin: 8,
    continuation_margin: 2,
    group_end_margin: 4,
    bubble_tail: false,
    clock: "9:41",
    device_scale: 2.0,
};

const ANDROID: Metrics = Metrics {
    status_bar_height: 24,
    header_height: 56,
    input_bar_height: 56,
    bubble_radius: 8.0,
    bubble_max_width: 85,
    group_start_margin: 8,
    continuation_margin: 2,
    group_end_margin: 4,
    bubble_tail: true,
    clock: "12:30",
    device_scale: 3.0,
};

impl Metrics {
    /// The layout constants for a style variant
    pub fn for_variant(variant: StyleVariant) -> &'static Metrics {
        match variant {
            StyleVariant::Ios => &IOS,
            StyleVariant::Android => &ANDROID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_have_distinct_metrics() {
        let ios = Metrics::for_variant(StyleVariant::Ios);
        let android = Metrics::for_variant(StyleVariant::Android);
        assert!(!ios.bubble_tail);
        assert!(android.bubble_tail);
        assert_ne!(ios.device_scale, android.device_scale);
        assert_ne!(ios.clock, android.clock);
    }

    #[test]
    fn test_group_margins_are_ordered() {
        for variant in [StyleVariant::Ios, StyleVariant::Android] {
            let m = Metrics::for_variant(variant);
            assert!(m.group_start_margin > m.continuation_margin);
        }
    }
}
