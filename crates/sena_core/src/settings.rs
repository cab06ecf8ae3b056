//! crates/sena_core/src/settings.rs
//!
//! The accessibility settings value object and the partial patch used to
//! derive a new value from the previous one.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DEFAULT_FONT_SIZE_PX: u32 = 16;
pub const FONT_SIZE_RANGE_PX: RangeInclusive<u32> = 12..=32;
pub const SPEECH_SPEED_RANGE: RangeInclusive<f32> = 0.5..=2.0;
pub const SPEECH_VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// User-editable accessibility preferences. Every field always holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    #[serde(rename = "fontSize")]
    pub font_size_px: u32,
    pub high_contrast: bool,
    pub tts_enabled: bool,
    pub auto_read_messages: bool,
    pub reduced_motion: bool,
    pub large_click_targets: bool,
    pub speech_speed: f32,
    pub speech_volume: f32,
    pub keyboard_navigation: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE_PX,
            high_contrast: false,
            tts_enabled: false,
            auto_read_messages: false,
            reduced_motion: false,
            large_click_targets: false,
            speech_speed: 1.0,
            speech_volume: 0.7,
            keyboard_navigation: true,
        }
    }
}

/// A partial update. Absent fields keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(rename = "fontSize")]
    pub font_size_px: Option<u32>,
    pub high_contrast: Option<bool>,
    pub tts_enabled: Option<bool>,
    pub auto_read_messages: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub large_click_targets: Option<bool>,
    pub speech_speed: Option<f32>,
    pub speech_volume: Option<f32>,
    pub keyboard_navigation: Option<bool>,
}

impl AccessibilitySettings {
    /// Builds the next settings value from `self` and `patch`.
    ///
    /// Numeric fields are clamped into their sane ranges; a non-finite
    /// float in the patch is ignored and the previous value is kept.
    pub fn apply(&self, patch: &SettingsPatch) -> Self {
        Self {
            font_size_px: patch
                .font_size_px
                .map(|px| px.clamp(*FONT_SIZE_RANGE_PX.start(), *FONT_SIZE_RANGE_PX.end()))
                .unwrap_or(self.font_size_px),
            high_contrast: patch.high_contrast.unwrap_or(self.high_contrast),
            tts_enabled: patch.tts_enabled.unwrap_or(self.tts_enabled),
            auto_read_messages: patch.auto_read_messages.unwrap_or(self.auto_read_messages),
            reduced_motion: patch.reduced_motion.unwrap_or(self.reduced_motion),
            large_click_targets: patch.large_click_targets.unwrap_or(self.large_click_targets),
            speech_speed: clamp_finite(patch.speech_speed, &SPEECH_SPEED_RANGE)
                .unwrap_or(self.speech_speed),
            speech_volume: clamp_finite(patch.speech_volume, &SPEECH_VOLUME_RANGE)
                .unwrap_or(self.speech_volume),
            keyboard_navigation: patch.keyboard_navigation.unwrap_or(self.keyboard_navigation),
        }
    }
}

fn clamp_finite(value: Option<f32>, range: &RangeInclusive<f32>) -> Option<f32> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(*range.start(), *range.end()))
}

//=========================================================================================
// Presentation Hints
//=========================================================================================

/// How the message list should scroll to the newest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

impl ScrollBehavior {
    pub fn for_settings(settings: &AccessibilitySettings) -> Self {
        if settings.reduced_motion {
            ScrollBehavior::Auto
        } else {
            ScrollBehavior::Smooth
        }
    }
}

/// Classes the presentation layer puts on the chat container.
pub fn container_classes(settings: &AccessibilitySettings, dark_mode: bool) -> Vec<&'static str> {
    let mut classes = vec!["chat-container"];
    if dark_mode {
        classes.push("dark");
    }
    if settings.high_contrast {
        classes.push("high-contrast");
    }
    if settings.keyboard_navigation {
        classes.push("keyboard-navigation");
    }
    if settings.large_click_targets {
        classes.push("large-click-targets");
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AccessibilitySettings::default();
        assert_eq!(s.font_size_px, 16);
        assert_eq!(s.speech_speed, 1.0);
        assert_eq!(s.speech_volume, 0.7);
        assert!(s.keyboard_navigation);
        assert!(!s.tts_enabled);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let s = AccessibilitySettings {
            high_contrast: true,
            font_size_px: 20,
            ..Default::default()
        };
        assert_eq!(s.apply(&SettingsPatch::default()), s);
    }

    #[test]
    fn test_patch_only_touches_named_fields() {
        let s = AccessibilitySettings::default();
        let next = s.apply(&SettingsPatch {
            reduced_motion: Some(true),
            ..Default::default()
        });
        assert!(next.reduced_motion);
        assert_eq!(
            AccessibilitySettings {
                reduced_motion: false,
                ..next
            },
            s
        );
    }

    #[test]
    fn test_numeric_fields_are_clamped() {
        let s = AccessibilitySettings::default().apply(&SettingsPatch {
            font_size_px: Some(200),
            speech_speed: Some(0.1),
            speech_volume: Some(3.0),
            ..Default::default()
        });
        assert_eq!(s.font_size_px, 32);
        assert_eq!(s.speech_speed, 0.5);
        assert_eq!(s.speech_volume, 1.0);

        let s = s.apply(&SettingsPatch {
            font_size_px: Some(2),
            ..Default::default()
        });
        assert_eq!(s.font_size_px, 12);
    }

    #[test]
    fn test_non_finite_float_is_ignored() {
        let s = AccessibilitySettings::default().apply(&SettingsPatch {
            speech_volume: Some(f32::NAN),
            ..Default::default()
        });
        assert_eq!(s.speech_volume, 0.7);
    }

    #[test]
    fn test_partial_patch_deserializes() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"fontSize": 22, "highContrast": true}"#).unwrap();
        assert_eq!(patch.font_size_px, Some(22));
        assert_eq!(patch.high_contrast, Some(true));
        assert_eq!(patch.tts_enabled, None);
    }

    #[test]
    fn test_container_classes() {
        let s = AccessibilitySettings {
            high_contrast: true,
            keyboard_navigation: false,
            large_click_targets: true,
            ..Default::default()
        };
        assert_eq!(
            container_classes(&s, true),
            vec!["chat-container", "dark", "high-contrast", "large-click-targets"]
        );
        assert_eq!(
            container_classes(&AccessibilitySettings::default(), false),
            vec!["chat-container", "keyboard-navigation"]
        );
    }

    #[test]
    fn test_scroll_behavior_follows_reduced_motion() {
        let mut s = AccessibilitySettings::default();
        assert_eq!(ScrollBehavior::for_settings(&s), ScrollBehavior::Smooth);
        s.reduced_motion = true;
        assert_eq!(ScrollBehavior::for_settings(&s), ScrollBehavior::Auto);
    }
}
