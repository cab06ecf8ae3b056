//! services/assistant/src/session/effects.rs
//!
//! Pushes the accessibility settings into the styling environment.
//! The whole settings object is re-applied on every change.

use sena_core::{AccessibilitySettings, StyleEnvironment};
use std::sync::Arc;
use tracing::debug;

pub const FONT_SIZE_PROPERTY: &str = "--font-size";
pub const ANIMATION_DURATION_PROPERTY: &str = "--animation-duration";
pub const REDUCED_MOTION_DURATION: &str = "0s";
pub const HIGH_CONTRAST_MARKER: &str = "high-contrast";
pub const DARK_MODE_MARKER: &str = "dark";

#[derive(Clone)]
pub struct SettingsApplier {
    environment: Arc<dyn StyleEnvironment>,
}

impl SettingsApplier {
    pub fn new(environment: Arc<dyn StyleEnvironment>) -> Self {
        Self { environment }
    }

    /// Recomputes every settings-driven effect. Idempotent.
    pub fn apply(&self, settings: &AccessibilitySettings) {
        debug!(
            font_size_px = settings.font_size_px,
            reduced_motion = settings.reduced_motion,
            high_contrast = settings.high_contrast,
            "Applying accessibility settings."
        );

        self.environment
            .set_property(FONT_SIZE_PROPERTY, &format!("{}px", settings.font_size_px));

        if settings.reduced_motion {
            self.environment
                .set_property(ANIMATION_DURATION_PROPERTY, REDUCED_MOTION_DURATION);
        } else {
            self.environment.remove_property(ANIMATION_DURATION_PROPERTY);
        }

        self.environment
            .set_marker(HIGH_CONTRAST_MARKER, settings.high_contrast);
    }

    pub fn apply_dark_mode(&self, enabled: bool) {
        self.environment.set_marker(DARK_MODE_MARKER, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::style::StyleSheet;
    use sena_core::SettingsPatch;

    fn applier() -> (Arc<StyleSheet>, SettingsApplier) {
        let sheet = Arc::new(StyleSheet::new());
        let applier = SettingsApplier::new(sheet.clone());
        (sheet, applier)
    }

    #[test]
    fn test_defaults_set_font_size_only() {
        let (sheet, applier) = applier();
        applier.apply(&AccessibilitySettings::default());

        let state = sheet.snapshot();
        assert_eq!(state.property(FONT_SIZE_PROPERTY), Some("16px"));
        assert_eq!(state.property(ANIMATION_DURATION_PROPERTY), None);
        assert!(!state.has_marker(HIGH_CONTRAST_MARKER));
    }

    #[test]
    fn test_reduced_motion_sets_and_reverts_duration() {
        let (sheet, applier) = applier();
        let reduced = AccessibilitySettings::default().apply(&SettingsPatch {
            reduced_motion: Some(true),
            ..Default::default()
        });
        applier.apply(&reduced);
        assert_eq!(
            sheet.snapshot().property(ANIMATION_DURATION_PROPERTY),
            Some(REDUCED_MOTION_DURATION)
        );

        let restored = reduced.apply(&SettingsPatch {
            reduced_motion: Some(false),
            ..Default::default()
        });
        applier.apply(&restored);
        assert_eq!(sheet.snapshot().property(ANIMATION_DURATION_PROPERTY), None);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let (sheet, applier) = applier();
        let settings = AccessibilitySettings {
            font_size_px: 24,
            high_contrast: true,
            reduced_motion: true,
            ..Default::default()
        };

        applier.apply(&settings);
        let once = sheet.snapshot();
        applier.apply(&settings);
        assert_eq!(sheet.snapshot(), once);
    }

    #[test]
    fn test_high_contrast_toggles_do_not_accumulate() {
        let (sheet, applier) = applier();
        let mut settings = AccessibilitySettings::default();
        for _ in 0..5 {
            settings.high_contrast = !settings.high_contrast;
            applier.apply(&settings);
        }
        assert!(sheet.snapshot().has_marker(HIGH_CONTRAST_MARKER));
        assert_eq!(sheet.snapshot().markers().count(), 1);

        settings.high_contrast = false;
        applier.apply(&settings);
        assert_eq!(sheet.snapshot().markers().count(), 0);
    }

    #[test]
    fn test_dark_mode_marker() {
        let (sheet, applier) = applier();
        applier.apply_dark_mode(true);
        assert!(sheet.snapshot().has_marker(DARK_MODE_MARKER));
        applier.apply_dark_mode(false);
        assert!(!sheet.snapshot().has_marker(DARK_MODE_MARKER));
    }
}
