//! services/assistant/src/adapters/style.rs
//!
//! An in-memory implementation of the `StyleEnvironment` port. It keeps the
//! current root style variables and marker classes, and can forward every
//! effective change to an observer (the WebSocket session uses this to
//! mirror the state into the browser).

use sena_core::StyleEnvironment;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

/// One effective change to the styling environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleChange {
    /// `value == None` means the property was removed.
    Property { name: String, value: Option<String> },
    Marker { name: String, enabled: bool },
}

/// The full styling state at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleState {
    properties: BTreeMap<String, String>,
    markers: BTreeSet<String>,
}

impl StyleState {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.contains(name)
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }
}

type ChangeObserver = Box<dyn Fn(&StyleChange) + Send + Sync>;

#[derive(Default)]
pub struct StyleSheet {
    state: Mutex<StyleState>,
    observer: Option<ChangeObserver>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A style sheet that reports each effective change to `observer`.
    /// No-op writes (same value, already present marker) are not reported.
    pub fn with_observer(observer: impl Fn(&StyleChange) + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::default(),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn snapshot(&self) -> StyleState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn notify(&self, change: StyleChange) {
        if let Some(observer) = &self.observer {
            observer(&change);
        }
    }
}

impl StyleEnvironment for StyleSheet {
    fn set_property(&self, name: &str, value: &str) {
        let changed = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.properties.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.notify(StyleChange::Property {
                name: name.to_string(),
                value: Some(value.to_string()),
            });
        }
    }

    fn remove_property(&self, name: &str) {
        let changed = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .properties
            .remove(name)
            .is_some();
        if changed {
            self.notify(StyleChange::Property {
                name: name.to_string(),
                value: None,
            });
        }
    }

    fn set_marker(&self, name: &str, enabled: bool) {
        let changed = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if enabled {
                state.markers.insert(name.to_string())
            } else {
                state.markers.remove(name)
            }
        };
        if changed {
            self.notify(StyleChange::Marker {
                name: name.to_string(),
                enabled,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_properties_and_markers() {
        let sheet = StyleSheet::new();
        sheet.set_property("--font-size", "18px");
        sheet.set_marker("high-contrast", true);

        let state = sheet.snapshot();
        assert_eq!(state.property("--font-size"), Some("18px"));
        assert!(state.has_marker("high-contrast"));

        sheet.remove_property("--font-size");
        sheet.set_marker("high-contrast", false);
        assert_eq!(sheet.snapshot(), StyleState::default());
    }

    #[test]
    fn test_observer_sees_only_effective_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sheet = StyleSheet::with_observer(move |change| sink.lock().unwrap().push(change.clone()));

        sheet.set_property("--font-size", "16px");
        sheet.set_property("--font-size", "16px");
        sheet.remove_property("--animation-duration");
        sheet.set_marker("dark", true);
        sheet.set_marker("dark", true);
        sheet.set_marker("dark", false);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                StyleChange::Property {
                    name: "--font-size".to_string(),
                    value: Some("16px".to_string()),
                },
                StyleChange::Marker {
                    name: "dark".to_string(),
                    enabled: true,
                },
                StyleChange::Marker {
                    name: "dark".to_string(),
                    enabled: false,
                },
            ]
        );
    }
}
