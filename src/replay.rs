// src/replay.rs
//! Recorded notification streams
//!
//! The guard is normally driven in-process by the platform dispatcher. For
//! development and regression runs, a recorded stream of notifications can be
//! replayed from a JSON fixture instead: an array of events, each carrying an
//! optional source package, an event-clock timestamp, and an optional UI
//! tree.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::core::pipeline::UiChangeEvent;
use crate::core::ui_tree::{StaticNode, StaticTree, UiSnapshot};

/// One recorded notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayEvent {
    #[serde(default)]
    pub package_name: Option<String>,
    pub event_time_ms: u64,
    #[serde(default)]
    pub tree: Option<StaticNode>,
}

impl ReplayEvent {
    /// Convert into the event shape the pipeline consumes.
    pub fn into_event(self) -> UiChangeEvent {
        UiChangeEvent {
            package_name: self.package_name,
            event_time_ms: self.event_time_ms,
            snapshot: self
                .tree
                .map(|root| Box::new(StaticTree::new(root)) as Box<dyn UiSnapshot>),
        }
    }
}

/// Load a fixture file holding a JSON array of [`ReplayEvent`]s.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<ReplayEvent>, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_parses_and_converts() {
        let json = r#"[
            {
                "package_name": "com.android.chrome",
                "event_time_ms": 1000,
                "tree": {
                    "view_id": "android:id/content",
                    "children": [
                        {"view_id": "com.android.chrome:id/url_bar", "text": "http://bad.example"}
                    ]
                }
            },
            {"event_time_ms": 2000}
        ]"#;

        let events: Vec<ReplayEvent> = serde_json::from_str(json).expect("valid fixture");
        assert_eq!(events.len(), 2);

        let first = events[0].clone().into_event();
        assert_eq!(first.package_name.as_deref(), Some("com.android.chrome"));
        assert!(first.snapshot.is_some());

        let second = events[1].clone().into_event();
        assert!(second.package_name.is_none());
        assert!(second.snapshot.is_none());
    }

    #[test]
    fn load_events_reads_a_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"event_time_ms": 1}}]"#).expect("write");

        let events = load_events(file.path()).expect("loads");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_time_ms, 1);
    }
}
