// src/lib.rs
//! URL Restriction Guard Library
//!
//! This library implements the detection-and-decision pipeline of a browser
//! URL-restriction guard: matching foreground applications against a table of
//! browser UI layouts, locating the address-bar element in a UI-tree
//! snapshot, throttling repeated detections, evaluating the restriction
//! policy, and forcing the browser onto a safe fallback address when it is
//! violated.
//!
//! The platform pieces (notification delivery, consent screens, the
//! persisted configuration store, and the real process-launch primitive)
//! stay outside, behind the [`core::UiSnapshot`], [`core::PolicySource`] and
//! [`core::AppLauncher`] traits.

pub mod config;
pub mod core;
pub mod replay;

pub use crate::config::{ConfigError, GuardConfig};
pub use crate::core::{FilterPipeline, PipelineOutcome, UiChangeEvent};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::GuardConfig;
    pub use crate::core::{
        capture_address, is_restricted, scan, AppLauncher, AppNameResolver, BrowserConfig,
        BrowserRegistry, DetectionKey, DetectionThrottle, FilterPipeline, LaunchError,
        LaunchOptions, LoggingLauncher, PipelineOutcome, PolicySource, RedirectAction, SkipReason,
        StaticNode, StaticTree, UiChangeEvent, UiNode, UiSnapshot,
    };
}
