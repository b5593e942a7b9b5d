// src/core/mod.rs
//! The detection-and-decision engine.

pub mod extractor;
pub mod pipeline;
pub mod policy;
pub mod redirect;
pub mod registry;
pub mod scanner;
pub mod throttle;
pub mod ui_tree;

pub use extractor::{capture_address, find_by_view_id};
pub use pipeline::{
    AppNameResolver, FilterPipeline, PipelineOutcome, SkipReason, UiChangeEvent,
};
pub use policy::{is_restricted, PolicySource, SharedPolicy, StaticPolicy};
pub use redirect::{AppLauncher, LaunchError, LaunchOptions, LoggingLauncher, RedirectAction};
pub use registry::{BrowserConfig, BrowserRegistry};
pub use scanner::{scan, scan_with_observer, ScanObserver, TraceObserver, TreeScanner};
pub use throttle::{DetectionKey, DetectionThrottle};
pub use ui_tree::{SnapshotError, StaticNode, StaticTree, UiNode, UiSnapshot};
