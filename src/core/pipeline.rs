// src/core/pipeline.rs
//! Per-notification orchestration
//!
//! One [`FilterPipeline`] is constructed at startup and driven by the
//! platform's notification dispatcher, one call per UI-change event:
//! identify the source app, confirm it is a registered browser, capture the
//! address-bar text, throttle repeats, evaluate the restriction policy, and
//! redirect on a violation. Every run ends in a [`PipelineOutcome`]; errors
//! never cross the boundary back into the dispatcher.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::extractor::capture_address;
use crate::core::policy::{is_restricted, PolicySource};
use crate::core::redirect::RedirectAction;
use crate::core::registry::BrowserRegistry;
use crate::core::throttle::{DetectionKey, DetectionThrottle};
use crate::core::ui_tree::{SnapshotError, UiSnapshot};

/// One UI-state change notification as delivered by the platform.
///
/// The snapshot is consumed by the pipeline run and released when the run
/// ends, whatever the outcome.
pub struct UiChangeEvent {
    /// Package identifier of the source application, when the notification
    /// carries one.
    pub package_name: Option<String>,
    /// Event timestamp in milliseconds on the platform's monotonic event
    /// clock, the same clock the cooldown window is measured on.
    pub event_time_ms: u64,
    /// Snapshot of the source application's UI tree, when available.
    pub snapshot: Option<Box<dyn UiSnapshot>>,
}

/// Best-effort lookup of a package's human-readable name, diagnostics only.
pub trait AppNameResolver: Send + Sync {
    fn display_name(&self, package: &str) -> Option<String>;
}

/// Expected early exits: the notification needs no action and is not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The notification carried no source application identifier.
    NoSourceApp,
    /// The notification carried no UI-tree snapshot.
    NoSnapshot,
    /// The source application is not a registered browser.
    UnregisteredApp,
    /// The browser's layout held no address-bar text (layout changed, or a
    /// page without an address field is showing).
    AddressNotFound,
    /// No restricted prefix is currently configured.
    NoPolicy,
}

/// What one pipeline run decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PipelineOutcome {
    /// The address was restricted; a redirect command was issued.
    Redirected { package: String, address: String },
    /// The address was captured and is not restricted.
    Allowed { package: String, address: String },
    /// A repeat detection inside the cooldown window; no action taken.
    Suppressed { package: String, address: String },
    /// An expected not-applicable condition ended the run early.
    NotApplicable { reason: SkipReason },
    /// An unexpected failure, contained at the pipeline boundary.
    Failed { error: String },
}

impl PipelineOutcome {
    /// Short label for summaries and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Redirected { .. } => "redirected",
            PipelineOutcome::Allowed { .. } => "allowed",
            PipelineOutcome::Suppressed { .. } => "suppressed",
            PipelineOutcome::NotApplicable { .. } => "not_applicable",
            PipelineOutcome::Failed { .. } => "failed",
        }
    }
}

/// Unexpected failures inside a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// The detection-and-decision pipeline.
///
/// Owns all per-process state (registry, throttle, redirect binding) so there
/// are no ambient globals; construct once at startup, drop at shutdown.
pub struct FilterPipeline {
    registry: BrowserRegistry,
    throttle: DetectionThrottle,
    policy: Box<dyn PolicySource>,
    redirect: RedirectAction,
    resolver: Option<Box<dyn AppNameResolver>>,
}

impl FilterPipeline {
    pub fn new(
        registry: BrowserRegistry,
        throttle: DetectionThrottle,
        policy: Box<dyn PolicySource>,
        redirect: RedirectAction,
    ) -> Self {
        Self {
            registry,
            throttle,
            policy,
            redirect,
            resolver: None,
        }
    }

    /// Wire a pipeline from configuration and a launch primitive.
    ///
    /// The restriction prefix is fixed to the configured value; embedders
    /// whose prefix changes at runtime pass their own [`PolicySource`] to
    /// [`FilterPipeline::new`] instead.
    pub fn from_config(
        config: &crate::config::GuardConfig,
        launcher: Box<dyn crate::core::redirect::AppLauncher>,
    ) -> Self {
        Self::new(
            BrowserRegistry::new(config.browsers.clone()),
            DetectionThrottle::new(config.cooldown(), config.throttle_capacity),
            Box::new(crate::core::policy::StaticPolicy::new(
                config.restricted_prefix.as_str(),
            )),
            RedirectAction::new(launcher, config.fallback_address.as_str()),
        )
    }

    /// Attach a best-effort app-name resolver for diagnostics.
    pub fn with_resolver(mut self, resolver: Box<dyn AppNameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Handle one notification.
    ///
    /// Never panics toward the dispatcher and never returns an error; any
    /// unexpected failure is logged and reported as
    /// [`PipelineOutcome::Failed`]. Throttle state is only written at the
    /// commit point inside the throttle itself, so a failing run leaves it
    /// untouched.
    pub fn handle_event(&self, event: UiChangeEvent) -> PipelineOutcome {
        match self.run(event) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, "pipeline run failed");
                PipelineOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    fn run(&self, event: UiChangeEvent) -> Result<PipelineOutcome, PipelineError> {
        let Some(package) = event.package_name else {
            return Ok(PipelineOutcome::NotApplicable {
                reason: SkipReason::NoSourceApp,
            });
        };

        // Foreground app name is diagnostics only; failure to resolve must
        // not block the run.
        if let Some(resolver) = &self.resolver {
            match resolver.display_name(&package) {
                Some(name) => debug!(package = %package, app_name = %name, "foreground app"),
                None => debug!(package = %package, "foreground app name unresolved"),
            }
        }

        let Some(config) = self.registry.lookup(&package) else {
            return Ok(PipelineOutcome::NotApplicable {
                reason: SkipReason::UnregisteredApp,
            });
        };

        let Some(snapshot) = event.snapshot else {
            return Ok(PipelineOutcome::NotApplicable {
                reason: SkipReason::NoSnapshot,
            });
        };

        // The snapshot is dropped, and with it released, on every return path
        // below.
        let root = snapshot.root()?;
        let Some(address) = capture_address(root, config) else {
            return Ok(PipelineOutcome::NotApplicable {
                reason: SkipReason::AddressNotFound,
            });
        };

        let key = DetectionKey::new(package.as_str(), address.as_str());
        if !self.throttle.should_act(key, event.event_time_ms) {
            return Ok(PipelineOutcome::Suppressed { package, address });
        }

        let Some(prefix) = self.policy.restricted_prefix() else {
            return Ok(PipelineOutcome::NotApplicable {
                reason: SkipReason::NoPolicy,
            });
        };

        if is_restricted(&address, &prefix) {
            info!(package = %package, address = %address, "restricted address detected");
            self.redirect.redirect(&package);
            Ok(PipelineOutcome::Redirected { package, address })
        } else {
            Ok(PipelineOutcome::Allowed { package, address })
        }
    }
}
