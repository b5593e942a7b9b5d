// src/core/redirect.rs
//! Forced navigation to the fallback address
//!
//! The actual process launch is an external primitive behind [`AppLauncher`].
//! [`RedirectAction`] decides what to ask of it: open the fallback address in
//! the offending browser with its history and task stack cleared, and if the
//! browser cannot be addressed at all, open the address with whatever handles
//! it. Launch failures are logged and swallowed; the pipeline never sees one.

use thiserror::Error;
use tracing::{info, warn};

/// Flags the launcher passes through to the platform launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Clear the target's navigation history so "back" cannot return to the
    /// restricted page.
    pub clear_navigation: bool,
    /// Start a fresh activity/task stack for the target.
    pub fresh_task: bool,
}

impl LaunchOptions {
    /// Options for a corrective redirect: wipe history and restart the task.
    pub fn fresh_task() -> Self {
        Self {
            clear_navigation: true,
            fresh_task: true,
        }
    }
}

/// Failure modes of the external launch primitive.
#[derive(Debug, Clone, Error)]
pub enum LaunchError {
    /// The target package cannot be resolved (uninstalled, renamed).
    #[error("no application found for package `{0}`")]
    TargetNotFound(String),
    /// Any other platform-side launch failure.
    #[error("launch failed: {0}")]
    Failed(String),
}

/// Opaque "open this address in that application" primitive.
///
/// Fire-and-forget: implementations must not block on the launched
/// application and the launch cannot be retracted once issued.
pub trait AppLauncher: Send + Sync {
    /// Open `address` explicitly within `package`.
    fn open_in_app(
        &self,
        package: &str,
        address: &str,
        options: &LaunchOptions,
    ) -> Result<(), LaunchError>;

    /// Open `address` with whatever application handles it.
    fn open_with_default(&self, address: &str) -> Result<(), LaunchError>;
}

/// Prepend a secure scheme unless the address already carries one.
pub fn ensure_secure_scheme(address: &str) -> String {
    if address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{address}")
    }
}

/// Redirect command bound to a configured fallback address.
pub struct RedirectAction {
    launcher: Box<dyn AppLauncher>,
    fallback_address: String,
}

impl RedirectAction {
    pub fn new(launcher: Box<dyn AppLauncher>, fallback_address: impl Into<String>) -> Self {
        Self {
            launcher,
            fallback_address: fallback_address.into(),
        }
    }

    /// Force `target_package` onto the fallback address.
    ///
    /// Falls back to an untargeted open when the package cannot be resolved.
    /// Never raises an error to the caller.
    pub fn redirect(&self, target_package: &str) {
        let address = ensure_secure_scheme(&self.fallback_address);
        info!(package = target_package, %address, "redirecting to fallback address");

        match self
            .launcher
            .open_in_app(target_package, &address, &LaunchOptions::fresh_task())
        {
            Ok(()) => {}
            Err(LaunchError::TargetNotFound(_)) => {
                warn!(
                    package = target_package,
                    "target browser unresolvable, opening with default handler"
                );
                if let Err(error) = self.launcher.open_with_default(&address) {
                    warn!(%error, "fallback open failed");
                }
            }
            Err(error) => {
                warn!(package = target_package, %error, "targeted open failed");
            }
        }
    }
}

/// Launcher that only logs the command it was asked to issue.
///
/// Used by the replay binary so recorded streams can be run dry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLauncher;

impl AppLauncher for LoggingLauncher {
    fn open_in_app(
        &self,
        package: &str,
        address: &str,
        options: &LaunchOptions,
    ) -> Result<(), LaunchError> {
        info!(
            package,
            address,
            clear_navigation = options.clear_navigation,
            fresh_task = options.fresh_task,
            "dry-run: open address in app"
        );
        Ok(())
    }

    fn open_with_default(&self, address: &str) -> Result<(), LaunchError> {
        info!(address, "dry-run: open address with default handler");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{LaunchCall, RecordingLauncher};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prepends_secure_scheme_only_when_absent() {
        assert_eq!(ensure_secure_scheme("www.404.net"), "https://www.404.net");
        assert_eq!(
            ensure_secure_scheme("https://www.404.net"),
            "https://www.404.net"
        );
        // Kept as-is from the shipped behavior: a plain-http fallback gets
        // the secure scheme stacked in front of it.
        assert_eq!(
            ensure_secure_scheme("http://www.404.net"),
            "https://http://www.404.net"
        );
    }

    #[test]
    fn redirect_targets_the_browser_with_fresh_task_options() {
        let launcher = RecordingLauncher::default();
        let action = RedirectAction::new(Box::new(launcher.clone()), "www.404.net");

        action.redirect("com.android.chrome");

        assert_eq!(
            launcher.calls(),
            vec![LaunchCall::Targeted {
                package: "com.android.chrome".to_string(),
                address: "https://www.404.net".to_string(),
                options: LaunchOptions::fresh_task(),
            }]
        );
    }

    #[test]
    fn unresolvable_target_falls_back_to_untargeted_open() {
        let launcher = RecordingLauncher::failing_with(LaunchError::TargetNotFound(
            "com.android.chrome".to_string(),
        ));
        let action = RedirectAction::new(Box::new(launcher.clone()), "www.404.net");

        action.redirect("com.android.chrome");

        let calls = launcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            LaunchCall::Untargeted {
                address: "https://www.404.net".to_string(),
            }
        );
    }

    #[test]
    fn other_launch_failures_are_swallowed() {
        let launcher =
            RecordingLauncher::failing_with(LaunchError::Failed("activity crashed".to_string()));
        let action = RedirectAction::new(Box::new(launcher.clone()), "www.404.net");

        action.redirect("com.android.chrome");

        // No untargeted retry for failures other than an unresolvable target.
        assert_eq!(launcher.calls().len(), 1);
    }
}
