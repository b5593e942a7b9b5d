// src/core/registry.rs
//! Browser layout registry
//!
//! Maps an application package name to the resource id of the UI element that
//! holds its address bar text. The table is supplied by the configuration
//! collaborator and is read-only here.

use serde::{Deserialize, Serialize};

/// UI layout of one supported browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Application package identifier, e.g. `com.android.chrome`.
    pub package_name: String,
    /// Resource id of the element holding the address bar text.
    pub address_bar_id: String,
}

impl BrowserConfig {
    pub fn new(package_name: impl Into<String>, address_bar_id: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            address_bar_id: address_bar_id.into(),
        }
    }
}

/// Lookup table of supported browsers.
///
/// Duplicate package names are tolerated; lookup returns the first entry, so
/// later duplicates can never shadow an earlier one.
#[derive(Debug, Clone)]
pub struct BrowserRegistry {
    browsers: Vec<BrowserConfig>,
}

impl BrowserRegistry {
    pub fn new(browsers: Vec<BrowserConfig>) -> Self {
        Self { browsers }
    }

    /// Find the layout for a package, first match wins.
    pub fn lookup(&self, package_name: &str) -> Option<&BrowserConfig> {
        self.browsers
            .iter()
            .find(|config| config.package_name == package_name)
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.browsers.len()
    }
}

impl Default for BrowserRegistry {
    fn default() -> Self {
        Self::new(default_browsers())
    }
}

/// Address-bar layouts of the commonly shipped Android browsers.
pub fn default_browsers() -> Vec<BrowserConfig> {
    vec![
        BrowserConfig::new("com.android.chrome", "com.android.chrome:id/url_bar"),
        BrowserConfig::new("org.mozilla.firefox", "org.mozilla.firefox:id/url_bar_title"),
        BrowserConfig::new(
            "com.sec.android.app.sbrowser",
            "com.sec.android.app.sbrowser:id/location_bar_edit_text",
        ),
        BrowserConfig::new("com.opera.browser", "com.opera.browser:id/url_field"),
        BrowserConfig::new("com.opera.mini.native", "com.opera.mini.native:id/url_field"),
        BrowserConfig::new(
            "com.duckduckgo.mobile.android",
            "com.duckduckgo.mobile.android:id/omnibarTextInput",
        ),
    ]
}
