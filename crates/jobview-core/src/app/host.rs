//! Host - ホスト環境への登録
//!
//! グローバルなモジュール解決設定を書き換える代わりに、
//! 論理モジュール名 → パス の対応を起動時に明示的に渡す。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Logical name the widget module is published under.
pub const MODULE_NAME: &str = "jobview";

/// Where the host installs the extension's static assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionManifest {
    pub section: String,
    pub src: String,
    pub dest: String,
    pub require: String,
}

impl Default for ExtensionManifest {
    fn default() -> Self {
        Self {
            section: "notebook".to_string(),
            src: "static".to_string(),
            dest: MODULE_NAME.to_string(),
            require: format!("{MODULE_NAME}/extension"),
        }
    }
}

impl ExtensionManifest {
    /// Alias map pointing the logical module names at the installed assets.
    pub fn default_aliases(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (MODULE_NAME.to_string(), format!("nbextensions/{}/index", self.dest)),
            (
                "jupyter-js-widgets".to_string(),
                "nbextensions/jupyter-js-widgets/extension".to_string(),
            ),
        ])
    }
}

/// Explicit module-alias configuration plus the activation hook.
#[derive(Debug, Default)]
pub struct HostConfig {
    aliases: BTreeMap<String, String>,
    activated: AtomicBool,
}

impl HostConfig {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        Self {
            aliases,
            activated: AtomicBool::new(false),
        }
    }

    pub fn from_manifest(manifest: &ExtensionManifest) -> Self {
        Self::new(manifest.default_aliases())
    }

    pub fn with_alias(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), path.into());
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Activation hook, called by the host when it loads the extension.
    ///
    /// Configuration only: nothing is rendered. Safe to call repeatedly;
    /// every call returns the same alias map.
    pub fn activate(&self) -> &BTreeMap<String, String> {
        if !self.activated.swap(true, Ordering::AcqRel) {
            tracing::info!(aliases = self.aliases.len(), "extension activated");
        }
        &self.aliases
    }

    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }
}
