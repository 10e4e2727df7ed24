//! Config - ウィジェット設定
//!
//! JSON ファイルから読み込む。未指定の項目はすべて既定値。

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::host::{ExtensionManifest, HostConfig};
use super::render::{PlainLabel, RenderMode, Renderer};

/// ConfigError は設定読み込み時のエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Widget configuration.
///
/// ```json
/// { "mode": "plain", "plain_label": "status_name", "refresh_interval_ms": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub mode: RenderMode,
    pub plain_label: PlainLabel,
    pub manifest: ExtensionManifest,
    /// Extra or overriding module aliases, merged over the manifest defaults.
    pub module_aliases: BTreeMap<String, String>,
    pub refresh_interval_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            plain_label: PlainLabel::default(),
            manifest: ExtensionManifest::default(),
            module_aliases: BTreeMap::new(),
            refresh_interval_ms: 250,
        }
    }
}

impl WidgetConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.mode).with_plain_label(self.plain_label)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn host_config(&self) -> HostConfig {
        let mut aliases = self.manifest.default_aliases();
        aliases.extend(self.module_aliases.clone());
        HostConfig::new(aliases)
    }
}
