//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **StatusModel**: ステータス表の正本と変更通知
//! - **StatusView**: モデルを購読し、表示先を描き直す
//! - **Renderer**: 表 → マークアップの純粋関数
//! - **PublisherLoop**: StatusSource からモデルへの定期配信
//! - **HostConfig**: ホストへの登録（モジュール別名と activate フック）
//! - **WidgetConfig**: 設定ファイル

pub mod config;
pub mod host;
pub mod model;
pub mod publisher_loop;
pub mod render;
pub mod view;

pub use self::config::{ConfigError, WidgetConfig};
pub use self::host::{ExtensionManifest, HostConfig};
pub use self::model::{StatusModel, Subscription};
pub use self::publisher_loop::{PublishOutcome, PublisherLoop};
pub use self::render::{PlainLabel, RenderMode, RenderedOutput, Renderer, TableRow};
pub use self::view::StatusView;
