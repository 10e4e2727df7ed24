//! jobview-core
//!
//! Live status table for pipeline jobs: an observable model holding the
//! current status rows, and a view that renders them into a host surface.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（StatusRecord, StatusTable, Statistics, ViewError）
//! - **ports**: 抽象化レイヤー（DisplaySurface, StatusSource）
//! - **app**: アプリケーションロジック（model, view, render, publisher_loop, host, config）
//! - **impls**: ports の実装（BufferSurface, WriterSurface）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
