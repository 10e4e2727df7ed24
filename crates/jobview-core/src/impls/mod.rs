//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **BufferSurface**: メモリ上の表示先（開発・テスト用）
//! - **WriterSurface**: `io::Write` への表示先（CLI 用）

pub mod buffer_surface;
pub mod writer_surface;

pub use self::buffer_surface::BufferSurface;
pub use self::writer_surface::WriterSurface;
