//! DisplaySurface port - ホストが提供するマウントポイント
//!
//! ビューはマウントポイントの中身を排他的に所有する。
//! 兄弟要素については何も仮定しない。

use thiserror::Error;

/// Failure to write into the mount point.
///
/// The view treats every variant as a render failure: it is logged and
/// swallowed, since a torn-down surface means the view is about to go away.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("display surface is unavailable")]
    Unavailable,

    #[error("display surface write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A host-provided container the view renders into.
///
/// # 実装
/// - `BufferSurface`: メモリ上に保持（開発・テスト用）
/// - `WriterSurface`: 任意の `io::Write` に書き出す（CLI 用）
pub trait DisplaySurface: Send + Sync {
    /// Replace the whole content of the container.
    fn replace_contents(&self, content: &str) -> Result<(), SurfaceError>;
}
