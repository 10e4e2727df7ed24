//! Errors - ビューの契約違反
//!
//! データ起因の問題（欠損フィールドなど）はエラーにしない。
//! ここに入るのはホスト統合側のバグだけ。

use thiserror::Error;

/// Contract violations of the view lifecycle.
///
/// Returned immediately from the offending call; the view state is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view is already attached to a model")]
    AlreadyAttached,

    #[error("view is not attached to a model")]
    NotAttached,
}
