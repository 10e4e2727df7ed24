//! StatusSource port - パブリッシャー側のデータ源
//!
//! 実行エンジンそのものはこのクレートの外にある。
//! ここではその時点のステータス表を取り出す口だけを定義する。

use async_trait::async_trait;

use crate::domain::StatusTable;

/// Something that can produce the current status of a running pipeline.
#[async_trait]
pub trait StatusSource: Send {
    /// Current status of every unit of work, in pipeline order.
    async fn snapshot(&mut self) -> StatusTable;

    /// Has the pipeline finished? Once true, the publisher pushes one last
    /// snapshot and stops.
    async fn is_finished(&mut self) -> bool;
}
