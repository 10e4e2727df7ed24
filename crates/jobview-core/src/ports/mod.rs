//! Ports - 抽象化レイヤー
//!
//! 外部の協力者（表示先のホスト、ステータスの発行元）への
//! インターフェースを定義します。

pub mod status_source;
pub mod surface;

pub use self::status_source::StatusSource;
pub use self::surface::{DisplaySurface, SurfaceError};
