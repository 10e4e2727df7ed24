//! BufferSurface - メモリ上のマウントポイント（開発・テスト用）

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{DisplaySurface, SurfaceError};

#[derive(Debug, Default)]
struct BufferState {
    contents: String,
    writes: usize,
    torn_down: bool,
}

/// In-memory display surface.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// view owns another.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    state: Arc<Mutex<BufferState>>,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.lock().contents.clone()
    }

    /// Number of successful `replace_contents` calls.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Simulate the host removing the container; later writes fail.
    pub fn tear_down(&self) {
        let mut state = self.lock();
        state.torn_down = true;
        state.contents.clear();
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySurface for BufferSurface {
    fn replace_contents(&self, content: &str) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        if state.torn_down {
            return Err(SurfaceError::Unavailable);
        }
        state.contents.clear();
        state.contents.push_str(content);
        state.writes += 1;
        Ok(())
    }
}
