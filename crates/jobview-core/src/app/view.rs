//! StatusView - モデルを購読して表示先を描き直すビュー
//!
//! # 状態遷移
//! - detached → attached: `attach()` のみ
//! - attached → detached: `detach()` のみ（冪等）
//!
//! # 学習ポイント
//! - observer には Weak を持たせる（モデルがビューを生かし続けない）
//! - 表示先への書き込み中はビューのロックを持たない（再入可能性）

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::model::{StatusModel, Subscription};
use super::render::{RenderedOutput, Renderer};
use crate::domain::{StatusTable, ViewError};
use crate::ports::DisplaySurface;

enum ViewState {
    Detached,
    Attached {
        model: StatusModel,
        // Dropping the subscription unsubscribes.
        _subscription: Subscription,
    },
}

struct ViewShared<S> {
    renderer: Renderer,
    surface: S,
    state: Mutex<ViewState>,
}

impl<S: DisplaySurface> ViewShared<S> {
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self) -> Result<(), ViewError> {
        let model = match &*self.lock() {
            ViewState::Attached { model, .. } => model.clone(),
            ViewState::Detached => return Err(ViewError::NotAttached),
        };
        self.paint(&model.get());
        Ok(())
    }

    fn paint(&self, table: &StatusTable) {
        let output = self.renderer.render(table);
        match self.surface.replace_contents(&output.to_markup()) {
            Ok(()) => tracing::debug!(rows = output.row_count(), "status view rendered"),
            Err(e) => tracing::debug!(error = %e, "render skipped"),
        }
    }
}

/// Renders a [`StatusModel`] into a [`DisplaySurface`] and keeps it live.
///
/// The view owns its surface. The rendering variant is fixed by the
/// [`Renderer`] passed at construction.
pub struct StatusView<S: DisplaySurface + 'static> {
    shared: Arc<ViewShared<S>>,
}

impl<S: DisplaySurface + 'static> StatusView<S> {
    pub fn new(surface: S, renderer: Renderer) -> Self {
        Self {
            shared: Arc::new(ViewShared {
                renderer,
                surface,
                state: Mutex::new(ViewState::Detached),
            }),
        }
    }

    /// Subscribe to the model's changes, then render its current table.
    ///
    /// The subscription is in place before the first paint, so a `set()`
    /// that lands while painting still re-renders the view.
    ///
    /// # Errors
    /// `ViewError::AlreadyAttached` if the view is already bound to a model.
    pub fn attach(&self, model: &StatusModel) -> Result<(), ViewError> {
        {
            let mut state = self.shared.lock();
            if matches!(*state, ViewState::Attached { .. }) {
                return Err(ViewError::AlreadyAttached);
            }

            let weak = Arc::downgrade(&self.shared);
            let subscription = model.on_change(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if let Err(e) = shared.refresh() {
                    tracing::warn!(error = %e, "change notification ignored");
                }
            });
            *state = ViewState::Attached {
                model: model.clone(),
                _subscription: subscription,
            };
        }
        tracing::debug!(mode = ?self.shared.renderer.mode(), "status view attached");

        // A detach from inside an earlier render is not an error here.
        let _ = self.shared.refresh();
        Ok(())
    }

    /// Re-read the model and re-render.
    ///
    /// # Errors
    /// `ViewError::NotAttached` if the view is detached.
    pub fn on_model_changed(&self) -> Result<(), ViewError> {
        self.shared.refresh()
    }

    /// Pure rendering of an arbitrary table with this view's configuration.
    pub fn render(&self, table: &StatusTable) -> RenderedOutput {
        self.shared.renderer.render(table)
    }

    /// Stop listening to the model. Idempotent.
    pub fn detach(&self) {
        let previous = std::mem::replace(&mut *self.shared.lock(), ViewState::Detached);
        if let ViewState::Attached { .. } = previous {
            tracing::debug!("status view detached");
        }
        drop(previous);
    }

    pub fn is_attached(&self) -> bool {
        matches!(*self.shared.lock(), ViewState::Attached { .. })
    }

    pub fn renderer(&self) -> &Renderer {
        &self.shared.renderer
    }

    pub fn surface(&self) -> &S {
        &self.shared.surface
    }
}
