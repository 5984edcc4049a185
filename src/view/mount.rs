use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{Node, OrderHistoryView, ViewState};

/// A view that has been mounted: its single fetch is in flight or done.
///
/// Dropping the handle unmounts the view just like [`MountedView::unmount`],
/// minus the join.
pub struct MountedView {
    view: Arc<OrderHistoryView>,
    state_rx: watch::Receiver<ViewState>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl OrderHistoryView {
    /// Spawn the fetch-on-mount effect. Must be called inside a tokio runtime.
    pub fn mount(self) -> MountedView {
        let view = Arc::new(self);
        let (state_tx, state_rx) = watch::channel(ViewState::Loading);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(fetch_on_mount(Arc::clone(&view), state_tx, shutdown_rx));

        MountedView {
            view,
            state_rx,
            shutdown_tx,
            task,
        }
    }
}

async fn fetch_on_mount(
    view: Arc<OrderHistoryView>,
    state_tx: watch::Sender<ViewState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!("Order history view mounted, fetching");

    tokio::select! {
        state = view.fetch_state() => {
            if *shutdown_rx.borrow() || state_tx.is_closed() {
                debug!("Order history view unmounted while fetching, discarding result");
                return;
            }
            state_tx.send_replace(state);
        }
        _ = shutdown_rx.changed() => {
            info!("Order history view unmounted, cancelling in-flight fetch");
        }
    }
}

impl MountedView {
    pub fn state(&self) -> ViewState {
        self.state_rx.borrow().clone()
    }

    pub fn render(&self) -> Node {
        self.view.render(&self.state_rx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_rx.clone()
    }

    /// Wait for the fetch to leave `Loading`. Returns the current state as-is
    /// if the fetch task has already gone away without publishing.
    pub async fn settled(&mut self) -> ViewState {
        let settled = self
            .state_rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());

        settled.unwrap_or_else(|_| self.state_rx.borrow().clone())
    }

    /// Tear the view down. An unfinished fetch is cancelled and its result
    /// never reaches the state.
    pub async fn unmount(self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("Order history fetch already finished before unmount");
        }

        if let Err(e) = self.task.await {
            error!("Order history fetch task failed: {e}");
        }
    }
}
