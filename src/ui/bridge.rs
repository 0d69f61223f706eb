// UiBridge - coordinates between the tokio runtime and the Slint event loop
//
// Two event loops run in this application: Slint's single-threaded GUI loop
// and tokio's multi-threaded runtime driving the subprocess. The bridge
// marshals UI updates from tokio tasks onto the Slint thread and lets Slint
// callbacks spawn async work.

use slint::{ComponentHandle, Weak};
use std::future::Future;
use tokio::sync::mpsc;

/// Marshals work between the tokio runtime and the Slint event loop.
///
/// UI update closures are queued on a bounded channel and applied on the
/// Slint thread via `upgrade_in_event_loop`; async work is spawned onto the
/// tokio runtime from GUI callbacks.
pub struct UiBridge<T: ComponentHandle> {
    ui_weak: Weak<T>,
    tokio_handle: tokio::runtime::Handle,

    /// Bounded so a lagging UI cannot grow the queue without limit
    ui_update_tx: mpsc::Sender<Box<dyn FnOnce(&T) + Send>>,
}

impl<T: ComponentHandle + 'static> UiBridge<T> {
    /// Create the bridge and start its handler thread.
    ///
    /// The handler thread drains queued update closures and hands each one
    /// to the Slint event loop; it terminates when the event loop goes away
    /// or every sender is dropped.
    pub fn new(ui: &T, tokio_handle: tokio::runtime::Handle) -> Self {
        let ui_weak = ui.as_weak();
        let (ui_update_tx, mut ui_update_rx) = mpsc::channel::<Box<dyn FnOnce(&T) + Send>>(100);

        let ui_weak_clone = ui_weak.clone();
        std::thread::spawn(move || {
            tracing::debug!("UiBridge handler thread started");

            while let Some(update_fn) = ui_update_rx.blocking_recv() {
                let result = ui_weak_clone.upgrade_in_event_loop(move |ui| {
                    update_fn(&ui);
                });

                if let Err(e) = result {
                    // Event loop stopped; nothing left to update
                    tracing::warn!("Failed to queue UI update to event loop: {:?}", e);
                    break;
                }
            }

            tracing::debug!("UiBridge handler thread terminated");
        });

        Self {
            ui_weak,
            tokio_handle,
            ui_update_tx,
        }
    }

    /// Schedule a UI update from any thread.
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        send_update(&self.ui_update_tx, update);
    }

    /// Spawn an async task on the tokio runtime from a Slint callback.
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }

    /// Clone a lightweight handle for capture in Slint callbacks.
    pub fn clone_handle(&self) -> UiBridgeHandle<T> {
        UiBridgeHandle {
            ui_weak: self.ui_weak.clone(),
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

/// Cloneable handle to the bridge for use inside callbacks and tasks.
pub struct UiBridgeHandle<T: ComponentHandle> {
    ui_weak: Weak<T>,
    tokio_handle: tokio::runtime::Handle,
    ui_update_tx: mpsc::Sender<Box<dyn FnOnce(&T) + Send>>,
}

// Manual Clone implementation to avoid requiring T: Clone
impl<T: ComponentHandle> Clone for UiBridgeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            ui_weak: self.ui_weak.clone(),
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

impl<T: ComponentHandle + 'static> UiBridgeHandle<T> {
    /// Schedule a UI update from any thread.
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        send_update(&self.ui_update_tx, update);
    }

    /// Spawn an async task on the tokio runtime.
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }

    /// Weak reference to the UI component.
    pub fn ui_weak(&self) -> &Weak<T> {
        &self.ui_weak
    }
}

fn send_update<T: ComponentHandle>(
    tx: &mpsc::Sender<Box<dyn FnOnce(&T) + Send>>,
    update: impl FnOnce(&T) + Send + 'static,
) {
    match tx.try_send(Box::new(update)) {
        Ok(_) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::warn!("UI update channel full - dropping update");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::warn!("UI update channel closed - handler thread has stopped");
        }
    }
}
