use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running observation of a `watch` channel.
///
/// The observation runs on its own task until [`Subscription::cancel`] is
/// called, the handle is dropped, or the sender goes away. The callback runs
/// under the same lock `cancel` takes, so no call starts once `cancel` has
/// returned.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
    active: Arc<Mutex<bool>>,
}

impl Subscription {
    /// Call `on_next` with every value the receiver has not seen yet.
    pub fn start<T, F>(mut receiver: watch::Receiver<T>, mut on_next: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let active = Arc::new(Mutex::new(true));
        let flag = active.clone();

        let handle = tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let value = receiver.borrow_and_update().clone();
                let delivered = {
                    let running = lock(&flag);
                    if *running {
                        on_next(value);
                    }
                    *running
                };
                if !delivered {
                    break;
                }
            }
            *lock(&flag) = false;
            tracing::debug!("Subscription ended");
        });

        Self {
            handle: Some(handle),
            active,
        }
    }

    pub fn cancel(&mut self) {
        *lock(&self.active) = false;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        *lock(&self.active)
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
