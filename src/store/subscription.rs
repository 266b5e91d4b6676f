//! Live views over the store

use std::sync::Arc;

use tokio::sync::watch;

use super::StoreData;

type View<T> = Box<dyn Fn(&StoreData) -> T + Send + Sync>;

/// A filtered view of the store that refreshes after every committed mutation.
///
/// Created by the `Store::watch_*` methods. Dropping it unsubscribes.
pub struct Subscription<T> {
    pub(super) rx: watch::Receiver<Arc<StoreData>>,
    view: View<T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        rx: watch::Receiver<Arc<StoreData>>,
        view: impl Fn(&StoreData) -> T + Send + Sync + 'static,
    ) -> Self {
        Self { rx, view: Box::new(view) }
    }

    /// The view as of the latest committed mutation
    pub fn current(&mut self) -> T {
        let data = Arc::clone(&self.rx.borrow_and_update());
        (self.view)(&data)
    }

    /// Wait for the next mutation and return the refreshed view.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
