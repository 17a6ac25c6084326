//! Run work off the view thread and hand results back to it.
//!
//! # Design
//! `bind` runs a closure on a fresh worker thread. The result travels back
//! over a channel and is only handed out by `poll` or `wait`, so it is
//! always observed on the thread that owns the `Binder`. `clear` disposes
//! every outstanding subscription: a worker that finishes afterwards drops
//! its result instead of sending it.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

struct Subscription<T> {
    receiver: Receiver<T>,
    disposed: Arc<AtomicBool>,
}

impl<T> Subscription<T> {
    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }
}

/// Owns the subscriptions started from one screen.
pub struct Binder<T> {
    subscriptions: Vec<Subscription<T>>,
}

impl<T: Send + 'static> Binder<T> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Start `work` on a worker thread.
    pub fn bind<F>(&mut self, work: F) -> io::Result<()>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let disposed = Arc::new(AtomicBool::new(false));
        let worker_disposed = Arc::clone(&disposed);

        thread::Builder::new()
            .name("binder-worker".to_string())
            .spawn(move || {
                let value = work();
                if worker_disposed.load(Ordering::Acquire) {
                    tracing::trace!("subscription disposed, dropping result");
                    return;
                }
                // The receiver is gone if the binder was dropped mid-flight.
                let _ = sender.send(value);
            })?;

        self.subscriptions.push(Subscription { receiver, disposed });
        Ok(())
    }

    /// Take every result that is ready, without blocking.
    pub fn poll(&mut self) -> Vec<T> {
        let mut ready = Vec::new();
        self.subscriptions
            .retain(|subscription| match subscription.receiver.try_recv() {
                Ok(value) => {
                    ready.push(value);
                    false
                }
                Err(TryRecvError::Empty) => true,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("worker exited without producing a result");
                    false
                }
            });
        ready
    }

    /// Block until the oldest outstanding subscription produces a result.
    ///
    /// Returns `None` once nothing is outstanding.
    pub fn wait(&mut self) -> Option<T> {
        while !self.subscriptions.is_empty() {
            let subscription = self.subscriptions.remove(0);
            match subscription.receiver.recv() {
                Ok(value) => return Some(value),
                Err(_) => tracing::warn!("worker exited without producing a result"),
            }
        }
        None
    }

    /// Dispose every outstanding subscription.
    pub fn clear(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }

    pub fn is_idle(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<T: Send + 'static> Default for Binder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Binder<T> {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
    }
}
