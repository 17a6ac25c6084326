//! Drives one screen: fetch animals, render the outcome.
//!
//! # Design
//! The presenter holds only a weak reference to its view, so a view that has
//! gone away simply stops receiving updates. `on_start` renders `Loading`
//! and starts the fetch on a worker; the outcome is rendered when the owning
//! thread calls `poll` or `wait`. `on_stop` disposes the fetch.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use time::OffsetDateTime;

use crate::binder::Binder;
use crate::error::ApiError;
use crate::repository::Repository;
use crate::types::ServiceResponse;
use crate::view_state::{MessageKey, View, ViewState};

/// Source of the `valid_date` sent with each fetch.
pub type Clock = fn() -> OffsetDateTime;

pub struct Presenter<R: Repository + ?Sized + 'static> {
    repository: Arc<R>,
    view: Weak<dyn View>,
    binder: Binder<Result<ServiceResponse, ApiError>>,
    clock: Clock,
}

impl<R: Repository + ?Sized + 'static> Presenter<R> {
    pub fn new(repository: Arc<R>, view: Weak<dyn View>) -> Self {
        Self {
            repository,
            view,
            binder: Binder::new(),
            clock: OffsetDateTime::now_utc,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn on_start(&mut self) {
        self.render(ViewState::Loading);

        let repository = Arc::clone(&self.repository);
        let valid_date = (self.clock)();
        // A panicking repository still has to leave Loading.
        let bound = self.binder.bind(move || {
            catch_unwind(AssertUnwindSafe(|| repository.fetch_response(Some(valid_date))))
                .unwrap_or_else(|_| Err(ApiError::Transport("fetch panicked".to_string())))
        });
        if let Err(e) = bound {
            tracing::warn!(error = %e, "could not start fetch");
            self.render(ViewState::Error(MessageKey::Error));
        }
    }

    pub fn on_stop(&mut self) {
        self.binder.clear();
    }

    /// Render any finished fetch without blocking. Returns whether a state
    /// was delivered.
    pub fn poll(&mut self) -> bool {
        let outcomes = self.binder.poll();
        let delivered = !outcomes.is_empty();
        for outcome in outcomes {
            self.deliver(outcome);
        }
        delivered
    }

    /// Block until the outstanding fetch finishes and render it. Returns
    /// `false` if nothing was outstanding.
    pub fn wait(&mut self) -> bool {
        match self.binder.wait() {
            Some(outcome) => {
                self.deliver(outcome);
                true
            }
            None => false,
        }
    }

    fn deliver(&self, outcome: Result<ServiceResponse, ApiError>) {
        match &outcome {
            Ok(response) => {
                tracing::debug!(animals = response.animals.len(), "service response loaded")
            }
            Err(e) => tracing::warn!(error = %e, "error loading service response"),
        }
        self.render(ViewState::from_outcome(outcome));
    }

    fn render(&self, state: ViewState) {
        match self.view.upgrade() {
            Some(view) => view.set_view_state(state),
            None => tracing::trace!("view dropped, skipping state update"),
        }
    }
}
