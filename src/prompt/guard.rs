//! Last-issued-wins protection for asynchronous validation
//!
//! Every edit of a text prompt starts a new validation. Validations can
//! finish in any order, so each one carries a [`Ticket`] and only the result
//! whose ticket is still the latest one reaches the prompt.

use crate::validation::Validator;
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use std::sync::Arc;

/// Identity of one validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

type Pending = BoxFuture<'static, (Ticket, Option<String>)>;

#[derive(Default)]
pub struct ValidationGuard {
    issued: u64,
    latest: Option<Ticket>,
    in_flight: FuturesUnordered<Pending>,
}

impl ValidationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts validating `text` and makes it the only request whose result
    /// may still be applied.
    pub fn evaluate(&mut self, validator: Arc<dyn Validator>, text: String) -> Ticket {
        let ticket = self.issue();
        self.in_flight.push(
            async move {
                let message = validator.validate(&text).await;
                (ticket, message)
            }
            .boxed(),
        );
        ticket
    }

    /// Validates `text` and waits for that result, superseding anything in flight.
    pub async fn validate_now(&mut self, validator: &dyn Validator, text: &str) -> Option<String> {
        self.issue();
        validator.validate(text).await
    }

    /// Waits for the next result that belongs to the latest request.
    ///
    /// Superseded results are dropped on the way. Never completes while no
    /// validation is in flight, so it can sit in a `tokio::select!` branch.
    pub async fn settled(&mut self) -> Option<String> {
        loop {
            match self.in_flight.next().await {
                Some((ticket, message)) if self.is_latest(ticket) => return message,
                Some((ticket, message)) => {
                    log::trace!("Discarding stale validation {ticket:?}: {message:?}");
                }
                None => std::future::pending::<()>().await,
            }
        }
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest == Some(ticket)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.latest = Some(ticket);
        ticket
    }
}
