//! The equation: two operand slots, an operator and the derived result
//!
//! The result is recomputed exactly when both operands are present and one
//! of (first id, second id, operator) changed. Clearing either operand
//! empties the result at once. Recomputes carry a token; only the most
//! recently started one may fill the result slot.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::MovieService;
use crate::error::ComputeError;
use crate::generation::{Emitter, Generation, Token};
use crate::models::{Movie, Operator, ResultSlot, Slot};

/// Completion posted back to the owning event loop
#[derive(Debug)]
pub struct EquationEvent {
    pub token: Token,
    pub operator: Operator,
    pub outcome: Result<Movie, ComputeError>,
}

/// Inputs of one recompute; equal keys are not recomputed twice
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestKey {
    first: String,
    second: String,
    operator: Operator,
}

pub struct EquationEngine {
    service: Arc<dyn MovieService>,
    emit: Emitter<EquationEvent>,
    first: Option<Movie>,
    second: Option<Movie>,
    operator: Operator,
    result: ResultSlot,
    result_operator: Option<Operator>,
    generation: Generation,
    last_request: Option<RequestKey>,
}

impl EquationEngine {
    pub fn new(service: Arc<dyn MovieService>, emit: Emitter<EquationEvent>) -> Self {
        Self {
            service,
            emit,
            first: None,
            second: None,
            operator: Operator::default(),
            result: ResultSlot::Empty,
            result_operator: None,
            generation: Generation::new(),
            last_request: None,
        }
    }

    pub fn operand(&self, slot: Slot) -> Option<&Movie> {
        match slot {
            Slot::First => self.first.as_ref(),
            Slot::Second => self.second.as_ref(),
        }
    }

    /// Operator currently chosen by the user
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Operator that produced the displayed result
    pub fn result_operator(&self) -> Option<Operator> {
        self.result_operator
    }

    pub fn result(&self) -> &ResultSlot {
        &self.result
    }

    /// Put a movie into a slot, or clear it with `None`.
    ///
    /// Re-setting the same movie (same id) only refreshes its descriptive
    /// fields, e.g. a poster that arrived after selection.
    pub fn set_operand(&mut self, slot: Slot, movie: Option<Movie>) {
        let current = match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        };

        let same_movie = matches!(
            (current.as_ref(), movie.as_ref()),
            (Some(old), Some(new)) if old == new
        );
        *current = movie;
        if same_movie {
            return;
        }

        if self.first.is_some() && self.second.is_some() {
            self.recompute(self.operator);
        } else {
            self.clear_result();
        }
    }

    /// Choose the operator; recomputes at once when both operands are set
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        if self.first.is_some() && self.second.is_some() {
            self.recompute(operator);
        }
    }

    /// Flip between add and subtract
    pub fn toggle_operator(&mut self) {
        self.set_operator(self.operator.toggled());
    }

    /// Start computing the result with `operator`.
    ///
    /// Does nothing without both operands, or when the same inputs are
    /// already computed or in flight.
    pub fn recompute(&mut self, operator: Operator) {
        let (Some(first), Some(second)) = (self.first.as_ref(), self.second.as_ref()) else {
            return;
        };

        let key = RequestKey {
            first: first.id.clone(),
            second: second.id.clone(),
            operator,
        };
        let settled = matches!(self.result, ResultSlot::Loading | ResultSlot::Ready(_));
        if settled && self.last_request.as_ref() == Some(&key) {
            debug!(?key, "result already computed for these inputs");
            return;
        }

        let token = self.generation.issue();
        info!(%token, first = %key.first, second = %key.second, %operator, "recomputing result");
        self.result = ResultSlot::Loading;
        self.last_request = Some(key.clone());

        let service = Arc::clone(&self.service);
        let emit = self.emit.clone();
        tokio::spawn(async move {
            let outcome = service.solve(operator, &key.first, &key.second).await;
            emit.emit(EquationEvent {
                token,
                operator,
                outcome,
            });
        });
    }

    /// Apply a recompute completion; returns false when it was stale
    pub fn handle(&mut self, event: EquationEvent) -> bool {
        if !self.generation.is_current(event.token) {
            debug!(token = %event.token, operator = %event.operator, "discarding stale result");
            return false;
        }

        match event.outcome {
            Ok(movie) => {
                info!(title = %movie.title, operator = %event.operator, "result ready");
                self.result = ResultSlot::Ready(movie);
                self.result_operator = Some(event.operator);
            }
            Err(e) => {
                warn!(operator = %event.operator, error = %e, "compute failed");
                self.result = ResultSlot::Failed(e.to_string());
                self.result_operator = None;
            }
        }
        true
    }

    fn clear_result(&mut self) {
        self.generation.invalidate();
        self.result = ResultSlot::Empty;
        self.result_operator = None;
        self.last_request = None;
    }
}
