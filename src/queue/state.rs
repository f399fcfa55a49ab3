//! Queue state and the transitions the manager applies to it
//!
//! Every method here is a total function over the in-memory collection.
//! Storage concerns live in [`super::storage`]; locking lives with the caller.

use super::token::{NewToken, Priority, Token, TokenStatus};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// First value of the issuance counter
pub const INITIAL_COUNTER: u32 = 1;

/// Default service time per waiting patient, in minutes
pub const DEFAULT_MINUTES_PER_PATIENT: u32 = 5;

/// Ordered token collection plus the next-issuance counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    /// Tokens in creation order
    pub tokens: Vec<Token>,
    /// Counter value the next submission will use
    pub next_number: u32,
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of queue statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total: usize,
    pub waiting_count: usize,
    pub completed_count: usize,
    pub current_serving: Option<Token>,
    pub estimated_wait_minutes: u32,
    /// Tokens in display order
    pub tokens: Vec<Token>,
    pub today_token_count: usize,
    pub active_queues_count: usize,
}

impl QueueState {
    /// Empty queue with a fresh counter
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            next_number: INITIAL_COUNTER,
        }
    }

    /// Build a state from an existing token list, deriving the counter from
    /// the highest token number present
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let next_number = tokens
            .iter()
            .filter_map(Token::sequence)
            .max()
            .map(|highest| highest.saturating_add(1))
            .unwrap_or(INITIAL_COUNTER);

        Self {
            tokens,
            next_number,
        }
    }

    /// Append a new waiting token and advance the counter
    pub fn submit(&mut self, patient: NewToken) -> Token {
        let token = Token::issue(self.next_number, patient);
        self.tokens.push(token.clone());
        self.next_number = self.next_number.saturating_add(1);
        token
    }

    /// Complete the current token, then promote the next waiting one.
    ///
    /// Emergency tokens are taken before any normal token; within a class the
    /// earliest-created token wins.
    pub fn call_next(&mut self) -> Option<Token> {
        self.complete_current();

        let next = self
            .tokens
            .iter()
            .position(|t| t.is_waiting() && t.priority.is_emergency())
            .or_else(|| self.tokens.iter().position(Token::is_waiting))?;

        let token = &mut self.tokens[next];
        token.status = TokenStatus::InProgress;
        Some(token.clone())
    }

    /// Complete the current token without promoting anyone
    pub fn mark_completed(&mut self) -> Option<Token> {
        self.complete_current()
    }

    fn complete_current(&mut self) -> Option<Token> {
        let current = self.tokens.iter_mut().find(|t| t.is_in_progress())?;
        current.status = TokenStatus::Completed;
        Some(current.clone())
    }

    /// Delete a token regardless of its status. Removing the serving token
    /// leaves the slot empty.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Token> {
        let index = self.tokens.iter().position(|t| t.id == id)?;
        Some(self.tokens.remove(index))
    }

    /// Drop every token and reset the counter
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.next_number = INITIAL_COUNTER;
    }

    pub fn current_serving(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_in_progress())
    }

    pub fn waiting_count(&self) -> usize {
        self.count_with(TokenStatus::Waiting)
    }

    pub fn completed_count(&self) -> usize {
        self.count_with(TokenStatus::Completed)
    }

    fn count_with(&self, status: TokenStatus) -> usize {
        self.tokens.iter().filter(|t| t.status == status).count()
    }

    /// Tokens as the display layer shows them: the serving token, then
    /// waiting tokens with emergencies first, then completed ones. Creation
    /// order is kept inside each group.
    pub fn display_order(&self) -> Vec<Token> {
        let mut ordered = self.tokens.clone();
        ordered.sort_by_key(|t| match (t.status, t.priority) {
            (TokenStatus::InProgress, _) => 0,
            (TokenStatus::Waiting, Priority::Emergency) => 1,
            (TokenStatus::Waiting, Priority::Normal) => 2,
            (TokenStatus::Completed, _) => 3,
        });
        ordered
    }

    /// Tokens created on the given local calendar day
    pub fn today_tokens(&self, today: NaiveDate) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|t| local_date(&t.created_at) == today)
            .collect()
    }

    /// Distinct problems among waiting tokens created on the given day
    pub fn active_queues_count(&self, today: NaiveDate) -> usize {
        self.today_tokens(today)
            .into_iter()
            .filter(|t| t.is_waiting())
            .map(|t| t.problem.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Compute statistics relative to `now`
    pub fn stats_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        minutes_per_patient: u32,
    ) -> QueueStats {
        let today = now.with_timezone(&Local).date_naive();
        let waiting_count = self.waiting_count();

        QueueStats {
            total: self.tokens.len(),
            waiting_count,
            completed_count: self.completed_count(),
            current_serving: self.current_serving().cloned(),
            estimated_wait_minutes: (waiting_count as u32).saturating_mul(minutes_per_patient),
            tokens: self.display_order(),
            today_token_count: self.today_tokens(today).len(),
            active_queues_count: self.active_queues_count(today),
        }
    }

    /// Compute statistics for the current moment
    pub fn stats(&self, minutes_per_patient: u32) -> QueueStats {
        self.stats_at(&Utc::now(), minutes_per_patient)
    }
}

fn local_date(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}
