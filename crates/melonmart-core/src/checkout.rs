//! Checkout state machine and payment widget port.
//!
//! One checkout attempt walks
//! `Idle → TokenRequested → WidgetPresented → {Succeeded | Pending | Failed
//! | Cancelled}`. Only `Succeeded` carries the side effect of clearing the
//! cart; every other end state leaves the cart intact so the user can retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MartError, Result};

/// Result reported by the external payment widget for one presentation.
///
/// Mirrors the widget's four callbacks: success, pending, error, and
/// closed-without-completing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// Payment confirmed.
    Success,
    /// Payment initiated but not yet confirmed (e.g. bank transfer).
    Pending,
    /// The provider reported a failure.
    Error(String),
    /// The user dismissed the widget without paying.
    Closed,
}

/// States of a single checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutState {
    Idle,
    TokenRequested,
    WidgetPresented,
    Succeeded,
    Pending,
    Failed,
    Cancelled,
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Pending | Self::Failed | Self::Cancelled
        )
    }

    /// Only a confirmed payment may clear the cart. Clearing on any other
    /// state would silently lose an order-in-progress on a transient
    /// provider error.
    pub fn clears_cart(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Drives one checkout attempt through its legal transitions.
///
/// Each transition method rejects out-of-order calls, so orchestration bugs
/// surface as errors instead of inconsistent cart state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutAttempt {
    state: CheckoutState,
}

impl CheckoutAttempt {
    pub fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// `Idle → TokenRequested`: the transaction-token request is in flight.
    pub fn request_token(&mut self) -> Result<()> {
        self.transition(CheckoutState::Idle, CheckoutState::TokenRequested)
    }

    /// `TokenRequested → Failed`: the API call errored before the widget was
    /// ever shown.
    pub fn token_failed(&mut self) -> Result<()> {
        self.transition(CheckoutState::TokenRequested, CheckoutState::Failed)
    }

    /// `TokenRequested → WidgetPresented`: the widget now owns the flow.
    pub fn present_widget(&mut self) -> Result<()> {
        self.transition(CheckoutState::TokenRequested, CheckoutState::WidgetPresented)
    }

    /// `WidgetPresented → terminal`: applies the widget's reported outcome
    /// and returns the resulting terminal state.
    pub fn settle(&mut self, outcome: &PaymentOutcome) -> Result<CheckoutState> {
        let next = match outcome {
            PaymentOutcome::Success => CheckoutState::Succeeded,
            PaymentOutcome::Pending => CheckoutState::Pending,
            PaymentOutcome::Error(_) => CheckoutState::Failed,
            PaymentOutcome::Closed => CheckoutState::Cancelled,
        };
        self.transition(CheckoutState::WidgetPresented, next)?;
        Ok(next)
    }

    fn transition(&mut self, from: CheckoutState, to: CheckoutState) -> Result<()> {
        if self.state != from {
            return Err(MartError::internal(format!(
                "invalid checkout transition: {:?} -> {:?} (current state {:?})",
                from, to, self.state
            )));
        }
        self.state = to;
        Ok(())
    }
}

impl Default for CheckoutAttempt {
    fn default() -> Self {
        Self::new()
    }
}

/// The external payment widget.
///
/// Presented with an opaque transaction token; reports back one of the four
/// outcomes. The widget never "throws": provider-side failures arrive as
/// [`PaymentOutcome::Error`].
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    async fn present(&self, transaction_token: &str) -> PaymentOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_reaches_succeeded() {
        let mut attempt = CheckoutAttempt::new();
        attempt.request_token().unwrap();
        attempt.present_widget().unwrap();
        let state = attempt.settle(&PaymentOutcome::Success).unwrap();
        assert_eq!(state, CheckoutState::Succeeded);
        assert!(state.clears_cart());
    }

    #[test]
    fn test_token_failure_never_presents_widget() {
        let mut attempt = CheckoutAttempt::new();
        attempt.request_token().unwrap();
        attempt.token_failed().unwrap();
        assert_eq!(attempt.state(), CheckoutState::Failed);
        assert!(attempt.present_widget().is_err());
    }

    #[test]
    fn test_settle_maps_each_outcome() {
        let cases = [
            (PaymentOutcome::Success, CheckoutState::Succeeded),
            (PaymentOutcome::Pending, CheckoutState::Pending),
            (
                PaymentOutcome::Error("declined".to_string()),
                CheckoutState::Failed,
            ),
            (PaymentOutcome::Closed, CheckoutState::Cancelled),
        ];
        for (outcome, expected) in cases {
            let mut attempt = CheckoutAttempt::new();
            attempt.request_token().unwrap();
            attempt.present_widget().unwrap();
            assert_eq!(attempt.settle(&outcome).unwrap(), expected);
            assert!(attempt.state().is_terminal());
        }
    }

    #[test]
    fn test_only_success_clears_cart() {
        assert!(CheckoutState::Succeeded.clears_cart());
        assert!(!CheckoutState::Pending.clears_cart());
        assert!(!CheckoutState::Failed.clears_cart());
        assert!(!CheckoutState::Cancelled.clears_cart());
    }

    #[test]
    fn test_out_of_order_transitions_are_rejected() {
        let mut attempt = CheckoutAttempt::new();
        assert!(attempt.present_widget().is_err());
        assert!(attempt.settle(&PaymentOutcome::Success).is_err());
        attempt.request_token().unwrap();
        assert!(attempt.request_token().is_err());
    }
}
