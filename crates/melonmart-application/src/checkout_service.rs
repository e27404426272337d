//! Checkout orchestration.
//!
//! Walks one attempt through the state machine: totals, transaction-token
//! request, widget presentation, settlement. The cart is cleared only after
//! the widget confirms payment; every other end state leaves it intact so
//! the user can retry.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::{info, warn};

use melonmart_core::{
    CheckoutAttempt, CheckoutState, CheckoutTotals, MartError, PaymentOutcome, PaymentRequest,
    PaymentWidget, Result,
};

use crate::context::AppContext;

/// How one checkout attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReport {
    pub state: CheckoutState,
    pub totals: CheckoutTotals,
    /// Provider or API failure detail for the `Failed` state.
    pub message: Option<String>,
}

/// Orchestrates the handoff from cart to the external payment widget.
pub struct CheckoutService {
    ctx: Arc<AppContext>,
}

impl CheckoutService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Runs one checkout attempt against the given widget.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` when no user is logged in or the token is gone
    /// - `Validation` when the cart is empty
    /// - `CheckoutInFlight` when another attempt has not finished yet
    ///
    /// API and provider failures are not `Err`: they end the attempt in the
    /// `Failed` state with the cart untouched, which is a legal outcome.
    pub async fn checkout(&self, widget: &dyn PaymentWidget) -> Result<CheckoutReport> {
        if self
            .ctx
            .checkout_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MartError::CheckoutInFlight);
        }
        let result = self.run_attempt(widget).await;
        self.ctx.checkout_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_attempt(&self, widget: &dyn PaymentWidget) -> Result<CheckoutReport> {
        let customer = self
            .ctx
            .current_user()
            .await
            .ok_or(MartError::Unauthenticated)?;
        let token = self
            .ctx
            .tokens
            .load()
            .await?
            .ok_or(MartError::Unauthenticated)?;

        let totals = {
            let cart = self.ctx.cart.read().await;
            if cart.is_empty() {
                return Err(MartError::validation("cart is empty"));
            }
            CheckoutTotals::for_cart(&cart)
        };

        let mut attempt = CheckoutAttempt::new();
        attempt.request_token()?;
        let request = PaymentRequest {
            total: totals.total,
            customer,
        };
        let transaction = match self.ctx.gateway.create_payment(&token, &request).await {
            Ok(transaction) => transaction,
            Err(err) => {
                attempt.token_failed()?;
                warn!(error = %err, "payment token request failed");
                return Ok(CheckoutReport {
                    state: attempt.state(),
                    totals,
                    message: Some(err.to_string()),
                });
            }
        };

        attempt.present_widget()?;
        let outcome = widget.present(&transaction.token).await;
        let state = attempt.settle(&outcome)?;

        if state.clears_cart() {
            self.ctx.cart.write().await.clear();
            info!(total = totals.total, "payment confirmed, cart cleared");
        }

        let message = match outcome {
            PaymentOutcome::Error(detail) => Some(detail),
            _ => None,
        };
        Ok(CheckoutReport {
            state,
            totals,
            message,
        })
    }
}
