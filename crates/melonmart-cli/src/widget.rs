//! Console stand-in for the external payment widget.
//!
//! The real provider renders its own payment UI from the transaction token
//! and reports back through callbacks. At the terminal we show the token
//! and ask the user which outcome the provider reported.

use async_trait::async_trait;
use colored::Colorize;

use melonmart_core::{PaymentOutcome, PaymentWidget};

pub struct ConsolePaymentWidget;

impl ConsolePaymentWidget {
    fn outcome_from_choice(choice: &str) -> PaymentOutcome {
        match choice.trim().to_lowercase().as_str() {
            "p" | "pay" => PaymentOutcome::Success,
            "w" | "wait" => PaymentOutcome::Pending,
            "f" | "fail" => PaymentOutcome::Error("Payment failed".to_string()),
            _ => PaymentOutcome::Closed,
        }
    }
}

#[async_trait]
impl PaymentWidget for ConsolePaymentWidget {
    async fn present(&self, transaction_token: &str) -> PaymentOutcome {
        println!(
            "{} transaction {}",
            "Payment widget:".bold(),
            transaction_token.dimmed()
        );
        println!("  [p]ay   [w]ait (bank transfer)   [f]ail   [c]lose");
        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;
        match line {
            Ok(Ok(choice)) => Self::outcome_from_choice(&choice),
            // EOF or a broken stdin counts as dismissing the widget.
            _ => PaymentOutcome::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_mapping() {
        assert_eq!(
            ConsolePaymentWidget::outcome_from_choice("p\n"),
            PaymentOutcome::Success
        );
        assert_eq!(
            ConsolePaymentWidget::outcome_from_choice("WAIT"),
            PaymentOutcome::Pending
        );
        assert!(matches!(
            ConsolePaymentWidget::outcome_from_choice("f"),
            PaymentOutcome::Error(_)
        ));
        assert_eq!(
            ConsolePaymentWidget::outcome_from_choice("anything else"),
            PaymentOutcome::Closed
        );
    }
}
