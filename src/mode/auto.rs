//! Debounced automatic mode classification.
//!
//! Tickets arrive on every edit; only the latest one after a quiescent
//! interval is classified, so the classifier is never raced keystroke by
//! keystroke. Classifier failure degrades silently to Standard.

use std::time::Duration;

use tracing::warn;

use crate::ai::ModeClassifier;
use crate::mode::{CalculatorMode, switching::ClassificationTicket};

/// Run the classification worker until the request channel closes.
///
/// Outcomes carry the originating ticket so the receiver can apply them
/// through [`super::ModeController::apply_classification`], which drops
/// stale and suppressed results.
pub async fn run_classifier<C: ModeClassifier>(
    classifier: C,
    debounce: Duration,
    requests: flume::Receiver<ClassificationTicket>,
    outcomes: flume::Sender<(ClassificationTicket, CalculatorMode)>,
) {
    while let Ok(mut ticket) = requests.recv_async().await {
        // Debounce: keep swallowing newer tickets until input goes quiet.
        loop {
            match tokio::time::timeout(debounce, requests.recv_async()).await {
                Ok(Ok(newer)) => ticket = newer,
                Ok(Err(_)) | Err(_) => break,
            }
        }

        let mode = match classifier.classify(&ticket.expression).await {
            Ok(mode) => mode,
            Err(err) => {
                warn!(%err, "mode classifier failed; defaulting to Standard");
                CalculatorMode::Standard
            }
        };

        if outcomes.send_async((ticket, mode)).await.is_err() {
            break;
        }
    }
}

/// Await the next classification outcome, bounded by `limit` so a slow or
/// stalled classifier never holds up the caller's input loop. Returns
/// `None` on expiry or a closed channel; the outcome, if any, arrives on a
/// later call and is staleness-checked there.
pub async fn next_outcome(
    outcomes: &flume::Receiver<(ClassificationTicket, CalculatorMode)>,
    limit: Duration,
) -> Option<(ClassificationTicket, CalculatorMode)> {
    tokio::time::timeout(limit, outcomes.recv_async())
        .await
        .ok()?
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ClassifierError, RuleBasedClassifier};
    use futures::future::BoxFuture;

    #[tokio::test]
    async fn test_only_latest_ticket_classified() {
        let (req_tx, req_rx) = flume::unbounded();
        let (out_tx, out_rx) = flume::unbounded();
        let worker = tokio::spawn(run_classifier(
            RuleBasedClassifier,
            Duration::from_millis(20),
            req_rx,
            out_tx,
        ));

        // Three rapid edits; only the final expression should be classified.
        for expr in ["s", "si", "sin(90)"] {
            req_tx
                .send_async(ClassificationTicket {
                    expression: expr.to_string(),
                })
                .await
                .unwrap();
        }

        let (ticket, mode) = out_rx.recv_async().await.unwrap();
        assert_eq!(ticket.expression, "sin(90)");
        assert_eq!(mode, CalculatorMode::Scientific);

        drop(req_tx);
        worker.await.unwrap();
        assert!(out_rx.recv_async().await.is_err());
    }

    struct BrokenClassifier;

    impl ModeClassifier for BrokenClassifier {
        fn classify<'a>(
            &'a self,
            _expression: &'a str,
        ) -> BoxFuture<'a, Result<CalculatorMode, ClassifierError>> {
            Box::pin(async { Err(ClassifierError("backend unreachable".into())) })
        }
    }

    #[tokio::test]
    async fn test_failure_defaults_to_standard() {
        let (req_tx, req_rx) = flume::unbounded();
        let (out_tx, out_rx) = flume::unbounded();
        tokio::spawn(run_classifier(
            BrokenClassifier,
            Duration::from_millis(5),
            req_rx,
            out_tx,
        ));

        req_tx
            .send_async(ClassificationTicket {
                expression: "sin(90)".to_string(),
            })
            .await
            .unwrap();

        let (_, mode) = out_rx.recv_async().await.unwrap();
        assert_eq!(mode, CalculatorMode::Standard);
    }

    #[tokio::test]
    async fn test_next_outcome_gives_up_after_limit() {
        let (tx, rx) = flume::unbounded::<(ClassificationTicket, CalculatorMode)>();

        // Nothing pending: the wait must expire instead of hanging.
        assert!(next_outcome(&rx, Duration::from_millis(10)).await.is_none());

        tx.send_async((
            ClassificationTicket {
                expression: "sin(90)".to_string(),
            },
            CalculatorMode::Scientific,
        ))
        .await
        .unwrap();

        let (ticket, mode) = next_outcome(&rx, Duration::from_millis(10)).await.unwrap();
        assert_eq!(ticket.expression, "sin(90)");
        assert_eq!(mode, CalculatorMode::Scientific);
    }
}
