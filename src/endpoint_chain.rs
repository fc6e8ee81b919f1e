use crate::errors::AppError;
use serde::Serialize;
use std::future::Future;

/// Result of trying one candidate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub endpoint: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Every attempt made, in order, plus the endpoint and value that succeeded.
#[derive(Debug)]
pub struct ChainOutcome<T> {
    pub attempts: Vec<Attempt>,
    pub selected: Option<(String, T)>,
}

impl<T> ChainOutcome<T> {
    pub fn endpoint(&self) -> Option<&str> {
        self.selected.as_ref().map(|(endpoint, _)| endpoint.as_str())
    }

    /// Failure messages joined for logging when nothing succeeded.
    pub fn failure_summary(&self) -> String {
        self.attempts
            .iter()
            .filter_map(|attempt| match &attempt.outcome {
                AttemptOutcome::Failed(message) => {
                    Some(format!("{}: {}", attempt.endpoint, message))
                }
                AttemptOutcome::Success => None,
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Ordered list of interchangeable endpoints, tried first to last.
#[derive(Debug, Clone)]
pub struct EndpointChain {
    candidates: Vec<String>,
}

impl EndpointChain {
    pub fn new(candidates: Vec<String>) -> Result<Self, AppError> {
        if candidates.is_empty() {
            return Err(AppError::InternalError(
                "Endpoint chain requires at least one candidate".to_string(),
            ));
        }
        Ok(Self { candidates })
    }

    /// Call each candidate in order until one succeeds.
    ///
    /// Candidates after the first success are never called.
    pub async fn first_success<T, F, Fut>(&self, mut call: F) -> ChainOutcome<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        let mut attempts = Vec::with_capacity(self.candidates.len());

        for endpoint in &self.candidates {
            match call(endpoint.clone()).await {
                Ok(value) => {
                    attempts.push(Attempt {
                        endpoint: endpoint.clone(),
                        outcome: AttemptOutcome::Success,
                    });
                    return ChainOutcome {
                        attempts,
                        selected: Some((endpoint.clone(), value)),
                    };
                }
                Err(message) => {
                    tracing::debug!("Endpoint {} failed: {}", endpoint, message);
                    attempts.push(Attempt {
                        endpoint: endpoint.clone(),
                        outcome: AttemptOutcome::Failed(message),
                    });
                }
            }
        }

        ChainOutcome {
            attempts,
            selected: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chain(names: &[&str]) -> EndpointChain {
        EndpointChain::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(EndpointChain::new(vec![]).is_err());
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let calls = AtomicUsize::new(0);
        let outcome = chain(&["a", "b", "c"])
            .first_success(|endpoint| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if endpoint == "b" {
                        Ok(42)
                    } else {
                        Err(format!("{} down", endpoint))
                    }
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.endpoint(), Some("b"));
        assert_eq!(outcome.selected.as_ref().map(|(_, v)| *v), Some(42));
        assert_eq!(
            outcome.attempts,
            vec![
                Attempt {
                    endpoint: "a".to_string(),
                    outcome: AttemptOutcome::Failed("a down".to_string()),
                },
                Attempt {
                    endpoint: "b".to_string(),
                    outcome: AttemptOutcome::Success,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_all_failed_reports_every_attempt() {
        let outcome: ChainOutcome<()> = chain(&["a", "b"])
            .first_success(|endpoint| async move { Err(format!("{} timeout", endpoint)) })
            .await;

        assert!(outcome.selected.is_none());
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.failure_summary(), "a: a timeout; b: b timeout");
    }

    #[tokio::test]
    async fn test_first_candidate_wins_when_healthy() {
        let outcome = chain(&["primary", "secondary"])
            .first_success(|endpoint| async move { Ok::<_, String>(endpoint) })
            .await;
        assert_eq!(outcome.endpoint(), Some("primary"));
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[test]
    fn test_attempt_serializes_flat() {
        let attempt = Attempt {
            endpoint: "https://dns.google/resolve".to_string(),
            outcome: AttemptOutcome::Failed("status 503".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&attempt).unwrap(),
            serde_json::json!({
                "endpoint": "https://dns.google/resolve",
                "outcome": "failed",
                "message": "status 503"
            })
        );
    }
}
