//! Validates many stored decklists with bounded parallelism.

use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    retry::{RetryPolicy, validate_with_retry},
    scrollrack::DecklistValidator,
};

const DEFAULT_CONCURRENCY: usize = 10;
const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(20);

/// A decklist waiting to be checked, keyed by the caller's identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecklistEntry {
    pub id: String,
    pub decklist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOutcome {
    pub id: String,
    /// `None` when the validator could not give an answer.
    pub valid: Option<bool>,
    pub errors: Vec<String>,
    pub skipped: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub validated: usize,
    pub valid: usize,
    pub invalid: usize,
    pub skipped: usize,
    pub unknown: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<EntryOutcome>,
    pub stats: BatchStats,
}

impl BatchReport {
    fn record(&mut self, outcome: EntryOutcome) {
        if outcome.skipped {
            self.stats.skipped += 1;
        } else {
            self.stats.validated += 1;
            match outcome.valid {
                Some(true) => self.stats.valid += 1,
                Some(false) => self.stats.invalid += 1,
                None => self.stats.unknown += 1,
            }
        }
        self.outcomes.push(outcome);
    }
}

pub struct BatchValidator {
    validator: Arc<dyn DecklistValidator>,
    retry: RetryPolicy,
    concurrency: usize,
    chunk_delay: Duration,
}

impl BatchValidator {
    pub fn new(validator: Arc<dyn DecklistValidator>) -> Self {
        Self {
            validator,
            retry: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            chunk_delay: DEFAULT_CHUNK_DELAY,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }

    /// Check every entry; outcomes come back in input order.
    pub async fn run(&self, entries: Vec<DecklistEntry>) -> BatchReport {
        info!(
            entries = entries.len(),
            concurrency = self.concurrency,
            "Validating decklists via Scrollrack"
        );

        let mut report = BatchReport::default();
        let chunk_count = entries.len().div_ceil(self.concurrency);

        for (index, chunk) in entries.chunks(self.concurrency).enumerate() {
            let outcomes = join_all(chunk.iter().map(|entry| self.check_entry(entry))).await;
            for outcome in outcomes {
                report.record(outcome);
            }

            debug!(chunk = index + 1, of = chunk_count, "Validation chunk finished");

            if index + 1 < chunk_count && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
        }

        info!(
            validated = report.stats.validated,
            valid = report.stats.valid,
            invalid = report.stats.invalid,
            unknown = report.stats.unknown,
            skipped = report.stats.skipped,
            "Decklist validation complete"
        );

        report
    }

    async fn check_entry(&self, entry: &DecklistEntry) -> EntryOutcome {
        let Some(decklist) = entry
            .decklist
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        else {
            return EntryOutcome {
                id: entry.id.clone(),
                valid: None,
                errors: Vec::new(),
                skipped: true,
            };
        };

        let (valid, errors) =
            match validate_with_retry(self.validator.as_ref(), decklist, self.retry).await {
                Ok(Some(result)) => (Some(result.valid), result.errors),
                Ok(None) => (None, Vec::new()),
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "Scrollrack rejected decklist");
                    (None, vec![e.to_string()])
                }
            };

        EntryOutcome {
            id: entry.id.clone(),
            valid,
            errors,
            skipped: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::services::scrollrack::{ErrorBody, ScrollrackError, ValidationResult};

    /// Answers by content: lists mentioning "Black Lotus" are illegal,
    /// "Bad Request" gets a 400 and "Outage" a 503.
    #[derive(Default)]
    struct RuleValidator {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl DecklistValidator for RuleValidator {
        async fn submit(&self, normalized: &str) -> Result<ValidationResult, ScrollrackError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let http = |status| ScrollrackError::Http {
                status,
                status_text: String::new(),
                body: ErrorBody::Text(String::new()),
            };
            if normalized.contains("Bad Request") {
                return Err(http(400));
            }
            if normalized.contains("Outage") {
                return Err(http(503));
            }
            let banned = normalized.contains("Black Lotus");
            Ok(ValidationResult {
                valid: !banned,
                errors: if banned {
                    vec!["Banned Card: Black Lotus".into()]
                } else {
                    vec![]
                },
                decklist: normalized.to_string(),
                deck_obj: serde_json::Value::Null,
            })
        }
    }

    fn entry(id: &str, decklist: Option<&str>) -> DecklistEntry {
        DecklistEntry {
            id: id.into(),
            decklist: decklist.map(str::to_string),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tallies_every_kind_of_outcome() {
        let batch = BatchValidator::new(Arc::new(RuleValidator::default()))
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));

        let report = batch
            .run(vec![
                entry("a", Some("1 Sol Ring")),
                entry("b", Some("1 Black Lotus")),
                entry("c", None),
                entry("d", Some("   ")),
                entry("e", Some("1 Outage")),
                entry("f", Some("1 Bad Request")),
            ])
            .await;

        assert_eq!(
            report.stats,
            BatchStats {
                validated: 4,
                valid: 1,
                invalid: 1,
                skipped: 2,
                unknown: 2,
            }
        );
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(report.outcomes[1].errors, vec!["Banned Card: Black Lotus"]);
        assert_eq!(report.outcomes[5].valid, None);
        assert_eq!(report.outcomes[5].errors.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn never_exceeds_concurrency() {
        let validator = Arc::new(RuleValidator::default());
        let batch = BatchValidator::new(validator.clone()).with_concurrency(3);

        let entries = (0..10)
            .map(|i| entry(&i.to_string(), Some("1 Sol Ring")))
            .collect();
        let report = batch.run(entries).await;

        assert_eq!(report.stats.valid, 10);
        assert_eq!(validator.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_between_chunks_only() {
        let batch = BatchValidator::new(Arc::new(RuleValidator::default()))
            .with_concurrency(2)
            .with_chunk_delay(Duration::from_secs(1));

        let entries = (0..5)
            .map(|i| entry(&i.to_string(), Some("1 Sol Ring")))
            .collect();
        let started = tokio::time::Instant::now();
        let report = batch.run(entries).await;

        assert_eq!(report.stats.valid, 5);
        // Three chunks of 5 ms each, two pauses, none after the last chunk.
        assert_eq!(started.elapsed(), Duration::from_millis(2015));
    }
}
