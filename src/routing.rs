//! Greedy highest-value-first routing.
//!
//! Candidates are tried strictly one at a time in rank order. Trying them
//! concurrently could admit one visitor to two targets.

use std::time::Duration;

use tracing::{debug, warn};

use crate::admission::{
    AdmissionCounter, Clock, CounterStore, RedisCounterStore, StoreError, SystemClock,
};
use crate::config::RouterConfig;
use crate::directory::{DirectoryError, RedisDirectory, TargetDirectory};
use crate::selection::rank;
use crate::target::Target;
use crate::types::{
    AdmissionAttempt, RouteError, RouteOutcome, RouteTrace, RoutingDecision, Visitor,
};

pub struct Router<D, S, C = SystemClock> {
    directory: D,
    counter: AdmissionCounter<S, C>,
    directory_timeout: Duration,
}

impl Router<RedisDirectory, RedisCounterStore, SystemClock> {
    /// Directory and counters on one shared Redis connection.
    pub async fn connect(config: &RouterConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let manager = redis::aio::ConnectionManager::new(client).await?;
        let directory =
            RedisDirectory::from_manager(manager.clone(), config.target_key_prefix.clone());
        let store = RedisCounterStore::from_manager(manager);
        let counter = AdmissionCounter::from_config(store, SystemClock, config);
        Ok(Router::new(directory, counter))
    }
}

impl<D, S, C> Router<D, S, C>
where
    D: TargetDirectory,
    S: CounterStore,
    C: Clock,
{
    pub fn new(directory: D, counter: AdmissionCounter<S, C>) -> Self {
        let directory_timeout = counter.timeout();
        Self {
            directory,
            counter,
            directory_timeout,
        }
    }

    pub fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }

    pub fn counter(&self) -> &AdmissionCounter<S, C> {
        &self.counter
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub async fn route_visitor(&self, visitor: &Visitor) -> Result<RoutingDecision, RouteError> {
        Ok(self.route_visitor_traced(visitor).await?.decision)
    }

    pub async fn route_visitor_traced(
        &self,
        visitor: &Visitor,
    ) -> Result<RouteOutcome, RouteError> {
        // 1. Catalog
        let targets = self.fetch_targets().await?;

        // 2. Eligibility + ranking
        let ranking = rank(&targets, visitor);
        let mut trace = RouteTrace {
            targets_considered: ranking.considered,
            targets_eligible: ranking.len(),
            targets_invalid: ranking.invalid,
            attempts: Vec::with_capacity(ranking.len()),
        };

        if ranking.is_empty() {
            debug!(
                geo_state = %visitor.geo_state,
                hour = %visitor.hour_code(),
                "no eligible targets"
            );
            return Ok(RouteOutcome {
                decision: RoutingDecision::Reject,
                trace,
            });
        }

        // 3. Admission, highest value first. A store failure aborts: skipping
        // to a lower-ranked target could prefer it over a higher one.
        for candidate in ranking.iter() {
            let target_id = &candidate.target.id;
            let admission = self
                .counter
                .attempt(target_id, candidate.cap)
                .await
                .map_err(|err| {
                    warn!(target_id = %target_id, error = %err, "admission counter failed");
                    RouteError::StoreUnavailable(err)
                })?;

            debug!(
                target_id = %target_id,
                count = admission.count,
                cap = candidate.cap,
                admitted = admission.admitted,
                "admission attempt"
            );

            trace.attempts.push(AdmissionAttempt {
                target_id: target_id.to_string(),
                value: candidate.value,
                cap: candidate.cap,
                count: admission.count,
                admitted: admission.admitted,
            });

            if admission.admitted {
                debug!(target_id = %target_id, url = %candidate.target.url, "visitor accepted");
                return Ok(RouteOutcome {
                    decision: RoutingDecision::Accept {
                        url: candidate.target.url.clone(),
                    },
                    trace,
                });
            }
        }

        debug!(attempts = trace.attempts.len(), "all eligible targets at cap");
        Ok(RouteOutcome {
            decision: RoutingDecision::Reject,
            trace,
        })
    }

    async fn fetch_targets(&self) -> Result<Vec<Target>, RouteError> {
        let fetched = tokio::time::timeout(self.directory_timeout, self.directory.get_all_targets())
            .await
            .unwrap_or(Err(DirectoryError::Timeout(self.directory_timeout)));
        fetched.map_err(|err| {
            warn!(error = %err, "target directory failed");
            RouteError::DirectoryUnavailable(err)
        })
    }
}
