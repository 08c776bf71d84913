//! Corpus aggregation entry points

use super::batch::{run_batches, AggregateOptions};
use super::extractor::FeatureExtractor;
use super::statistics::{CorpusStatistics, Monoid};
use crate::config::AggregationConfig;
use crate::errors::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of [`CorpusAggregator::aggregate_with`].
///
/// When `complete` is false the statistics cover only the
/// `documents_processed` documents that ran before cancellation; they are
/// still a valid monoid value for that subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub statistics: CorpusStatistics,
    pub documents_processed: usize,
    pub batches: usize,
    pub complete: bool,
    #[serde(rename = "elapsedMs", with = "crate::shared::serde_duration")]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusAggregator {
    config: AggregationConfig,
}

impl CorpusAggregator {
    pub fn new(config: AggregationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Corpus statistics for `documents`. Any extraction failure aborts the
    /// run and is returned; no partial statistics accompany an error.
    pub fn aggregate<D, E>(&self, documents: &[D], extractor: &E) -> Result<CorpusStatistics>
    where
        D: Sync,
        E: FeatureExtractor<D>,
    {
        self.aggregate_with(documents, extractor, AggregateOptions::default())
            .map(|aggregation| aggregation.statistics)
    }

    /// [`aggregate`](Self::aggregate) with cancellation and progress hooks
    pub fn aggregate_with<D, E>(
        &self,
        documents: &[D],
        extractor: &E,
        mut options: AggregateOptions<'_>,
    ) -> Result<Aggregation>
    where
        D: Sync,
        E: FeatureExtractor<D>,
    {
        let mut statistics = CorpusStatistics::empty();

        let outcome = run_batches(
            documents,
            &self.config,
            &mut options,
            |document| {
                let features = extractor.extract(document)?;
                Ok(CorpusStatistics::from_features(&features))
            },
            |batch| {
                let batch_total = CorpusStatistics::concat(batch);
                statistics = std::mem::take(&mut statistics).combine(batch_total);
            },
        )?;

        Ok(Aggregation {
            statistics,
            documents_processed: outcome.processed,
            batches: outcome.batches,
            complete: outcome.complete,
            elapsed: outcome.elapsed,
        })
    }

    /// Apply `f` to every item under the same batching and concurrency
    /// limits. Results come back in input order. A cancelled run is
    /// `Err(Cancelled)`.
    pub fn process_parallel<T, R, F>(&self, items: &[T], f: F, mut options: AggregateOptions<'_>) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync,
    {
        let mut results = Vec::with_capacity(items.len());
        let outcome = run_batches(items, &self.config, &mut options, f, |batch| results.extend(batch))?;

        if !outcome.complete {
            return Err(GraphError::Cancelled);
        }
        Ok(results)
    }
}
