use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join;
use thiserror::Error;

use crate::db::{CycleReport, Repository};
use crate::error::AppError;
use crate::feed::FetchEntries;
use crate::models::{Entry, Source};
use crate::scheduler::Cycle;

#[derive(Debug, Error)]
pub enum CycleError {
    /// Nothing from this cycle was written.
    #[error("fetching {feed} failed: {error}")]
    Fetch {
        feed: Source,
        #[source]
        error: AppError,
    },

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Runs one fetch cycle: both sources, then a single transaction.
pub struct Ingestor<A, B> {
    blog: A,
    qiita: B,
    repository: Arc<Repository>,
}

impl<A: FetchEntries, B: FetchEntries> Ingestor<A, B> {
    pub fn new(blog: A, qiita: B, repository: Arc<Repository>) -> Self {
        Self {
            blog,
            qiita,
            repository,
        }
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let started = Instant::now();
        tracing::info!("Fetch cycle started");

        // Both fetches must succeed before the transaction opens
        let (blog_entries, qiita_entries) =
            try_join(fetch(&self.blog), fetch(&self.qiita)).await?;

        let report = self
            .repository
            .save_cycle(vec![
                (self.blog.source(), blog_entries),
                (self.qiita.source(), qiita_entries),
            ])
            .await?;

        tracing::info!(
            inserted = report.inserted,
            already_present = report.already_present,
            failed = report.failed,
            "Fetch cycle completed in {:?}",
            started.elapsed()
        );

        Ok(report)
    }
}

impl<A, B> Cycle for Ingestor<A, B>
where
    A: FetchEntries + 'static,
    B: FetchEntries + 'static,
{
    async fn run(&self) -> Result<CycleReport, CycleError> {
        self.run_cycle().await
    }
}

async fn fetch<S: FetchEntries>(source: &S) -> Result<Vec<Entry>, CycleError> {
    source
        .fetch_entries()
        .await
        .map_err(|error| CycleError::Fetch {
            feed: source.source(),
            error,
        })
}
