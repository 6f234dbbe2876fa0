//! Concurrent fan-out/fan-in job aggregator.
//!
//! [`run_all`] dispatches N independent jobs, each tagged with its position
//! in the input list, and returns a [`WorkStream`] that yields one [`Work`]
//! item per job in completion order. The stream ends after every job has
//! emitted exactly once; consumers correlate results strictly by tag, never
//! by arrival order.
//!
//! A failing job surfaces as its own `Work` item and does not cancel
//! siblings; whether one failure invalidates the whole aggregate is the
//! consumer's decision (see [`crate::pagination::assemble`]). There is no
//! retry. Dropping the stream before it is exhausted cancels all jobs still
//! in flight.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::{Future, FutureExt, Stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::types::Photo;

/// The payload a job can produce, one variant per job kind.
#[derive(Debug)]
pub enum JobOutput {
    /// A page of photo entries.
    Photos(Vec<Photo>),
    /// A scalar count.
    Count(i64),
    /// A single freshly persisted photo.
    Photo(Box<Photo>),
    /// Completed with no payload (e.g. an asset write).
    Saved,
}

/// One tagged, completed (or failed) unit of job output. Created when its
/// job finishes, consumed exactly once by the collector.
#[derive(Debug)]
pub struct Work {
    pub idx: usize,
    pub result: Result<JobOutput, AppError>,
}

/// An independent unit of concurrent work producing exactly one result or
/// one failure.
pub struct Job {
    worker: BoxFuture<'static, Result<JobOutput, AppError>>,
}

impl Job {
    pub fn new<F>(worker: F) -> Self
    where
        F: Future<Output = Result<JobOutput, AppError>> + Send + 'static,
    {
        Self { worker: worker.boxed() }
    }
}

/// The output side of a fan-out: yields `Work` items as jobs complete and
/// ends once all of them have emitted. Dropping the stream early cancels
/// the jobs still in flight at their next await point.
pub struct WorkStream {
    rx: mpsc::Receiver<Work>,
    cancel: CancellationToken,
}

impl WorkStream {
    /// Drains the stream to completion, letting every job run to its end,
    /// and returns all work items in arrival order.
    pub async fn collect_all(mut self) -> Vec<Work> {
        use tokio_stream::StreamExt;

        let mut works = Vec::new();
        while let Some(work) = self.next().await {
            works.push(work);
        }
        works
    }
}

impl Stream for WorkStream {
    type Item = Work;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for WorkStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts every job concurrently and returns the stream of their tagged
/// results.
///
/// There is no ordering guarantee between job completions. The channel
/// capacity equals the job count, so a finishing job never blocks on a slow
/// consumer; the channel closes once every job task has dropped its sender.
pub fn run_all(jobs: Vec<Job>) -> WorkStream {
    let (tx, rx) = mpsc::channel(jobs.len().max(1));
    let cancel = CancellationToken::new();

    for (idx, job) in jobs.into_iter().enumerate() {
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = job.worker => {
                    let _ = tx.send(Work { idx, result }).await;
                }
            }
        });
    }

    WorkStream { rx, cancel }
}
