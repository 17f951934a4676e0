//! Worker fan-out over identifier lists.
//!
//! Every item is processed in isolation: an error or panic is logged and the
//! item is reported with `R::default()`, while its siblings keep running.

use std::{fmt::Debug, future::Future, panic::AssertUnwindSafe, time::Duration};

use futures::{stream, FutureExt, StreamExt};
use tokio::time::sleep;
use tracing::{error, info, warn};

const PROGRESS_EVERY: usize = 100;

/// Split `items` into at most `workers` contiguous chunks whose sizes differ
/// by at most one. Order is preserved and no chunk is empty.
pub fn chunk_evenly<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let len = items.len();
    if len == 0 {
        return Vec::new();
    }
    let chunks = workers.max(1).min(len);
    let base = len / chunks;
    let extra = len % chunks;

    let mut iter = items.into_iter();
    (0..chunks)
        .map(|idx| {
            let size = base + usize::from(idx < extra);
            iter.by_ref().take(size).collect()
        })
        .collect()
}

async fn guarded<T, R, Fut>(item: T, fut: Fut) -> (T, R)
where
    T: Debug,
    R: Default,
    Fut: Future<Output = anyhow::Result<R>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(result)) => (item, result),
        Ok(Err(err)) => {
            warn!(?item, error = %format!("{err:#}"), "item failed; recording empty result");
            (item, R::default())
        }
        Err(_) => {
            error!(?item, "item panicked; recording empty result");
            (item, R::default())
        }
    }
}

/// Run `work` once per item with at most `workers` in flight. Results arrive
/// in completion order.
pub async fn run_each<T, R, F, Fut>(what: &str, items: Vec<T>, workers: usize, work: F) -> Vec<(T, R)>
where
    T: Clone + Debug,
    R: Default,
    F: Fn(T) -> Fut,
    Fut: Future<Output = anyhow::Result<R>>,
{
    let total = items.len();
    let mut results = stream::iter(items)
        .map(|item| {
            let fut = work(item.clone());
            guarded(item, fut)
        })
        .buffer_unordered(workers.max(1));

    let mut out = Vec::with_capacity(total);
    while let Some(pair) = results.next().await {
        out.push(pair);
        if out.len() % PROGRESS_EVERY == 0 || out.len() == total {
            info!(%what, done = out.len(), total, "progress");
        }
    }
    out
}

/// Split `items` into `workers` contiguous chunks and process each chunk on
/// its own task, items in sequence with `pause` (plus up to `pause` of
/// jitter) between them.
pub async fn run_chunked<T, R, F, Fut>(
    what: &str,
    items: Vec<T>,
    workers: usize,
    pause: Duration,
    work: F,
) -> Vec<(T, R)>
where
    T: Clone + Debug + Send + 'static,
    R: Default + Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    let total = items.len();
    let chunks = chunk_evenly(items, workers);
    info!(%what, total, chunks = chunks.len(), "starting workers");

    let mut handles = Vec::with_capacity(chunks.len());
    for (idx, chunk) in chunks.into_iter().enumerate() {
        let work = work.clone();
        let owned = chunk.clone();
        let handle = tokio::spawn(async move {
            let len = chunk.len();
            let mut out = Vec::with_capacity(len);
            for (pos, item) in chunk.into_iter().enumerate() {
                let fut = work(item.clone());
                out.push(guarded(item, fut).await);
                if pos + 1 < len && !pause.is_zero() {
                    sleep(pause + pause.mul_f64(rand::random::<f64>())).await;
                }
            }
            out
        });
        handles.push((idx, owned, handle));
    }

    let mut out = Vec::with_capacity(total);
    for (idx, owned, handle) in handles {
        match handle.await {
            Ok(results) => {
                info!(%what, chunk = idx, items = results.len(), "worker finished");
                out.extend(results);
            }
            Err(err) => {
                error!(%what, chunk = idx, %err, "worker aborted; recording empty results");
                out.extend(owned.into_iter().map(|item| (item, R::default())));
            }
        }
    }
    out
}
