use std::path::PathBuf;

use crate::sorting::sort_executor::{
    process_item, ItemResult, ProbeWorker, SortContext, SortExecutor,
};

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Worker-pool executor: one thread per [`ProbeWorker`], each with its own
/// decoder and extractor, pulling items from a shared job channel.
///
/// Layout: `main [feed jobs] → worker × N → main [collect, reorder]`
///
/// Placement is safe to run concurrently because destinations are created
/// with exclusive-create semantics; results are reordered by item index so
/// the caller sees the same sequence as the sequential executor.
pub struct ThreadedSortExecutor {
    channel_capacity: usize,
}

impl ThreadedSortExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedSortExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SortExecutor for ThreadedSortExecutor {
    fn execute(
        &self,
        workers: Vec<ProbeWorker>,
        items: &[PathBuf],
        ctx: &SortContext,
    ) -> Result<Vec<ItemResult>, Box<dyn std::error::Error>> {
        if workers.is_empty() {
            return Err("threaded executor needs at least one worker".into());
        }

        let (job_tx, job_rx) =
            crossbeam_channel::bounded::<(usize, PathBuf)>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, ItemResult)>();

        let handles: Vec<_> = workers
            .into_iter()
            .map(|worker| spawn_worker(worker, job_rx.clone(), result_tx.clone(), ctx.clone()))
            .collect();
        drop(job_rx);
        drop(result_tx);

        for (index, path) in items.iter().enumerate() {
            if ctx.is_cancelled() {
                break;
            }
            if job_tx.send((index, path.clone())).is_err() {
                break;
            }
        }
        drop(job_tx);

        let mut indexed: Vec<(usize, ItemResult)> = result_rx.iter().collect();

        for handle in handles {
            if handle.join().is_err() {
                return Err("Worker thread panicked".into());
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}

fn spawn_worker(
    mut worker: ProbeWorker,
    job_rx: crossbeam_channel::Receiver<(usize, PathBuf)>,
    result_tx: crossbeam_channel::Sender<(usize, ItemResult)>,
    ctx: SortContext,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for (index, path) in job_rx {
            if ctx.is_cancelled() {
                break;
            }
            let result = process_item(&mut worker, &ctx, &path);
            if result_tx.send((index, result)).is_err() {
                break;
            }
        }
    })
}
