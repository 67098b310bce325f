use std::path::PathBuf;

use crate::sorting::sort_executor::{
    process_item, ItemResult, ProbeWorker, SortContext, SortExecutor,
};

/// Single-threaded executor: one worker, items processed in order.
pub struct SequentialSortExecutor;

impl SortExecutor for SequentialSortExecutor {
    fn execute(
        &self,
        workers: Vec<ProbeWorker>,
        items: &[PathBuf],
        ctx: &SortContext,
    ) -> Result<Vec<ItemResult>, Box<dyn std::error::Error>> {
        let mut worker = workers
            .into_iter()
            .next()
            .ok_or("sequential executor needs at least one worker")?;

        let mut results = Vec::with_capacity(items.len());
        for path in items {
            if ctx.is_cancelled() {
                break;
            }
            results.push(process_item(&mut worker, ctx, path));
        }
        Ok(results)
    }
}
