use crate::locale::LocaleFilter;
use crate::persist::{load_existing, save_dataset};
use crate::{Record, StatusId};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Row counts observed during one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub old_rows: usize,
    pub new_rows: usize,
    pub combined_rows: usize,
    pub deduped_rows: usize,
    pub final_rows: usize,
}

/// Keep only the last occurrence of each id, in the order of those last
/// occurrences.
pub fn dedup_keep_last(records: Vec<Record>) -> Vec<Record> {
    let mut last: HashMap<StatusId, usize> = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        last.insert(r.id, i);
    }
    records
        .into_iter()
        .enumerate()
        .filter(|(i, r)| last.get(&r.id) == Some(i))
        .map(|(_, r)| r)
        .collect()
}

/// Union `old` then `batch`, dedup by id (later rows win), drop foreign rows.
pub fn combine(old: Vec<Record>, batch: Vec<Record>, filter: &LocaleFilter) -> (Vec<Record>, MergeReport) {
    let mut report = MergeReport { old_rows: old.len(), new_rows: batch.len(), ..Default::default() };
    let mut all = old;
    all.extend(batch);
    report.combined_rows = all.len();
    let all = dedup_keep_last(all);
    report.deduped_rows = all.len();
    let all = filter.retain_local(all);
    report.final_rows = all.len();
    (all, report)
}

/// Load the dataset at `path` (if any), merge `batch` into it and rewrite
/// the file. The file is only opened for writing once the merged rows are
/// computed, but the rewrite itself is not atomic.
pub fn merge<P: AsRef<Path>>(path: P, batch: Vec<Record>, filter: &LocaleFilter) -> Result<MergeReport> {
    let path = path.as_ref();
    let old = match load_existing(path)? {
        Some(rows) => {
            tracing::info!(path = %path.display(), rows = rows.len(), "updating existing dataset");
            rows
        }
        None => {
            tracing::info!(path = %path.display(), "creating new dataset");
            Vec::new()
        }
    };
    let (rows, report) = combine(old, batch, filter);
    tracing::info!(
        old = report.old_rows,
        new = report.new_rows,
        all = report.combined_rows,
        deduped = report.deduped_rows,
        "merged batch"
    );
    let excluded = report.deduped_rows - report.final_rows;
    tracing::info!(excluded, final_rows = report.final_rows, "dropped foreign rows");
    save_dataset(path, &rows)?;
    Ok(report)
}
