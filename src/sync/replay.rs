//! Commit replay.
//!
//! Rebuilds entry state by re-applying entry update commits in log order.
//! Writes no commits and publishes nothing.

use tracing::{info, warn};

use super::errors::SyncResult;
use crate::commit::Commit;
use crate::model::UpdateRequest;
use crate::observability::Event;
use crate::store::EntryStore;

/// Outcome of a replay run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    /// Commits upserted into the store
    pub applied: usize,
    /// Commits of another namespace/event, or whose data did not parse
    pub skipped: usize,
}

/// Re-apply `commits` to `store`, in order.
///
/// Store failures abort the run; the commits applied so far stay applied.
pub fn replay<'a, I>(commits: I, store: &dyn EntryStore) -> SyncResult<ReplayReport>
where
    I: IntoIterator<Item = &'a Commit>,
{
    info!(event = %Event::ReplayBegin);
    let mut report = ReplayReport::default();

    for commit in commits {
        if !commit.is_entry_update() {
            report.skipped += 1;
            continue;
        }

        match UpdateRequest::parse(&commit.data) {
            Ok(request) => {
                store.upsert(&request.entry_key, &request.new_value)?;
                report.applied += 1;
            }
            Err(err) => {
                warn!(event = %Event::RequestRejected, date = %commit.date, error = %err);
                report.skipped += 1;
            }
        }
    }

    info!(
        event = %Event::ReplayComplete,
        applied = report.applied,
        skipped = report.skipped,
    );
    Ok(report)
}
