//! Business logic helpers for recording entries.

use tracing::info;

use crate::core::services::ServiceResult;
use crate::domain::{EntryDraft, Ledger};
use crate::storage::LedgerStore;

/// Validated, append-only entry recording.
pub struct EntryService;

impl EntryService {
    /// Validates `draft` and appends it in memory, returning its position.
    pub fn record(ledger: &mut Ledger, draft: EntryDraft) -> ServiceResult<usize> {
        let position = ledger.append(draft)?;
        info!("recorded entry #{} ({} total)", position, ledger.len());
        Ok(position)
    }

    /// Appends `draft` and persists the whole snapshot. The in-memory ledger
    /// only changes once the store accepted the new snapshot.
    pub fn record_and_persist(
        store: &dyn LedgerStore,
        ledger: &mut Ledger,
        draft: EntryDraft,
    ) -> ServiceResult<usize> {
        let mut next = ledger.clone();
        let position = Self::record(&mut next, draft)?;
        store.persist(&next)?;
        *ledger = next;
        Ok(position)
    }
}
