//! Product identifier minting.
//!
//! The minter keeps the last issued numeric suffix in an atomic counter. It is
//! seeded once from the store and advanced atomically, so concurrent callers
//! in one process always receive distinct identifiers. It never issues a
//! suffix above [`ProductId::MAX_SUFFIX`].

use std::sync::atomic::{AtomicU64, Ordering};

use stockroom_core::ProductId;

/// Suffix assumed when the store holds no parseable product identifier.
pub const BASELINE_SUFFIX: u64 = 100_000;

#[derive(Debug)]
pub struct IdMinter {
    last: AtomicU64,
}

impl IdMinter {
    /// Seed from the highest identifier currently stored.
    pub fn seeded(max_existing: Option<&ProductId>) -> Self {
        Self {
            last: AtomicU64::new(Self::seed_from(max_existing)),
        }
    }

    /// Suffix of `max_existing`, or the baseline when absent or unparsable.
    pub fn seed_from(max_existing: Option<&ProductId>) -> u64 {
        max_existing
            .and_then(ProductId::suffix)
            .unwrap_or(BASELINE_SUFFIX)
    }

    /// Issue the next identifier, or `None` once the suffix space is used up.
    pub fn next(&self) -> Option<ProductId> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                last.checked_add(1).filter(|n| *n <= ProductId::MAX_SUFFIX)
            })
            .ok()
            .map(|last| ProductId::minted(last + 1))
    }

    /// Record an identifier issued elsewhere so it is never minted again.
    pub fn observe(&self, id: &ProductId) {
        if let Some(suffix) = id.suffix() {
            self.last.fetch_max(suffix, Ordering::SeqCst);
        }
    }

    /// Move the counter forward to the store's current maximum. Never moves back.
    pub fn reseed(&self, max_existing: Option<&ProductId>) {
        self.last
            .fetch_max(Self::seed_from(max_existing), Ordering::SeqCst);
    }

    /// Last suffix handed out (or the seed, if nothing was minted yet).
    pub fn last_suffix(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl Default for IdMinter {
    fn default() -> Self {
        Self::seeded(None)
    }
}
