use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::ReplayStoreError;
use crate::record::Record;
use crate::store::ReplayStore;

/// Draws uniformly at random from a [`ReplayStore`]'s recent-records cache.
///
/// Grounded on `SharedRWBuffer::Sampler`: the original retries `table_read_recent` in a
/// loop until the cache is non-empty; this version surfaces an empty cache as
/// [`ReplayStoreError::Empty`] instead of blocking, since triggering a refresh is a
/// caller decision here (via [`ReplayStore::refresh_recent`]) rather than something the
/// sampler does implicitly mid-sample.
pub struct Sampler<'a> {
    store: &'a ReplayStore,
    rng: ThreadRng,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(store: &'a ReplayStore) -> Self {
        Self { store, rng: rand::thread_rng() }
    }

    /// Returns a clone of one record chosen uniformly from the current recent-records
    /// buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayStoreError::Empty`] if no refresh has populated the buffer yet.
    pub fn sample(&mut self) -> Result<Record, ReplayStoreError> {
        let rng = &mut self.rng;
        self.store.read_recent(|records| {
            if records.is_empty() {
                return Err(ReplayStoreError::Empty);
            }
            let idx = rng.gen_range(0..records.len());
            Ok(records[idx].clone())
        })
    }
}
