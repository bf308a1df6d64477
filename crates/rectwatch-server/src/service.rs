use rectwatch_core::wire::decode_query;
use rectwatch_core::{
    Clock, MatchSet, Query, Rectangle, RectangleStore, Result, find_overlaps, log_info,
};

/// Ties the matcher to a store: the two operations the server exposes.
pub struct QueryService<S, C> {
    store: S,
    clock: C,
    reject_negative: bool,
}

impl<S, C> QueryService<S, C>
where
    S: RectangleStore,
    C: Clock,
{
    /// Creates a service that rejects negative dimensions.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            reject_negative: true,
        }
    }

    /// Sets whether queries with negative width or height are refused.
    pub fn reject_negative(mut self, reject: bool) -> Self {
        self.reject_negative = reject;
        self
    }

    /// Finds the query's overlaps and stores them as one batch.
    ///
    /// The returned set is exactly what was persisted. If the store fails
    /// nothing is returned and the error is passed on.
    pub fn submit_query(&self, query: &Query) -> Result<MatchSet> {
        let matches = find_overlaps(query, &self.clock);
        self.store.store(&matches)?;
        log_info!(
            "query with {} candidates stored {} matches",
            query.candidates.len(),
            matches.len()
        );
        Ok(matches)
    }

    /// Decodes a JSON request body and submits it.
    pub fn submit_body(&self, body: &[u8]) -> Result<MatchSet> {
        let query = decode_query(body, self.reject_negative)?;
        self.submit_query(&query)
    }

    /// Every rectangle stored so far.
    pub fn list_results(&self) -> Result<Vec<Rectangle>> {
        self.store.list_all()
    }
}
