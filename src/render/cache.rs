use std::sync::Arc;

use rand::Rng;

use crate::{
    filter::chain::{FilterParameters, apply_filter_chain},
    foundation::core::Bitmap,
    foundation::error::PosterResult,
};

/// Memoized filter chain output keyed by the parameters that produced it.
#[derive(Clone, Debug, Default)]
pub struct FilterCache {
    entry: Option<(FilterParameters, Arc<Bitmap>)>,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_for(&self, params: &FilterParameters) -> bool {
        matches!(&self.entry, Some((key, _)) if key == params)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            tracing::debug!("filter cache invalidated");
        }
    }

    /// Cached bitmap, if any, without checking its key.
    pub fn peek(&self) -> Option<&Arc<Bitmap>> {
        self.entry.as_ref().map(|(_, bmp)| bmp)
    }

    /// Return the cached output for `params`, running the chain on `source` on a miss.
    pub fn get_or_compute<R: Rng + ?Sized>(
        &mut self,
        params: &FilterParameters,
        source: &Bitmap,
        rng: &mut R,
    ) -> PosterResult<Arc<Bitmap>> {
        if let Some((key, bmp)) = &self.entry
            && key == params
        {
            self.hits += 1;
            return Ok(Arc::clone(bmp));
        }

        self.misses += 1;
        let filtered = Arc::new(apply_filter_chain(source, params, rng)?);
        self.entry = Some((params.clone(), Arc::clone(&filtered)));
        Ok(filtered)
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
