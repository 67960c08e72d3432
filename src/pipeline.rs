//! Ordered filter composition.

use alloc::vec::Vec;
use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::filter::Filter;

/// An ordered sequence of filters applied left to right.
///
/// Filters are pure, so applying the same pipeline to the same buffer is
/// deterministic and bit-identical across runs. An empty pipeline is the
/// identity and returns the buffer untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    filters: Vec<Filter>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter, builder style.
    #[must_use]
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter in order, each consuming the previous stage's
    /// output. Fails fast: the first filter error aborts the run and no
    /// partial buffer escapes.
    pub fn apply(&self, buffer: PixelBuffer, stop: impl Stop) -> Result<PixelBuffer, RasterError> {
        let mut current = buffer;
        for filter in &self.filters {
            current = filter.apply_with(&current, &stop)?;
        }
        Ok(current)
    }
}
