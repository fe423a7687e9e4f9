// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::marker::PhantomData;

use crate::MemoryProvider;

/// A builder for [`MemoryProvider`] instances.
///
/// # Examples
///
/// ```
/// use ember_memory::MemoryProvider;
///
/// let provider = MemoryProvider::<String>::builder()
///     .initial_capacity(1024)
///     .build();
/// assert!(provider.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct MemoryProviderBuilder<V> {
    pub(crate) initial_capacity: Option<usize>,
    _value: PhantomData<fn() -> V>,
}

impl<V> MemoryProviderBuilder<V> {
    /// Creates a builder with no capacity hint.
    pub fn new() -> Self {
        Self {
            initial_capacity: None,
            _value: PhantomData,
        }
    }

    /// Pre-allocates room for `capacity` items in the item map and the
    /// ordered index.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Builds the provider.
    #[must_use]
    pub fn build(self) -> MemoryProvider<V> {
        MemoryProvider::from_builder(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_an_empty_provider() {
        let provider = MemoryProviderBuilder::<u32>::new()
            .initial_capacity(16)
            .build();
        assert_eq!(provider.len(), 0);
    }
}
