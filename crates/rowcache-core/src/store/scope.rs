use crate::{source::DataSource, store::RowStore};
use std::ops::{Deref, DerefMut};

///
/// PreloadScope
///
/// RAII override of a store's preload count. Dereferences to the store and
/// restores the previous count on drop, including during unwind.
///

pub struct PreloadScope<'a, S: DataSource> {
    store: &'a mut RowStore<S>,
    previous: usize,
}

impl<'a, S: DataSource> PreloadScope<'a, S> {
    pub fn enter(store: &'a mut RowStore<S>, count: usize) -> Self {
        let previous = store.preload_count();
        store.set_preload_count(count);

        Self { store, previous }
    }
}

impl<S: DataSource> Deref for PreloadScope<'_, S> {
    type Target = RowStore<S>;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

impl<S: DataSource> DerefMut for PreloadScope<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.store
    }
}

impl<S: DataSource> Drop for PreloadScope<'_, S> {
    fn drop(&mut self) {
        self.store.set_preload_count(self.previous);
    }
}
