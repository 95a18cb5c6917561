use crate::error::StoreError;

/// Growable record buffer with a doubling growth policy and a hard ceiling.
#[derive(Debug, Clone)]
pub struct CoordinateStore<T> {
    items: Vec<T>,
    capacity: usize,
    initial_capacity: usize,
    max_capacity: usize,
}

impl<T: Copy> CoordinateStore<T> {
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.clamp(1, max_capacity.max(1));
        Self {
            items: Vec::with_capacity(initial_capacity),
            capacity: initial_capacity,
            initial_capacity,
            max_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn last(&self) -> Option<T> {
        self.items.last().copied()
    }

    pub fn push(&mut self, item: T) -> Result<(), StoreError> {
        self.reserve(1)?;
        self.items.push(item);
        Ok(())
    }

    /// Makes sure `additional` more items fit, doubling as often as needed.
    pub fn reserve(&mut self, additional: usize) -> Result<(), StoreError> {
        let needed = self.items.len() + additional;
        if needed > self.max_capacity {
            return Err(StoreError::CapacityExceeded {
                max: self.max_capacity,
            });
        }
        while self.capacity < needed {
            self.grow()?;
        }
        Ok(())
    }

    /// Overwrites an existing item. Returns false if `index` is out of range.
    pub fn replace(&mut self, index: usize, item: T) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Drops every item and returns to the initial capacity.
    pub fn reset(&mut self) {
        self.items = Vec::with_capacity(self.initial_capacity);
        self.capacity = self.initial_capacity;
    }

    /// Frees the buffer. The store holds nothing until the next [`reset`](Self::reset).
    pub fn release(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }

    fn grow(&mut self) -> Result<(), StoreError> {
        let requested = (self.capacity * 2).clamp(1, self.max_capacity);
        self.items
            .try_reserve_exact(requested - self.items.len())
            .map_err(|_| StoreError::OutOfMemory { requested })?;
        tracing::debug!(from = self.capacity, to = requested, "coordinate store grown");
        self.capacity = requested;
        Ok(())
    }
}
