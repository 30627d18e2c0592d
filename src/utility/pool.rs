use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;

// Buffers kept around beyond this are dropped instead of pooled.
const MAX_RETAINED: usize = 16;

/// Recycles sample buffers between subframe decodes.
///
/// Cloning the pool hands out another handle to the same set of buffers.
/// Buffers, and the subframes holding them, may move between threads and
/// still find their way back.
#[derive(Clone, Default)]
pub struct BufferPool {
  free: Arc<Mutex<Vec<Vec<i32>>>>,
}

impl BufferPool {
  pub fn new() -> Self {
    BufferPool::default()
  }

  /// Checks out a zero filled buffer of `length` samples.
  pub fn take(&self, length: usize) -> PooledBuffer {
    let mut data = self.free.lock().pop().unwrap_or_default();

    data.clear();
    data.resize(length, 0);

    PooledBuffer {
      data: data,
      pool: Some(self.clone()),
    }
  }

  /// Number of buffers waiting to be reused.
  pub fn available(&self) -> usize {
    self.free.lock().len()
  }

  fn recycle(&self, data: Vec<i32>) {
    let mut free = self.free.lock();

    if data.capacity() > 0 && free.len() < MAX_RETAINED {
      free.push(data);
    }
  }
}

impl fmt::Debug for BufferPool {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("BufferPool")
      .field("available", &self.available())
      .finish()
  }
}

/// Sample buffer that goes back to its pool when dropped.
pub struct PooledBuffer {
  data: Vec<i32>,
  pool: Option<BufferPool>,
}

impl PooledBuffer {
  /// A zero filled buffer that isn't tied to any pool.
  pub fn detached(length: usize) -> Self {
    PooledBuffer {
      data: vec![0; length],
      pool: None,
    }
  }

  /// Takes the samples out, so they never return to the pool.
  pub fn into_vec(mut self) -> Vec<i32> {
    self.pool = None;

    mem::replace(&mut self.data, Vec::new())
  }
}

impl Drop for PooledBuffer {
  fn drop(&mut self) {
    if let Some(pool) = self.pool.take() {
      pool.recycle(mem::replace(&mut self.data, Vec::new()));
    }
  }
}

impl Deref for PooledBuffer {
  type Target = [i32];

  fn deref(&self) -> &[i32] {
    &self.data
  }
}

impl DerefMut for PooledBuffer {
  fn deref_mut(&mut self) -> &mut [i32] {
    &mut self.data
  }
}

impl PartialEq for PooledBuffer {
  fn eq(&self, other: &PooledBuffer) -> bool {
    self.data == other.data
  }
}

impl Eq for PooledBuffer {}

impl fmt::Debug for PooledBuffer {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(&self.data, f)
  }
}
