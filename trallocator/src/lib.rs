//! Global allocator wrapper that counts the bytes requested through it, used by the benchmarks
//! to check that frame parsing stays off the heap.

extern crate std;
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Trallocator {
    inner: System,
    live: AtomicU64,
    total: AtomicU64,
}

unsafe impl GlobalAlloc for Trallocator {
    unsafe fn alloc(&self, l: Layout) -> *mut u8 {
        self.live.fetch_add(l.size() as u64, Ordering::SeqCst);
        self.total.fetch_add(l.size() as u64, Ordering::SeqCst);
        self.inner.alloc(l)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, l: Layout) {
        self.inner.dealloc(ptr, l);
        self.live.fetch_sub(l.size() as u64, Ordering::SeqCst);
    }
}

impl Trallocator {
    pub const fn new(inner: System) -> Self {
        Trallocator { inner, live: AtomicU64::new(0), total: AtomicU64::new(0) }
    }

    /// Forgets everything counted so far.
    pub fn reset(&self) {
        self.live.store(0, Ordering::SeqCst);
        self.total.store(0, Ordering::SeqCst);
    }

    /// Bytes currently allocated.
    pub fn get(&self) -> u64 {
        self.live.load(Ordering::SeqCst)
    }

    /// Bytes allocated since the last reset, freed or not.
    pub fn get_sum(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}
