//! Fixed-capacity circular byte queue used to delay the temporal-redundant
//! audio copy and to track per-frame recovery metadata.
//!
//! Mirrors the source module's `circular_queue_t` and its four bulk
//! operations, but gives the zero-fill and discard overloads their own
//! names (`push_zeros`/`discard`) instead of accepting a null pointer.

/// A byte ring buffer sized once at construction and never resized.
///
/// `head` is the next offset to write to, `tail` the next offset to read
/// from; the queue is empty when `head == tail`. Capacity is fixed so a
/// full queue can't be distinguished from an empty one by position alone —
/// callers are responsible for never pushing more than `capacity()` bytes
/// without a matching pull, per the type's precondition.
#[derive(Debug)]
pub struct CircularByteQueue {
    storage: Vec<u8>,
    head: usize,
    tail: usize,
}

impl CircularByteQueue {
    /// Allocate a queue of exactly `capacity` bytes, initially empty.
    /// `capacity` must be greater than zero.
    pub fn allocate(capacity: usize) -> Self {
        assert!(capacity > 0, "circular queue capacity must be nonzero");
        CircularByteQueue {
            storage: vec![0u8; capacity],
            head: 0,
            tail: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes currently queued (pushed but not yet pulled).
    pub fn bytes_queued(&self) -> usize {
        if self.tail > self.head {
            self.head + self.capacity() - self.tail
        } else {
            self.head - self.tail
        }
    }

    /// Copy `src` into the queue at `head`, advancing `head` by `src.len()`.
    /// Precondition: `src.len() <= capacity()`.
    pub fn push(&mut self, src: &[u8]) {
        self.push_inner(Some(src), src.len());
    }

    /// Push `n` zero bytes at `head`, advancing `head` by `n`.
    /// Precondition: `n <= capacity()`.
    pub fn push_zeros(&mut self, n: usize) {
        self.push_inner(None, n);
    }

    fn push_inner(&mut self, src: Option<&[u8]>, n: usize) {
        let capacity = self.capacity();
        assert!(n <= capacity, "push of {n} bytes exceeds queue capacity {capacity}");

        let phase1 = (capacity - self.head).min(n);
        match src {
            Some(data) => self.storage[self.head..self.head + phase1].copy_from_slice(&data[..phase1]),
            None => self.storage[self.head..self.head + phase1].fill(0),
        }
        self.head += phase1;
        if self.head >= capacity {
            self.head = 0;
            let phase2 = n - phase1;
            if phase2 > 0 {
                match src {
                    Some(data) => self.storage[..phase2].copy_from_slice(&data[phase1..phase1 + phase2]),
                    None => self.storage[..phase2].fill(0),
                }
                self.head = phase2;
            }
        }
    }

    /// Copy `n` bytes from `tail` into `dst`, advancing `tail` by `n`.
    /// Precondition: `dst.len() == n && n <= capacity()`.
    pub fn pull(&mut self, dst: &mut [u8]) {
        let n = dst.len();
        self.pull_inner(Some(dst), n);
    }

    /// Advance `tail` by `n` bytes without copying them anywhere (used to
    /// skip padding). Precondition: `n <= capacity()`.
    pub fn discard(&mut self, n: usize) {
        self.pull_inner(None, n);
    }

    fn pull_inner(&mut self, mut dst: Option<&mut [u8]>, n: usize) {
        let capacity = self.capacity();
        assert!(n <= capacity, "pull of {n} bytes exceeds queue capacity {capacity}");

        let phase1 = (capacity - self.tail).min(n);
        if let Some(ref mut d) = dst {
            d[..phase1].copy_from_slice(&self.storage[self.tail..self.tail + phase1]);
        }
        self.tail += phase1;
        if self.tail >= capacity {
            self.tail = 0;
            let phase2 = n - phase1;
            if phase2 > 0 {
                if let Some(ref mut d) = dst {
                    d[phase1..phase1 + phase2].copy_from_slice(&self.storage[..phase2]);
                }
                self.tail = phase2;
            }
        }
    }

    /// Return `true` iff the next `src.len()` bytes starting at `tail`
    /// equal `src`, without consuming them. Precondition:
    /// `src.len() <= capacity()`.
    pub fn compare(&self, src: &[u8]) -> bool {
        let n = src.len();
        let capacity = self.capacity();
        assert!(n <= capacity, "compare of {n} bytes exceeds queue capacity {capacity}");

        let phase1 = (capacity - self.tail).min(n);
        if self.storage[self.tail..self.tail + phase1] != src[..phase1] {
            return false;
        }
        let phase2 = n - phase1;
        if phase2 > 0 && self.storage[..phase2] != src[phase1..phase1 + phase2] {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_reports_zero_bytes_queued() {
        let q = CircularByteQueue::allocate(8);
        assert_eq!(q.bytes_queued(), 0);
    }

    #[test]
    fn push_pull_round_trip_preserves_bytes() {
        let mut q = CircularByteQueue::allocate(8);
        q.push(&[1, 2, 3, 4]);
        assert_eq!(q.bytes_queued(), 4);
        let mut out = [0u8; 4];
        q.pull(&mut out);
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(q.bytes_queued(), 0);
    }

    #[test]
    fn wraps_around_in_two_phases() {
        let mut q = CircularByteQueue::allocate(4);
        q.push(&[1, 2, 3]);
        let mut tmp = [0u8; 2];
        q.pull(&mut tmp); // tail now at 2, head at 3
        q.push(&[4, 5, 6]); // wraps: head 3->4(wrap to 0)->1->2, but capacity 4 so careful
        // storage capacity 4, head was 3, pushing 3 bytes: phase1 = min(4-3,3)=1 -> head=4->wrap->0, phase2=2 -> head=2
        let mut out = [0u8; 4];
        q.pull(&mut out);
        assert_eq!(out, [3, 4, 5, 6]);
        assert_eq!(q.bytes_queued(), 0);
    }

    #[test]
    fn push_zeros_then_discard_skips_without_copying() {
        let mut q = CircularByteQueue::allocate(4);
        q.push_zeros(4);
        assert_eq!(q.bytes_queued(), 4);
        q.discard(4);
        assert_eq!(q.bytes_queued(), 0);
    }

    #[test]
    fn compare_matches_without_consuming() {
        let mut q = CircularByteQueue::allocate(4);
        q.push(&[9, 8, 7]);
        assert!(q.compare(&[9, 8, 7]));
        assert!(!q.compare(&[9, 8, 6]));
        // still queued after compare
        assert_eq!(q.bytes_queued(), 3);
    }

    #[test]
    fn repeated_equal_length_push_pull_returns_to_baseline() {
        let mut q = CircularByteQueue::allocate(6);
        for i in 0..20u8 {
            q.push(&[i, i.wrapping_add(1)]);
            let mut out = [0u8; 2];
            q.pull(&mut out);
            assert_eq!(out, [i, i.wrapping_add(1)]);
            assert_eq!(q.bytes_queued(), 0);
            assert!(q.head < q.capacity());
            assert!(q.tail < q.capacity());
        }
    }
}
