//! Shared in-memory collaborator harness for the scenario suite in
//! `scenarios.rs` (§8's S1-S6), implementing the traits in
//! `avtp_aaf_map::collab` the way a real embedder's media queue and AVTP
//! time source would.

use std::collections::VecDeque;

use avtp_aaf_map::{AvtpTime, MediaQueue, MediaQueueItem};

pub struct TestItem {
    pub data: Vec<u8>,
    pub len: usize,
    pub read_idx: usize,
    pub ts: Option<u32>,
}

impl TestItem {
    pub fn new(capacity: usize) -> Self {
        TestItem { data: vec![0u8; capacity], len: 0, read_idx: 0, ts: None }
    }

    pub fn filled(bytes: &[u8], ts: Option<u32>) -> Self {
        TestItem { data: bytes.to_vec(), len: bytes.len(), read_idx: 0, ts }
    }
}

impl MediaQueueItem for TestItem {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
    fn data(&self) -> &[u8] {
        &self.data
    }
    fn data_len(&self) -> usize {
        self.len
    }
    fn set_data_len(&mut self, len: usize) {
        self.len = len;
    }
    fn read_idx(&self) -> usize {
        self.read_idx
    }
    fn set_read_idx(&mut self, idx: usize) {
        self.read_idx = idx;
    }
    fn avtp_timestamp(&self) -> Option<u32> {
        self.ts
    }
    fn set_avtp_timestamp(&mut self, ts: Option<u32>) {
        self.ts = ts;
    }
}

/// A queue with an unbounded talker-side backlog (`tail_items`, drained
/// front-to-back) and a single listener-side slot (`head_item`, always
/// overwritten on the next `head_push`). Good enough to drive every S1-S6
/// scenario without a real AVTP transport.
pub struct TestQueue {
    pub tail_items: VecDeque<TestItem>,
    pub head_item: TestItem,
}

impl TestQueue {
    pub fn new(item_size: usize) -> Self {
        TestQueue { tail_items: VecDeque::new(), head_item: TestItem::new(item_size) }
    }
}

impl MediaQueue for TestQueue {
    type Item = TestItem;

    fn set_item_size(&mut self, size: usize) {
        self.head_item.data.resize(size, 0);
    }
    fn set_depth(&mut self, _depth: usize) {}

    fn head_lock(&mut self) -> Option<&mut TestItem> {
        Some(&mut self.head_item)
    }
    fn head_push(&mut self) {
        // Commit hands the filled item to the audio device; the next
        // `head_lock` gets a fresh, empty item back.
        self.head_item.len = 0;
        self.head_item.ts = None;
    }
    fn head_unlock(&mut self) {}

    fn tail_lock(&mut self) -> Option<&mut TestItem> {
        self.tail_items.front_mut()
    }
    fn tail_pull(&mut self) {
        self.tail_items.pop_front();
    }
    fn tail_unlock(&mut self) {}
}

pub struct TestTime {
    pub valid: bool,
    pub uncertain: bool,
    pub ts: u32,
}

impl TestTime {
    pub fn new() -> Self {
        TestTime { valid: false, uncertain: false, ts: 0 }
    }
}

impl AvtpTime for TestTime {
    fn is_valid(&self) -> bool {
        self.valid
    }
    fn is_uncertain(&self) -> bool {
        self.uncertain
    }
    fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
    fn set_uncertain(&mut self, uncertain: bool) {
        self.uncertain = uncertain;
    }
    fn add_usec(&mut self, usec: i64) {
        self.ts = self.ts.wrapping_add(usec as i32 as u32);
    }
    fn avtp_timestamp(&self) -> u32 {
        self.ts
    }
    fn set_from_timestamp(&mut self, ts: u32) {
        self.valid = true;
        self.ts = ts;
    }
}
