//! Output taps for plotting a node's signal.
//!
//! The render thread pushes every output sample of the tapped node into an SPSC
//! ring buffer; the UI side drains it with [`NodeTap::poll`] and keeps a rolling
//! window of the most recent samples.

use crate::lockfree::AtomicFlag;
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Ring capacity in multiples of the history length.
const RING_HISTORIES: usize = 64;

/// Smallest ring, so short histories still survive a large device buffer.
const MIN_RING_CAPACITY: usize = 8192;

/// Render-side end of a tap.
pub struct TapWriter {
    producer: HeapProd<f32>,
    enabled: Arc<AtomicFlag>,
}

impl TapWriter {
    /// Drops the sample when the tap is stopped or the ring is full.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        if self.enabled.get() {
            let _ = self.producer.try_push(sample);
        }
    }
}

/// UI-side end of a tap: a rolling history of the node's output.
pub struct NodeTap {
    node: String,
    consumer: HeapCons<f32>,
    enabled: Arc<AtomicFlag>,
    history: VecDeque<f32>,
    history_len: usize,
}

impl NodeTap {
    /// Create both ends. The tap starts stopped.
    pub fn pair(node: impl Into<String>, history_len: usize) -> (TapWriter, NodeTap) {
        let history_len = history_len.max(1);
        let capacity = (history_len * RING_HISTORIES).max(MIN_RING_CAPACITY);
        let (producer, consumer) = HeapRb::<f32>::new(capacity).split();
        let enabled = Arc::new(AtomicFlag::new(false));

        (
            TapWriter {
                producer,
                enabled: Arc::clone(&enabled),
            },
            NodeTap {
                node: node.into(),
                consumer,
                enabled,
                history: VecDeque::with_capacity(history_len),
                history_len,
            },
        )
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn start(&self) {
        self.enabled.set(true);
    }

    pub fn stop(&self) {
        self.enabled.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.enabled.get()
    }

    /// Drain pending samples into the history. Returns how many were read.
    pub fn poll(&mut self) -> usize {
        let mut read = 0;
        while let Some(sample) = self.consumer.try_pop() {
            if self.history.len() == self.history_len {
                self.history.pop_front();
            }
            self.history.push_back(sample);
            read += 1;
        }
        read
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<f32> {
        self.history.iter().copied().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn set_history_len(&mut self, len: usize) {
        self.history_len = len.max(1);
        while self.history.len() > self.history_len {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl std::fmt::Debug for NodeTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeTap")
            .field("node", &self.node)
            .field("running", &self.is_running())
            .field("history_len", &self.history_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_tap_drops_samples() {
        let (mut writer, mut tap) = NodeTap::pair("osc", 4);
        writer.push(1.0);
        assert_eq!(tap.poll(), 0);
        assert!(tap.history().is_empty());
    }

    #[test]
    fn test_history_rolls() {
        let (mut writer, mut tap) = NodeTap::pair("osc", 4);
        tap.start();
        for i in 0..10 {
            writer.push(i as f32);
        }

        assert_eq!(tap.poll(), 10);
        assert_eq!(tap.history(), vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_shrinking_history_keeps_newest() {
        let (mut writer, mut tap) = NodeTap::pair("osc", 4);
        tap.start();
        for i in 0..4 {
            writer.push(i as f32);
        }
        tap.poll();
        tap.set_history_len(2);
        assert_eq!(tap.history(), vec![2.0, 3.0]);
    }
}
