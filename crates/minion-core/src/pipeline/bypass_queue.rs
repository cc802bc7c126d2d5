//! Two-entry bypass queue between M1 and the consumer.

use crate::ProtocolViolation;

/// Number of slots in the response queue.
pub const BYPASS_QUEUE_CAPACITY: usize = 2;

/// What one [`BypassQueue::step`] committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueStep<T> {
    /// Entry handed to the consumer this step.
    pub delivered: Option<T>,
    /// True when `delivered` cut through without being stored.
    pub bypassed: bool,
    /// True when the incoming entry was written into a slot.
    pub enqueued: bool,
}

/// FIFO of [`BYPASS_QUEUE_CAPACITY`] entries with cut-through when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BypassQueue<T> {
    slots: [Option<T>; BYPASS_QUEUE_CAPACITY],
    head: usize,
    len: usize,
}

impl<T: Copy> Default for BypassQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> BypassQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; BYPASS_QUEUE_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    /// Number of stored entries; the only signal fed back to admission.
    #[must_use]
    pub const fn occupancy(&self) -> usize {
        self.len
    }

    /// True when nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when no slot is free.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == BYPASS_QUEUE_CAPACITY
    }

    /// Oldest stored entry.
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            self.slots[self.head].as_ref()
        }
    }

    /// Stored entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| {
            self.slots[(self.head + offset) % BYPASS_QUEUE_CAPACITY].as_ref()
        })
    }

    /// Entry presented to the consumer this step: the oldest stored entry,
    /// or `incoming` when the queue is empty.
    #[must_use]
    pub fn peek(&self, incoming: Option<T>) -> Option<T> {
        self.head().copied().or(incoming)
    }

    /// Stores `entry` behind every existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolViolation::BufferOverflow`] when the queue is full;
    /// the queue is left unchanged.
    pub fn enqueue(&mut self, entry: T) -> Result<(), ProtocolViolation> {
        if self.is_full() {
            return Err(ProtocolViolation::BufferOverflow {
                occupancy: self.len,
            });
        }
        let tail = (self.head + self.len) % BYPASS_QUEUE_CAPACITY;
        self.slots[tail] = Some(entry);
        self.len += 1;
        Ok(())
    }

    /// Removes the oldest entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolViolation::BufferUnderflow`] when the queue is empty.
    pub fn dequeue(&mut self) -> Result<T, ProtocolViolation> {
        if self.len == 0 {
            return Err(ProtocolViolation::BufferUnderflow);
        }
        let entry = self.slots[self.head]
            .take()
            .ok_or(ProtocolViolation::BufferUnderflow)?;
        self.head = (self.head + 1) % BYPASS_QUEUE_CAPACITY;
        self.len -= 1;
        Ok(entry)
    }

    /// Commits one step: `incoming` from M1 and the consumer's ready signal.
    ///
    /// Both effects are decided from the occupancy at the start of the step.
    /// An incoming entry meets an empty queue and a ready consumer: it is
    /// delivered without being stored. Otherwise a ready consumer takes the
    /// head and the incoming entry lands behind whatever remains.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolViolation::BufferOverflow`] when an entry arrives at
    /// a full queue, even if the consumer is ready; nothing is committed.
    pub fn step(
        &mut self,
        incoming: Option<T>,
        send_ready: bool,
    ) -> Result<QueueStep<T>, ProtocolViolation> {
        if incoming.is_some() && self.is_full() {
            return Err(ProtocolViolation::BufferOverflow {
                occupancy: self.len,
            });
        }

        if self.is_empty() {
            return Ok(match incoming {
                Some(entry) if send_ready => QueueStep {
                    delivered: Some(entry),
                    bypassed: true,
                    enqueued: false,
                },
                Some(entry) => {
                    self.enqueue(entry)?;
                    QueueStep {
                        delivered: None,
                        bypassed: false,
                        enqueued: true,
                    }
                }
                None => QueueStep {
                    delivered: None,
                    bypassed: false,
                    enqueued: false,
                },
            });
        }

        let delivered = if send_ready {
            Some(self.dequeue()?)
        } else {
            None
        };
        let enqueued = match incoming {
            Some(entry) => {
                self.enqueue(entry)?;
                true
            }
            None => false,
        };

        Ok(QueueStep {
            delivered,
            bypassed: false,
            enqueued,
        })
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::{BypassQueue, QueueStep, BYPASS_QUEUE_CAPACITY};
    use crate::ProtocolViolation;

    #[test]
    fn empty_queue_cuts_through_to_a_ready_consumer() {
        let mut queue = BypassQueue::new();
        assert_eq!(queue.peek(Some(7)), Some(7));
        assert_eq!(
            queue.step(Some(7), true),
            Ok(QueueStep {
                delivered: Some(7),
                bypassed: true,
                enqueued: false,
            })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn stalled_consumer_fills_both_slots_in_order() {
        let mut queue = BypassQueue::new();
        assert!(queue.step(Some(1), false).is_ok_and(|s| s.enqueued));
        assert_eq!(queue.occupancy(), 1);
        assert!(queue.step(Some(2), false).is_ok_and(|s| s.enqueued));
        assert!(queue.is_full());
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![1, 2]);

        assert_eq!(queue.peek(None), Some(1));
        assert_eq!(queue.step(None, true).map(|s| s.delivered), Ok(Some(1)));
        assert_eq!(queue.step(None, true).map(|s| s.delivered), Ok(Some(2)));
        assert!(queue.is_empty());
    }

    #[test]
    fn simultaneous_enqueue_and_dequeue_keeps_occupancy() {
        let mut queue = BypassQueue::new();
        queue.enqueue(10).expect("room");
        let step = queue.step(Some(11), true).expect("room");
        assert_eq!(step.delivered, Some(10));
        assert!(step.enqueued);
        assert!(!step.bypassed);
        assert_eq!(queue.occupancy(), 1);
        assert_eq!(queue.head(), Some(&11));
    }

    #[test]
    fn head_is_presented_ahead_of_incoming() {
        let mut queue = BypassQueue::new();
        queue.enqueue(1).expect("room");
        assert_eq!(queue.peek(Some(2)), Some(1));
    }

    #[test]
    fn full_queue_rejects_incoming_even_with_ready_consumer() {
        let mut queue = BypassQueue::new();
        queue.enqueue(1).expect("room");
        queue.enqueue(2).expect("room");
        let before = queue;

        assert_eq!(
            queue.step(Some(3), true),
            Err(ProtocolViolation::BufferOverflow {
                occupancy: BYPASS_QUEUE_CAPACITY
            })
        );
        assert_eq!(queue, before);
        assert_eq!(
            queue.enqueue(3),
            Err(ProtocolViolation::BufferOverflow {
                occupancy: BYPASS_QUEUE_CAPACITY
            })
        );
    }

    #[test]
    fn dequeue_from_empty_underflows() {
        let mut queue = BypassQueue::<u8>::new();
        assert_eq!(queue.dequeue(), Err(ProtocolViolation::BufferUnderflow));
        assert_eq!(
            queue.step(None, true),
            Ok(QueueStep {
                delivered: None,
                bypassed: false,
                enqueued: false,
            })
        );
    }

    #[test]
    fn ring_wraps_without_reordering() {
        let mut queue = BypassQueue::new();
        let mut out = Vec::new();
        for value in 0..10 {
            queue.enqueue(value).expect("room");
            if value % 2 == 1 {
                out.push(queue.dequeue().expect("entry"));
                out.push(queue.dequeue().expect("entry"));
            }
        }
        assert_eq!(out, (0..10).collect::<Vec<_>>());

        queue.enqueue(42).expect("room");
        queue.clear();
        assert!(queue.is_empty());
    }
}
