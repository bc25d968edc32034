//! Component mailbox: a bounded multi-producer, single-consumer FIFO.
//!
//! Producers post from any thread or component; the owning component drains
//! the queue from its scheduler tick.  Every kind of message a component
//! accepts goes through the same queue, so arrival order is preserved across
//! kinds.
//!
//! ```text
//! ┌─────────────┐
//! │ Router      │────▶┌──────────────────┐     ┌──────────────┐
//! │ Param store │────▶│ Mailbox (FIFO,   │────▶│  sched_in()  │
//! │ Cmd dispatch│────▶│ critical-section)│     │  (consumer)  │
//! └─────────────┘     └──────────────────┘     └──────────────┘
//! ```
//!
//! Sequence numbers are assigned under the same lock that appends the
//! message, so sequence order always equals queue order.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Deque;
use log::error;

/// A queued message stamped with its arrival sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub seq: u32,
    pub msg: T,
}

/// Returned by [`Mailbox::try_post`] when the queue is at capacity.
/// Carries the rejected message back to the producer.
pub struct MailboxFull<T>(pub T);

impl<T> fmt::Debug for MailboxFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MailboxFull(..)")
    }
}

impl<T> fmt::Display for MailboxFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mailbox full")
    }
}

struct Inner<T, const N: usize> {
    queue: Deque<Envelope<T>, N>,
    next_seq: u32,
}

/// Fixed-capacity FIFO shared between producers and one consumer.
pub struct Mailbox<T, const N: usize> {
    name: &'static str,
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<T, N>>>,
}

impl<T, const N: usize> Mailbox<T, N> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(RefCell::new(Inner {
                queue: Deque::new(),
                next_seq: 0,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Enqueue a message, returning its sequence number.
    ///
    /// A full mailbox means the component was sized wrong for its
    /// producers; this is fatal.  Use [`try_post`](Self::try_post) where a
    /// full queue must be survivable.
    pub fn post(&self, msg: T) -> u32 {
        match self.try_post(msg) {
            Ok(seq) => seq,
            Err(_) => {
                error!("Mailbox '{}' overflow (capacity {})", self.name, N);
                panic!("mailbox '{}' full (capacity {})", self.name, N);
            }
        }
    }

    /// Enqueue a message without aborting on overflow.
    pub fn try_post(&self, msg: T) -> Result<u32, MailboxFull<T>> {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let seq = inner.next_seq;
            match inner.queue.push_back(Envelope { seq, msg }) {
                Ok(()) => {
                    inner.next_seq = seq.wrapping_add(1);
                    Ok(seq)
                }
                Err(rejected) => Err(MailboxFull(rejected.msg)),
            }
        })
    }

    /// Dequeue the oldest message.
    pub fn pop(&self) -> Option<Envelope<T>> {
        self.inner.lock(|cell| cell.borrow_mut().queue.pop_front())
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatch every message queued at the time of the call, oldest first.
    ///
    /// The lock is released while `handler` runs, so handlers may post to
    /// any mailbox.  Messages posted after the call started wait for the
    /// next drain.  Returns the number of messages dispatched.
    pub fn drain(&self, mut handler: impl FnMut(Envelope<T>)) -> usize {
        let available = self.len();
        let mut dispatched = 0;
        for _ in 0..available {
            let Some(envelope) = self.pop() else {
                break;
            };
            handler(envelope);
            dispatched += 1;
        }
        dispatched
    }
}
