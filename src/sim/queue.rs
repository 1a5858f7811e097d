//! Single-threaded command queue with delayed delivery
//!
//! Input handlers, the round timer and delayed follow-ups all post here.
//! Commands come out strictly in arrival order; a delayed command arrives
//! when `advance_to` passes its due time.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Delayed<C> {
    due_ms: f64,
    /// Tie-break so equal due times keep posting order
    seq: u64,
    command: C,
}

#[derive(Debug, Clone)]
pub struct CommandQueue<C> {
    ready: VecDeque<C>,
    delayed: Vec<Delayed<C>>,
    now_ms: f64,
    next_seq: u64,
}

impl<C> Default for CommandQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandQueue<C> {
    pub fn new() -> Self {
        Self {
            ready: VecDeque::new(),
            delayed: Vec::new(),
            now_ms: 0.0,
            next_seq: 0,
        }
    }

    /// Current queue time (last value passed to `advance_to`)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn push(&mut self, command: C) {
        self.ready.push_back(command);
    }

    /// Deliver `command` once the clock is `delay_ms` past now
    pub fn push_after(&mut self, delay_ms: f64, command: C) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.delayed.push(Delayed {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            command,
        });
    }

    /// Move time forward and release due commands, oldest first.
    /// Time never goes backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        if self.delayed.iter().all(|d| d.due_ms > self.now_ms) {
            return;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|d| d.due_ms <= self.now_ms);
        self.delayed = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        self.ready.extend(due.into_iter().map(|d| d.command));
    }

    pub fn pop(&mut self) -> Option<C> {
        self.ready.pop_front()
    }

    pub fn is_idle(&self) -> bool {
        self.ready.is_empty() && self.delayed.is_empty()
    }

    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_commands_keep_order() {
        let mut q = CommandQueue::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_delayed_released_when_due() {
        let mut q = CommandQueue::new();
        q.advance_to(1000.0);
        q.push_after(300.0, "late");
        q.push_after(100.0, "early");
        q.push_after(100.0, "early-second");

        q.advance_to(1099.0);
        assert_eq!(q.pop(), None);

        q.advance_to(1100.0);
        assert_eq!(q.pop(), Some("early"));
        assert_eq!(q.pop(), Some("early-second"));
        assert_eq!(q.pop(), None);
        assert_eq!(q.delayed_len(), 1);

        q.advance_to(5000.0);
        assert_eq!(q.pop(), Some("late"));
        assert!(q.is_idle());
    }

    #[test]
    fn test_time_is_monotonic() {
        let mut q: CommandQueue<u8> = CommandQueue::new();
        q.advance_to(500.0);
        q.advance_to(100.0);
        assert_eq!(q.now_ms(), 500.0);
    }

    #[test]
    fn test_released_after_already_queued_input() {
        let mut q = CommandQueue::new();
        q.push_after(10.0, 'd');
        q.push('a');
        q.advance_to(20.0);
        assert_eq!(q.pop(), Some('a'));
        assert_eq!(q.pop(), Some('d'));
    }
}
