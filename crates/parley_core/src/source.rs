#![forbid(unsafe_code)]

use std::collections::VecDeque;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::IrcEvent;

/// Result of a non-blocking poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
	Event(IrcEvent),
	/// Nothing pending right now.
	Empty,
	/// Every producer is gone.
	Closed,
}

/// Non-blocking, single-consumer source of events in arrival order.
pub trait EventSource {
	fn try_next(&mut self) -> Next;
}

impl EventSource for mpsc::UnboundedReceiver<IrcEvent> {
	fn try_next(&mut self) -> Next {
		match self.try_recv() {
			Ok(event) => Next::Event(event),
			Err(mpsc::error::TryRecvError::Empty) => Next::Empty,
			Err(mpsc::error::TryRecvError::Disconnected) => Next::Closed,
		}
	}
}

/// A fixed backlog; never reports `Closed`.
impl EventSource for VecDeque<IrcEvent> {
	fn try_next(&mut self) -> Next {
		self.pop_front().map_or(Next::Empty, Next::Event)
	}
}

#[derive(Debug, Error)]
#[error("event queue closed")]
pub struct QueueClosed(pub IrcEvent);

/// Producer half, owned by the connection task.
#[derive(Debug, Clone)]
pub struct EventProducer {
	tx: mpsc::UnboundedSender<IrcEvent>,
}

impl EventProducer {
	pub fn push(&self, event: IrcEvent) -> Result<(), QueueClosed> {
		self.tx.send(event).map_err(|e| QueueClosed(e.0))
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}
}

/// Consumer half, drained by the session.
#[derive(Debug)]
pub struct EventQueue {
	rx: mpsc::UnboundedReceiver<IrcEvent>,
}

impl EventSource for EventQueue {
	fn try_next(&mut self) -> Next {
		self.rx.try_next()
	}
}

pub fn event_queue() -> (EventProducer, EventQueue) {
	let (tx, rx) = mpsc::unbounded_channel();
	(EventProducer { tx }, EventQueue { rx })
}
