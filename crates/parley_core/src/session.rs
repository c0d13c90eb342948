#![forbid(unsafe_code)]

use std::time::Duration;

use parley_domain::{EntityKey, Nick};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::command::{self, RequestSink, UserCommand};
use crate::directory::{DirectoryError, EntityDirectory};
use crate::error::{CommandError, ReconcileError};
use crate::event::IrcEvent;
use crate::reconciler::{EventReconciler, Flow};
use crate::source::{EventSource, Next};
use crate::view::ViewSink;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct SessionOptions {
	pub nick: Nick,
	/// Title for the server pane, e.g. `Server: irc.libera.chat`.
	pub server_label: String,
}

/// Why a drain pass stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
	/// Source is empty for now.
	Idle,
	Quit,
	Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
	Quit,
	Disconnected,
}

/// One connection's worth of conversations.
#[derive(Debug)]
pub struct Session {
	directory: EntityDirectory,
	reconciler: EventReconciler,
	server_label: String,
}

impl Session {
	pub fn new(opts: SessionOptions) -> Self {
		info!(nick = %opts.nick, server = %opts.server_label, "session created");
		Self {
			directory: EntityDirectory::new(),
			reconciler: EventReconciler::new(opts.nick),
			server_label: opts.server_label,
		}
	}

	pub fn directory(&self) -> &EntityDirectory {
		&self.directory
	}

	pub fn nick(&self) -> &Nick {
		self.reconciler.nick()
	}

	pub fn server_label(&self) -> &str {
		&self.server_label
	}

	pub fn apply(&mut self, event: IrcEvent, view: &mut dyn ViewSink) -> Result<Flow, ReconcileError> {
		self.reconciler.apply(&mut self.directory, view, event)
	}

	/// User focus change.
	pub fn select(&mut self, key: &EntityKey, view: &mut dyn ViewSink) -> Result<(), DirectoryError> {
		let (entity, changed) = self.directory.select_by_name(key)?;
		if changed {
			view.active_changed(entity);
		}
		Ok(())
	}

	/// Apply everything currently pending, in order.
	///
	/// Recoverable errors are logged and the event is dropped. Anything else
	/// stops the pass and is returned.
	pub fn drain(&mut self, source: &mut dyn EventSource, view: &mut dyn ViewSink) -> Result<DrainOutcome, ReconcileError> {
		let mut applied = 0usize;
		let outcome = loop {
			let event = match source.try_next() {
				Next::Event(event) => event,
				Next::Empty => break DrainOutcome::Idle,
				Next::Closed => break DrainOutcome::Disconnected,
			};

			let kind = event.kind();
			match self.apply(event, view) {
				Ok(Flow::Continue) => applied += 1,
				Ok(Flow::Quit) => break DrainOutcome::Quit,
				Err(e) if e.is_recoverable() => {
					warn!(event = kind, error = %e, "event skipped");
				}
				Err(e) => {
					error!(event = kind, error = %e, "event could not be applied");
					return Err(e);
				}
			}
		};

		if applied > 0 {
			debug!(applied, ?outcome, "drained events");
		}
		Ok(outcome)
	}

	pub fn execute(
		&mut self,
		command: UserCommand,
		requests: &mut dyn RequestSink,
		view: &mut dyn ViewSink,
	) -> Result<(), CommandError> {
		command::execute(&mut self.directory, self.reconciler.nick(), view, requests, command)
	}

	/// Tear down every entity, server pane included, notifying the view.
	///
	/// Leaves the session as freshly built. Returns how many were released.
	pub fn release(&mut self, view: &mut dyn ViewSink) -> usize {
		let directory = std::mem::take(&mut self.directory);
		let entities = directory.into_entities();
		for entity in &entities {
			view.entity_removed(entity);
		}
		info!(released = entities.len(), "session released");
		entities.len()
	}

	/// Drain `source` on every tick until quit, disconnect, or a fatal error.
	pub async fn run<S, V>(&mut self, mut source: S, view: &mut V, poll_interval: Duration) -> Result<SessionEnd, ReconcileError>
	where
		S: EventSource,
		V: ViewSink,
	{
		let mut ticker = tokio::time::interval(poll_interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			ticker.tick().await;

			let end = match self.drain(&mut source, view) {
				Ok(DrainOutcome::Idle) => continue,
				Ok(DrainOutcome::Quit) => SessionEnd::Quit,
				Ok(DrainOutcome::Disconnected) => {
					warn!("event source closed");
					SessionEnd::Disconnected
				}
				Err(e) => {
					error!(error = %e, "session halted");
					return Err(e);
				}
			};

			self.release(view);
			return Ok(end);
		}
	}
}
