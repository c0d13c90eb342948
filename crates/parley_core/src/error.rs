#![forbid(unsafe_code)]

use parley_domain::{ChannelName, Nick};
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::members::MemberError;

/// Errors raised while applying an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
	#[error(transparent)]
	Directory(#[from] DirectoryError),

	#[error("{channel}: {source}")]
	Member {
		channel: ChannelName,
		#[source]
		source: MemberError,
	},

	/// A quit arrived for a nick no conversation knows about.
	#[error("{0} is not present in any conversation")]
	NotPresent(Nick),

	/// A private message addressed to a nick that is not ours.
	#[error("private message for {recipient}, but we are {local}")]
	Misaddressed { recipient: Nick, local: Nick },

	/// Producer and consumer disagree on the event contract.
	#[error("invariant violated: {0}")]
	InvariantViolation(String),
}

impl ReconcileError {
	/// Desync conditions: log and keep draining.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			ReconcileError::Directory(DirectoryError::NotFound(_))
				| ReconcileError::Member { .. }
				| ReconcileError::NotPresent(_)
				| ReconcileError::Misaddressed { .. }
		)
	}
}

/// Errors for user command execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
	/// `part` without a channel while the active pane is not a channel.
	#[error("the active conversation is not a channel")]
	NoChannel,

	/// The outbound request channel is gone.
	#[error("not connected")]
	Disconnected,
}
