#![forbid(unsafe_code)]

use parley_domain::{ChannelName, EntityKey, Nick, Target};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::directory::EntityDirectory;
use crate::entity::Author;
use crate::error::CommandError;
use crate::view::ViewSink;

/// Something the user typed, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
	Join {
		channel: ChannelName,
	},
	/// `None` parts the active channel.
	Part {
		channel: Option<ChannelName>,
		reason: Option<String>,
	},
	Nick {
		nick: Nick,
	},
	/// `None` sends to the active conversation.
	Privmsg {
		target: Option<Target>,
		text: String,
	},
	Quit {
		reason: Option<String>,
	},
}

/// Outbound request for the connection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
	Join { channel: ChannelName },
	Part { channel: ChannelName, reason: Option<String> },
	Nick { nick: Nick },
	Privmsg { target: Target, text: String },
	Quit { reason: Option<String> },
}

/// Where outbound requests go.
pub trait RequestSink {
	fn send(&mut self, request: Request) -> Result<(), CommandError>;
}

impl RequestSink for Vec<Request> {
	fn send(&mut self, request: Request) -> Result<(), CommandError> {
		self.push(request);
		Ok(())
	}
}

impl RequestSink for mpsc::UnboundedSender<Request> {
	fn send(&mut self, request: Request) -> Result<(), CommandError> {
		mpsc::UnboundedSender::send(self, request).map_err(|_| CommandError::Disconnected)
	}
}

/// Resolve `command` against the directory and emit requests.
///
/// Entities are only touched for the server-pane notice; everything else
/// changes when the server echoes the request back as an event.
pub(crate) fn execute(
	dir: &mut EntityDirectory,
	nick: &Nick,
	view: &mut dyn ViewSink,
	requests: &mut dyn RequestSink,
	command: UserCommand,
) -> Result<(), CommandError> {
	debug!(?command, "executing command");

	match command {
		UserCommand::Join { channel } => requests.send(Request::Join { channel }),
		UserCommand::Part { channel, reason } => {
			let channel = match channel {
				Some(channel) => channel,
				None => match dir.active().key() {
					EntityKey::Channel(channel) => channel.clone(),
					_ => return Err(CommandError::NoChannel),
				},
			};
			requests.send(Request::Part { channel, reason })
		}
		UserCommand::Nick { nick: new } => {
			if &new == nick {
				return Ok(());
			}
			requests.send(Request::Nick { nick: new })
		}
		UserCommand::Privmsg { target, text } => {
			let target = match target.or_else(|| dir.active().key().target()) {
				Some(target) => target,
				None => {
					let server = dir.server_id();
					if let Some(entity) = dir.get_mut(server) {
						entity.push(Author::System, "Cannot send messages here.");
						let entity = &*entity;
						if let Some(record) = entity.last_message() {
							view.message_appended(entity, record);
						}
					}
					return Ok(());
				}
			};
			requests.send(Request::Privmsg { target, text })
		}
		UserCommand::Quit { reason } => {
			let channels: Vec<ChannelName> = dir
				.all()
				.filter_map(|e| match e.key() {
					EntityKey::Channel(c) => Some(c.clone()),
					_ => None,
				})
				.collect();
			info!(channels = channels.len(), "parting all channels and quitting");
			for channel in channels {
				requests.send(Request::Part { channel, reason: None })?;
			}
			requests.send(Request::Quit { reason })
		}
	}
}
