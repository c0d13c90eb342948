#![forbid(unsafe_code)]

use parley_domain::{ChannelName, Nick, Target};
use serde::{Deserialize, Serialize};

/// Typed IRC event produced by the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IrcEvent {
	SelfJoined {
		channel: ChannelName,
		#[serde(default)]
		members: Vec<Nick>,
	},
	SelfChangedNick {
		old: Nick,
		new: Nick,
	},
	SelfParted {
		channel: ChannelName,
	},
	SelfQuit,
	UserJoined {
		nick: Nick,
		channel: ChannelName,
	},
	UserChangedNick {
		old: Nick,
		new: Nick,
	},
	UserParted {
		nick: Nick,
		channel: ChannelName,
		#[serde(default)]
		reason: Option<String>,
	},
	UserQuit {
		nick: Nick,
		#[serde(default)]
		reason: Option<String>,
	},
	SentPrivmsg {
		recipient: Target,
		text: String,
	},
	ReceivedPrivmsg {
		sender: Nick,
		recipient: Target,
		text: String,
	},
	ServerMessage {
		source: String,
		command: String,
		#[serde(default)]
		args: Vec<String>,
	},
	UnknownMessage {
		source: String,
		command: String,
		#[serde(default)]
		args: Vec<String>,
	},
}

impl IrcEvent {
	/// Stable tag used in logs and scripts.
	pub const fn kind(&self) -> &'static str {
		match self {
			IrcEvent::SelfJoined { .. } => "self_joined",
			IrcEvent::SelfChangedNick { .. } => "self_changed_nick",
			IrcEvent::SelfParted { .. } => "self_parted",
			IrcEvent::SelfQuit => "self_quit",
			IrcEvent::UserJoined { .. } => "user_joined",
			IrcEvent::UserChangedNick { .. } => "user_changed_nick",
			IrcEvent::UserParted { .. } => "user_parted",
			IrcEvent::UserQuit { .. } => "user_quit",
			IrcEvent::SentPrivmsg { .. } => "sent_privmsg",
			IrcEvent::ReceivedPrivmsg { .. } => "received_privmsg",
			IrcEvent::ServerMessage { .. } => "server_message",
			IrcEvent::UnknownMessage { .. } => "unknown_message",
		}
	}
}
