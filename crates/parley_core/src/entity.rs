#![forbid(unsafe_code)]

use core::fmt;

use chrono::{DateTime, Local};
use parley_domain::{EntityKey, MessageId, Nick};

use crate::members::MemberList;

/// Directory-assigned identity of an entity. Survives renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "entity-{}", self.0)
	}
}

/// Who a history line is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
	/// Client-generated notice (joins, parts, nick changes).
	System,
	User(Nick),
	/// Server name or raw message prefix.
	Server(String),
}

impl fmt::Display for Author {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Author::System => f.write_str("*"),
			Author::User(nick) => write!(f, "{nick}"),
			Author::Server(source) => f.write_str(source),
		}
	}
}

/// One line of conversation history.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
	pub id: MessageId,
	pub at: DateTime<Local>,
	pub author: Author,
	pub text: String,
}

impl HistoryRecord {
	pub fn new(author: Author, text: impl Into<String>) -> Self {
		Self {
			id: MessageId::new_v4(),
			at: Local::now(),
			author,
			text: text.into(),
		}
	}

	/// `[HH:MM]   <sender> | text`, sender right-aligned.
	pub fn render(&self) -> String {
		format!(
			"[{}] {:>25} | {}",
			self.at.format("%H:%M"),
			format!("<{}>", self.author),
			self.text
		)
	}
}

/// A server pane, joined channel, or private conversation.
#[derive(Debug)]
pub struct Entity {
	id: EntityId,
	key: EntityKey,
	members: Option<MemberList>,
	history: Vec<HistoryRecord>,
	peer_departed: bool,
}

impl Entity {
	pub(crate) fn new(id: EntityId, key: EntityKey, members: Option<MemberList>) -> Self {
		Self {
			id,
			key,
			members,
			history: Vec::new(),
			peer_departed: false,
		}
	}

	pub fn id(&self) -> EntityId {
		self.id
	}

	pub fn key(&self) -> &EntityKey {
		&self.key
	}

	pub(crate) fn set_key(&mut self, key: EntityKey) {
		self.key = key;
	}

	pub fn is_server(&self) -> bool {
		self.key.is_server()
	}

	pub fn is_channel(&self) -> bool {
		self.members.is_some()
	}

	/// True for a private conversation with exactly `nick`.
	pub fn is_private_with(&self, nick: &Nick) -> bool {
		matches!(&self.key, EntityKey::Private(peer) if peer == nick)
	}

	pub fn members(&self) -> Option<&MemberList> {
		self.members.as_ref()
	}

	pub(crate) fn members_mut(&mut self) -> Option<&mut MemberList> {
		self.members.as_mut()
	}

	/// True if this is a channel listing `nick`.
	pub fn has_member(&self, nick: &Nick) -> bool {
		self.members.as_ref().is_some_and(|m| m.contains(nick))
	}

	pub fn history(&self) -> &[HistoryRecord] {
		&self.history
	}

	pub fn last_message(&self) -> Option<&HistoryRecord> {
		self.history.last()
	}

	pub(crate) fn push(&mut self, author: Author, text: impl Into<String>) {
		self.history.push(HistoryRecord::new(author, text));
	}

	/// Private conversations only: the peer quit and has not been seen since.
	pub fn peer_departed(&self) -> bool {
		self.peer_departed
	}

	pub(crate) fn set_peer_departed(&mut self, departed: bool) {
		self.peer_departed = departed;
	}
}
