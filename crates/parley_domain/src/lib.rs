#![forbid(unsafe_code)]

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Characters that mark a name as a channel.
pub const CHANNEL_MARKERS: [char; 2] = ['#', '&'];

/// Errors for parsing names from strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseNameError {
	#[error("empty value")]
	Empty,
	#[error("invalid character {ch:?} in {value:?}")]
	InvalidChar { value: String, ch: char },
	#[error("not a channel name (expected a leading # or &): {0}")]
	MissingChannelMarker(String),
	#[error("nick must not start with a channel marker: {0}")]
	NickLooksLikeChannel(String),
}

fn check_chars(s: &str) -> Result<(), ParseNameError> {
	match s.chars().find(|c| c.is_whitespace() || *c == ',' || *c == '\u{7}') {
		Some(ch) => Err(ParseNameError::InvalidChar {
			value: s.to_string(),
			ch,
		}),
		None => Ok(()),
	}
}

/// Case-insensitive ordering used for member lists.
///
/// Falls back to byte order when two names only differ by case, so the
/// ordering stays total and agrees with `Eq`.
pub fn casefold_cmp(a: &str, b: &str) -> Ordering {
	let folded = a
		.chars()
		.flat_map(char::to_lowercase)
		.cmp(b.chars().flat_map(char::to_lowercase));
	folded.then_with(|| a.cmp(b))
}

/// True if `s` starts with one of `CHANNEL_MARKERS`.
pub fn is_channel_name(s: &str) -> bool {
	s.starts_with(CHANNEL_MARKERS)
}

/// A user's nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nick(SmolStr);

impl Nick {
	/// Create a validated `Nick`.
	pub fn new(nick: impl AsRef<str>) -> Result<Self, ParseNameError> {
		let nick = nick.as_ref();
		if nick.is_empty() {
			return Err(ParseNameError::Empty);
		}
		check_chars(nick)?;
		if is_channel_name(nick) {
			return Err(ParseNameError::NickLooksLikeChannel(nick.to_string()));
		}
		Ok(Self(SmolStr::new(nick)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Compare with another nick ignoring case.
	pub fn casefold_cmp(&self, other: &Nick) -> Ordering {
		casefold_cmp(self.as_str(), other.as_str())
	}
}

impl fmt::Display for Nick {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for Nick {
	type Err = ParseNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Nick::new(s)
	}
}

impl TryFrom<String> for Nick {
	type Error = ParseNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Nick::new(value)
	}
}

impl From<Nick> for String {
	fn from(value: Nick) -> Self {
		value.0.into()
	}
}

/// A channel name including its marker (e.g. `#rust`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(SmolStr);

impl ChannelName {
	/// Create a validated `ChannelName`.
	pub fn new(name: impl AsRef<str>) -> Result<Self, ParseNameError> {
		let name = name.as_ref();
		if name.is_empty() {
			return Err(ParseNameError::Empty);
		}
		if !is_channel_name(name) || name.chars().count() < 2 {
			return Err(ParseNameError::MissingChannelMarker(name.to_string()));
		}
		check_chars(name)?;
		Ok(Self(SmolStr::new(name)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ChannelName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ChannelName {
	type Err = ParseNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ChannelName::new(s)
	}
}

impl TryFrom<String> for ChannelName {
	type Error = ParseNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		ChannelName::new(value)
	}
}

impl From<ChannelName> for String {
	fn from(value: ChannelName) -> Self {
		value.0.into()
	}
}

/// Recipient of a private message: a channel or a single nick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
	Channel(ChannelName),
	Nick(Nick),
}

impl Target {
	/// Parse by looking at the leading character.
	pub fn parse(s: &str) -> Result<Self, ParseNameError> {
		if is_channel_name(s) {
			ChannelName::new(s).map(Target::Channel)
		} else {
			Nick::new(s).map(Target::Nick)
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Target::Channel(c) => c.as_str(),
			Target::Nick(n) => n.as_str(),
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Target {
	type Err = ParseNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Target::parse(s)
	}
}

impl TryFrom<String> for Target {
	type Error = ParseNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Target::parse(&value)
	}
}

impl From<Target> for String {
	fn from(value: Target) -> Self {
		match value {
			Target::Channel(c) => c.into(),
			Target::Nick(n) => n.into(),
		}
	}
}

impl From<ChannelName> for Target {
	fn from(value: ChannelName) -> Self {
		Target::Channel(value)
	}
}

impl From<Nick> for Target {
	fn from(value: Nick) -> Self {
		Target::Nick(value)
	}
}

/// Unique name of a conversation pane.
///
/// `Server` is the sentinel for the single server pane. Channel and nick
/// namespaces never overlap, so distinct keys are distinct names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
	Server,
	Channel(ChannelName),
	Private(Nick),
}

impl EntityKey {
	pub fn is_server(&self) -> bool {
		matches!(self, EntityKey::Server)
	}

	pub fn is_channel(&self) -> bool {
		matches!(self, EntityKey::Channel(_))
	}

	/// The conversation name, `None` for the server pane.
	pub fn name(&self) -> Option<&str> {
		match self {
			EntityKey::Server => None,
			EntityKey::Channel(c) => Some(c.as_str()),
			EntityKey::Private(n) => Some(n.as_str()),
		}
	}

	/// The message target this pane talks to, if any.
	pub fn target(&self) -> Option<Target> {
		match self {
			EntityKey::Server => None,
			EntityKey::Channel(c) => Some(Target::Channel(c.clone())),
			EntityKey::Private(n) => Some(Target::Nick(n.clone())),
		}
	}
}

impl fmt::Display for EntityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntityKey::Server => f.write_str("<server>"),
			EntityKey::Channel(c) => write!(f, "{c}"),
			EntityKey::Private(n) => write!(f, "{n}"),
		}
	}
}

impl From<Target> for EntityKey {
	fn from(value: Target) -> Self {
		match value {
			Target::Channel(c) => EntityKey::Channel(c),
			Target::Nick(n) => EntityKey::Private(n),
		}
	}
}

impl From<ChannelName> for EntityKey {
	fn from(value: ChannelName) -> Self {
		EntityKey::Channel(value)
	}
}

impl From<Nick> for EntityKey {
	fn from(value: Nick) -> Self {
		EntityKey::Private(value)
	}
}

/// Identifier attached to every history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub uuid::Uuid);

impl MessageId {
	/// Create a new random message id.
	pub fn new_v4() -> Self {
		Self(uuid::Uuid::new_v4())
	}
}

impl fmt::Display for MessageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nick_parse_and_display() {
		let n: Nick = "alice".parse().unwrap();
		assert_eq!(n.as_str(), "alice");
		assert_eq!(n.to_string(), "alice");
	}

	#[test]
	fn rejects_bad_nicks() {
		assert_eq!(Nick::new(""), Err(ParseNameError::Empty));
		assert!(matches!(Nick::new("#nope"), Err(ParseNameError::NickLooksLikeChannel(_))));
		assert!(matches!(Nick::new("two words"), Err(ParseNameError::InvalidChar { ch: ' ', .. })));
		assert!(Nick::new("a,b").is_err());
	}

	#[test]
	fn channel_requires_marker() {
		assert!(ChannelName::new("#rust").is_ok());
		assert!(ChannelName::new("&local").is_ok());
		assert!(matches!(ChannelName::new("rust"), Err(ParseNameError::MissingChannelMarker(_))));
		assert!(ChannelName::new("#").is_err());
		assert!(ChannelName::new("#a b").is_err());
	}

	#[test]
	fn target_picks_kind_from_prefix() {
		assert_eq!(Target::parse("#test").unwrap(), Target::Channel(ChannelName::new("#test").unwrap()));
		assert_eq!(Target::parse("dave").unwrap(), Target::Nick(Nick::new("dave").unwrap()));
		assert_eq!(
			EntityKey::from(Target::parse("dave").unwrap()),
			EntityKey::Private(Nick::new("dave").unwrap())
		);
	}

	#[test]
	fn casefold_ordering_is_case_insensitive_and_total() {
		assert_eq!(casefold_cmp("Bob", "alice"), Ordering::Greater);
		assert_eq!(casefold_cmp("alice", "Bob"), Ordering::Less);
		assert_eq!(casefold_cmp("bob", "bob"), Ordering::Equal);
		assert_ne!(casefold_cmp("Bob", "bob"), Ordering::Equal);
	}

	#[test]
	fn server_key_has_no_name() {
		assert_eq!(EntityKey::Server.name(), None);
		assert!(EntityKey::Server.target().is_none());
		let ch = EntityKey::Channel(ChannelName::new("#x").unwrap());
		assert_eq!(ch.name(), Some("#x"));
		assert!(ch.is_channel());
	}

	#[test]
	fn serde_rejects_invalid_names() {
		let ok: Nick = serde_json::from_str("\"carol\"").unwrap();
		assert_eq!(ok.as_str(), "carol");
		assert!(serde_json::from_str::<ChannelName>("\"nochan\"").is_err());
		assert_eq!(serde_json::to_string(&ok).unwrap(), "\"carol\"");
	}
}
