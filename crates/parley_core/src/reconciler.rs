#![forbid(unsafe_code)]

use parley_domain::{ChannelName, EntityKey, Nick, Target};
use tracing::{debug, info, warn};

use crate::directory::{DirectoryError, EntityDirectory, Removed};
use crate::entity::{Author, Entity, EntityId};
use crate::error::ReconcileError;
use crate::event::IrcEvent;
use crate::members::MemberList;
use crate::view::ViewSink;

/// What the owner should do after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	/// `self_quit` was applied; stop draining.
	Quit,
}

/// Applies IRC events to the entity directory.
///
/// Holds no entity state; the only thing tracked here is the local nick,
/// needed to tell private messages apart from channel traffic.
#[derive(Debug, Clone)]
pub struct EventReconciler {
	nick: Nick,
}

impl EventReconciler {
	pub fn new(nick: Nick) -> Self {
		Self { nick }
	}

	pub fn nick(&self) -> &Nick {
		&self.nick
	}

	/// Apply one event. Must not be called re-entrantly.
	pub fn apply(
		&mut self,
		dir: &mut EntityDirectory,
		view: &mut dyn ViewSink,
		event: IrcEvent,
	) -> Result<Flow, ReconcileError> {
		debug!(kind = event.kind(), "applying event");

		match event {
			IrcEvent::SelfJoined { channel, members } => {
				let id = dir.create(EntityKey::Channel(channel), Some(MemberList::new(members)))?;
				emit_created(dir, view, id)?;
			}
			IrcEvent::SelfChangedNick { old, new } => self.self_changed_nick(dir, view, old, new)?,
			IrcEvent::SelfParted { channel } => {
				let removed = dir.remove(&EntityKey::Channel(channel))?;
				emit_removed(dir, view, &removed);
			}
			IrcEvent::SelfQuit => {
				info!(nick = %self.nick, "session quit");
				return Ok(Flow::Quit);
			}
			IrcEvent::UserJoined { nick, channel } => user_joined(dir, view, nick, channel)?,
			IrcEvent::UserChangedNick { old, new } => user_changed_nick(dir, view, old, new)?,
			IrcEvent::UserParted { nick, channel, reason } => user_parted(dir, view, nick, channel, reason)?,
			IrcEvent::UserQuit { nick, reason } => user_quit(dir, view, nick, reason)?,
			IrcEvent::SentPrivmsg { recipient, text } => {
				let key = EntityKey::from(recipient);
				let id = match dir.id_of(&key) {
					Some(id) => id,
					None if key.is_channel() => return Err(DirectoryError::NotFound(key).into()),
					None => {
						let id = dir.create(key, None)?;
						emit_created(dir, view, id)?;
						id
					}
				};
				let entity = entity_mut(dir, id)?;
				append(view, entity, Author::User(self.nick.clone()), text);
			}
			IrcEvent::ReceivedPrivmsg {
				sender,
				recipient,
				text,
			} => {
				let key = match recipient {
					Target::Nick(nick) if nick == self.nick => EntityKey::Private(sender.clone()),
					Target::Nick(nick) => {
						return Err(ReconcileError::Misaddressed {
							recipient: nick,
							local: self.nick.clone(),
						});
					}
					Target::Channel(channel) => EntityKey::Channel(channel),
				};
				let id = match dir.id_of(&key) {
					Some(id) => id,
					None if key.is_channel() => return Err(DirectoryError::NotFound(key).into()),
					None => {
						let id = dir.create(key, None)?;
						emit_created(dir, view, id)?;
						id
					}
				};
				let entity = entity_mut(dir, id)?;
				if entity.is_private_with(&sender) {
					entity.set_peer_departed(false);
				}
				append(view, entity, Author::User(sender), text);
			}
			IrcEvent::ServerMessage { source, command, args } | IrcEvent::UnknownMessage { source, command, args } => {
				debug!(%source, %command, "server line");
				let server = dir.server_id();
				let entity = entity_mut(dir, server)?;
				append(view, entity, Author::Server(source), args.join(" "));
			}
		}

		Ok(Flow::Continue)
	}

	fn self_changed_nick(
		&mut self,
		dir: &mut EntityDirectory,
		view: &mut dyn ViewSink,
		old: Nick,
		new: Nick,
	) -> Result<(), ReconcileError> {
		if old != self.nick {
			warn!(tracked = %self.nick, %old, %new, "own nick change does not match tracked nick");
		}
		info!(%old, %new, "own nick changed");
		self.nick = new.clone();

		let mut first_err = None;
		for id in dir.ids() {
			let entity = entity_mut(dir, id)?;
			if let Err(e) = rename_member(view, entity, &old, &new) {
				record(&mut first_err, e);
			}
			// every pane, server included
			append(view, entity, Author::System, format!("You are now known as {new}."));
		}

		first_err.map_or(Ok(()), Err)
	}
}

fn entity_mut(dir: &mut EntityDirectory, id: EntityId) -> Result<&mut Entity, ReconcileError> {
	dir.get_mut(id)
		.ok_or_else(|| ReconcileError::InvariantViolation(format!("{id} is listed but not stored")))
}

fn channel_members<'a>(entity: &'a mut Entity, channel: &ChannelName) -> Result<&'a mut MemberList, ReconcileError> {
	entity
		.members_mut()
		.ok_or_else(|| ReconcileError::InvariantViolation(format!("{channel} has no member list")))
}

fn record(slot: &mut Option<ReconcileError>, err: ReconcileError) {
	warn!(error = %err, "state out of sync");
	if slot.is_none() {
		*slot = Some(err);
	}
}

fn append(view: &mut dyn ViewSink, entity: &mut Entity, author: Author, text: impl Into<String>) {
	entity.push(author, text);
	let entity = &*entity;
	if let Some(record) = entity.last_message() {
		view.message_appended(entity, record);
	}
}

fn emit_created(dir: &EntityDirectory, view: &mut dyn ViewSink, id: EntityId) -> Result<(), ReconcileError> {
	let entity = dir
		.get(id)
		.ok_or_else(|| ReconcileError::InvariantViolation(format!("{id} vanished after create")))?;
	view.entity_created(entity);
	view.active_changed(entity);
	Ok(())
}

fn emit_removed(dir: &EntityDirectory, view: &mut dyn ViewSink, removed: &Removed) {
	if let Some(id) = removed.new_active
		&& let Some(active) = dir.get(id)
	{
		view.active_changed(active);
	}
	view.entity_removed(&removed.entity);
}

/// Swap `old` for `new` in a channel's member list. No-op elsewhere.
fn rename_member(view: &mut dyn ViewSink, entity: &mut Entity, old: &Nick, new: &Nick) -> Result<bool, ReconcileError> {
	let channel = match entity.key() {
		EntityKey::Channel(c) => c.clone(),
		_ => return Ok(false),
	};
	let members = channel_members(entity, &channel)?;
	if !members.contains(old) {
		return Ok(false);
	}
	let (from, to) = members
		.rename(old, new.clone())
		.map_err(|source| ReconcileError::Member { channel, source })?;
	view.member_renamed(entity, old, new, from, to);
	Ok(true)
}

fn user_joined(
	dir: &mut EntityDirectory,
	view: &mut dyn ViewSink,
	nick: Nick,
	channel: ChannelName,
) -> Result<(), ReconcileError> {
	let entity = dir.get_mut_by_name(&EntityKey::Channel(channel.clone()))?;
	let index = channel_members(entity, &channel)?
		.insert(nick.clone())
		.map_err(|source| ReconcileError::Member {
			channel: channel.clone(),
			source,
		})?;
	view.member_added(entity, &nick, index);
	append(view, entity, Author::System, format!("{nick} joined {channel}."));

	if let Some(id) = dir.id_of(&EntityKey::Private(nick))
		&& let Some(pm) = dir.get_mut(id)
	{
		pm.set_peer_departed(false);
	}
	Ok(())
}

fn user_changed_nick(
	dir: &mut EntityDirectory,
	view: &mut dyn ViewSink,
	old: Nick,
	new: Nick,
) -> Result<(), ReconcileError> {
	let mut renamed_pm = None;
	let pm_key = EntityKey::Private(old.clone());
	if dir.contains(&pm_key) {
		let renamed = dir.rename(&pm_key, EntityKey::Private(new.clone()))?;
		if let Some(evicted) = &renamed.evicted {
			emit_removed(dir, view, evicted);
		}
		let entity = entity_mut(dir, renamed.id)?;
		view.entity_renamed(entity, &renamed.old);
		renamed_pm = Some(renamed.id);
	}

	// someone is online under `new` now
	if let Some(id) = dir.id_of(&EntityKey::Private(new.clone()))
		&& let Some(pm) = dir.get_mut(id)
	{
		pm.set_peer_departed(false);
	}

	let text = format!("{old} is now known as {new}.");
	let mut first_err = None;
	for id in dir.ids() {
		let entity = entity_mut(dir, id)?;
		let affected = if entity.is_channel() {
			match rename_member(view, entity, &old, &new) {
				Ok(affected) => affected,
				Err(e) => {
					record(&mut first_err, e);
					false
				}
			}
		} else {
			renamed_pm == Some(id)
		};

		if affected {
			append(view, entity, Author::System, text.clone());
		}
	}

	first_err.map_or(Ok(()), Err)
}

fn user_parted(
	dir: &mut EntityDirectory,
	view: &mut dyn ViewSink,
	nick: Nick,
	channel: ChannelName,
	reason: Option<String>,
) -> Result<(), ReconcileError> {
	let entity = dir.get_mut_by_name(&EntityKey::Channel(channel.clone()))?;
	let index = channel_members(entity, &channel)?
		.remove(&nick)
		.map_err(|source| ReconcileError::Member {
			channel: channel.clone(),
			source,
		})?;
	view.member_removed(entity, &nick, index);

	let text = match reason {
		Some(reason) => format!("{nick} left {channel}. ({reason})"),
		None => format!("{nick} left {channel}."),
	};
	append(view, entity, Author::System, text);
	Ok(())
}

fn user_quit(
	dir: &mut EntityDirectory,
	view: &mut dyn ViewSink,
	nick: Nick,
	reason: Option<String>,
) -> Result<(), ReconcileError> {
	let text = match reason {
		Some(reason) => format!("{nick} quit. ({reason})"),
		None => format!("{nick} quit."),
	};

	let mut affected = 0usize;
	for id in dir.ids() {
		let entity = entity_mut(dir, id)?;
		if entity.is_server() {
			continue;
		}

		if entity.has_member(&nick) {
			if let Some(index) = entity.members_mut().and_then(|m| m.remove(&nick).ok()) {
				view.member_removed(entity, &nick, index);
			}
		} else if entity.is_private_with(&nick) && !entity.peer_departed() {
			// history stays browsable; only mark the peer gone
			entity.set_peer_departed(true);
		} else {
			continue;
		}

		append(view, entity, Author::System, text.clone());
		affected += 1;
	}

	if affected == 0 {
		return Err(ReconcileError::NotPresent(nick));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::view::ViewEvent;

	fn nick(s: &str) -> Nick {
		Nick::new(s).expect("valid nick")
	}

	fn chan(s: &str) -> ChannelName {
		ChannelName::new(s).expect("valid channel")
	}

	fn setup() -> (EventReconciler, EntityDirectory, Vec<ViewEvent>) {
		(EventReconciler::new(nick("me")), EntityDirectory::new(), Vec::new())
	}

	fn members(dir: &EntityDirectory, c: &str) -> Vec<String> {
		dir.get_by_name(&EntityKey::Channel(chan(c)))
			.unwrap()
			.members()
			.unwrap()
			.iter()
			.map(|n| n.to_string())
			.collect()
	}

	fn texts(dir: &EntityDirectory, key: &EntityKey) -> Vec<String> {
		dir.get_by_name(key)
			.unwrap()
			.history()
			.iter()
			.map(|r| r.text.clone())
			.collect()
	}

	fn join(r: &mut EventReconciler, dir: &mut EntityDirectory, view: &mut Vec<ViewEvent>, c: &str, who: &[&str]) {
		r.apply(
			dir,
			view,
			IrcEvent::SelfJoined {
				channel: chan(c),
				members: who.iter().map(|s| nick(s)).collect(),
			},
		)
		.unwrap();
	}

	#[test]
	fn self_joined_creates_active_channel() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#test", &["bob", "alice"]);
		assert_eq!(dir.len(), 2);
		assert_eq!(dir.active().key(), &EntityKey::Channel(chan("#test")));
		assert_eq!(members(&dir, "#test"), ["alice", "bob"]);
		assert!(matches!(view[0], ViewEvent::EntityCreated { .. }));
		assert!(matches!(view[1], ViewEvent::ActiveChanged { .. }));
	}

	#[test]
	fn self_joined_twice_is_a_duplicate() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#test", &[]);
		let err = r
			.apply(
				&mut dir,
				&mut view,
				IrcEvent::SelfJoined {
					channel: chan("#test"),
					members: vec![],
				},
			)
			.unwrap_err();
		assert!(matches!(err, ReconcileError::Directory(DirectoryError::DuplicateName(_))));
		assert!(!err.is_recoverable());
	}

	#[test]
	fn self_nick_change_notifies_every_pane() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["me", "zoe"]);
		join(&mut r, &mut dir, &mut view, "#b", &["alice"]);
		r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
			recipient: Target::Nick(nick("dave")),
			text: "yo".into(),
		})
		.unwrap();

		r.apply(&mut dir, &mut view, IrcEvent::SelfChangedNick {
			old: nick("me"),
			new: nick("zz"),
		})
		.unwrap();

		assert_eq!(r.nick(), &nick("zz"));
		assert_eq!(members(&dir, "#a"), ["zoe", "zz"]);
		assert_eq!(members(&dir, "#b"), ["alice"]);
		for entity in dir.all() {
			assert_eq!(entity.last_message().unwrap().text, "You are now known as zz.");
		}
	}

	#[test]
	fn user_nick_change_only_touches_affected_panes() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["bob", "me"]);
		join(&mut r, &mut dir, &mut view, "#b", &["alice", "me"]);
		r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
			recipient: Target::Nick(nick("carol")),
			text: "hi".into(),
		})
		.unwrap();

		view.clear();
		r.apply(&mut dir, &mut view, IrcEvent::UserChangedNick {
			old: nick("bob"),
			new: nick("zed"),
		})
		.unwrap();

		assert_eq!(members(&dir, "#a"), ["me", "zed"]);
		assert_eq!(texts(&dir, &EntityKey::Channel(chan("#a"))).last().unwrap(), "bob is now known as zed.");
		assert!(texts(&dir, &EntityKey::Channel(chan("#b"))).is_empty());
		assert_eq!(texts(&dir, &EntityKey::Private(nick("carol"))), ["hi"]);
		assert!(dir.server().history().is_empty());
		assert_eq!(
			view.iter().filter(|e| matches!(e, ViewEvent::MessageAppended { .. })).count(),
			1
		);
	}

	#[test]
	fn user_nick_change_renames_private_conversation() {
		let (mut r, mut dir, mut view) = setup();
		r.apply(&mut dir, &mut view, IrcEvent::ReceivedPrivmsg {
			sender: nick("dave"),
			recipient: Target::Nick(nick("me")),
			text: "hi".into(),
		})
		.unwrap();
		let id = dir.active_id();

		r.apply(&mut dir, &mut view, IrcEvent::UserChangedNick {
			old: nick("dave"),
			new: nick("david"),
		})
		.unwrap();

		let pm = dir.get_by_name(&EntityKey::Private(nick("david"))).unwrap();
		assert_eq!(pm.id(), id);
		assert_eq!(dir.active_id(), id);
		let lines: Vec<&str> = pm.history().iter().map(|r| r.text.as_str()).collect();
		assert_eq!(lines, ["hi", "dave is now known as david."]);
		assert!(view.contains(&ViewEvent::EntityRenamed {
			id,
			old: EntityKey::Private(nick("dave")),
			new: EntityKey::Private(nick("david")),
		}));
	}

	#[test]
	fn user_nick_change_onto_existing_private_evicts_it() {
		let (mut r, mut dir, mut view) = setup();
		for who in ["dave", "erin"] {
			r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
				recipient: Target::Nick(nick(who)),
				text: "ping".into(),
			})
			.unwrap();
		}
		let dave = dir.id_of(&EntityKey::Private(nick("dave"))).unwrap();
		let erin = dir.id_of(&EntityKey::Private(nick("erin"))).unwrap();

		view.clear();
		r.apply(&mut dir, &mut view, IrcEvent::UserChangedNick {
			old: nick("dave"),
			new: nick("erin"),
		})
		.unwrap();

		assert_eq!(dir.len(), 2);
		assert_eq!(dir.id_of(&EntityKey::Private(nick("erin"))), Some(dave));
		assert!(view.contains(&ViewEvent::EntityRemoved {
			id: erin,
			key: EntityKey::Private(nick("erin")),
		}));
	}

	#[test]
	fn user_parted_with_reason_and_unknown_member() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["bob", "me"]);
		r.apply(&mut dir, &mut view, IrcEvent::UserParted {
			nick: nick("bob"),
			channel: chan("#a"),
			reason: Some("bye".into()),
		})
		.unwrap();
		assert_eq!(members(&dir, "#a"), ["me"]);
		assert_eq!(texts(&dir, &EntityKey::Channel(chan("#a"))), ["bob left #a. (bye)"]);

		let err = r
			.apply(&mut dir, &mut view, IrcEvent::UserParted {
				nick: nick("bob"),
				channel: chan("#a"),
				reason: None,
			})
			.unwrap_err();
		assert!(err.is_recoverable());
		assert_eq!(texts(&dir, &EntityKey::Channel(chan("#a"))).len(), 1);
	}

	#[test]
	fn user_quit_fans_out_and_is_idempotent() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["bob", "me"]);
		join(&mut r, &mut dir, &mut view, "#b", &["bob", "me"]);
		join(&mut r, &mut dir, &mut view, "#c", &["me"]);
		r.apply(&mut dir, &mut view, IrcEvent::ReceivedPrivmsg {
			sender: nick("bob"),
			recipient: Target::Nick(nick("me")),
			text: "psst".into(),
		})
		.unwrap();

		let quit = IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: Some("gone".into()),
		};
		r.apply(&mut dir, &mut view, quit.clone()).unwrap();

		assert_eq!(members(&dir, "#a"), ["me"]);
		assert_eq!(members(&dir, "#b"), ["me"]);
		let pm_key = EntityKey::Private(nick("bob"));
		assert_eq!(texts(&dir, &pm_key), ["psst", "bob quit. (gone)"]);
		assert!(texts(&dir, &EntityKey::Channel(chan("#c"))).is_empty());
		assert!(dir.server().history().is_empty());
		assert!(dir.get_by_name(&pm_key).unwrap().peer_departed());

		let err = r.apply(&mut dir, &mut view, quit).unwrap_err();
		assert_eq!(err, ReconcileError::NotPresent(nick("bob")));
		assert!(err.is_recoverable());
		assert_eq!(texts(&dir, &pm_key).len(), 2);
		assert_eq!(texts(&dir, &EntityKey::Channel(chan("#a"))).len(), 1);
	}

	#[test]
	fn returning_peer_clears_departed_flag() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["me"]);
		r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
			recipient: Target::Nick(nick("bob")),
			text: "hi".into(),
		})
		.unwrap();
		r.apply(&mut dir, &mut view, IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: None,
		})
		.unwrap();
		r.apply(&mut dir, &mut view, IrcEvent::UserJoined {
			nick: nick("bob"),
			channel: chan("#a"),
		})
		.unwrap();
		assert!(!dir.get_by_name(&EntityKey::Private(nick("bob"))).unwrap().peer_departed());
	}

	#[test]
	fn nick_taken_over_after_quit_is_noticed_again() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["me", "bob", "rob"]);
		r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
			recipient: Target::Nick(nick("bob")),
			text: "hi".into(),
		})
		.unwrap();

		r.apply(&mut dir, &mut view, IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: None,
		})
		.unwrap();
		r.apply(&mut dir, &mut view, IrcEvent::UserChangedNick {
			old: nick("rob"),
			new: nick("bob"),
		})
		.unwrap();
		let pm_key = EntityKey::Private(nick("bob"));
		assert!(!dir.get_by_name(&pm_key).unwrap().peer_departed());

		r.apply(&mut dir, &mut view, IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: Some("again".into()),
		})
		.unwrap();
		assert_eq!(texts(&dir, &pm_key), ["hi", "bob quit.", "bob quit. (again)"]);
		assert_eq!(members(&dir, "#a"), ["me"]);
	}

	#[test]
	fn departed_conversation_evicted_by_rename_hands_over_cleanly() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["me", "dave"]);
		for who in ["bob", "dave"] {
			r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
				recipient: Target::Nick(nick(who)),
				text: format!("hi {who}"),
			})
			.unwrap();
		}
		r.apply(&mut dir, &mut view, IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: None,
		})
		.unwrap();
		let dave = dir.id_of(&EntityKey::Private(nick("dave"))).unwrap();

		r.apply(&mut dir, &mut view, IrcEvent::UserChangedNick {
			old: nick("dave"),
			new: nick("bob"),
		})
		.unwrap();
		let pm_key = EntityKey::Private(nick("bob"));
		assert_eq!(dir.id_of(&pm_key), Some(dave));
		assert!(!dir.get_by_name(&pm_key).unwrap().peer_departed());

		r.apply(&mut dir, &mut view, IrcEvent::UserQuit {
			nick: nick("bob"),
			reason: None,
		})
		.unwrap();
		assert_eq!(texts(&dir, &pm_key), ["hi dave", "dave is now known as bob.", "bob quit."]);
	}

	#[test]
	fn received_privmsg_routes_by_recipient() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &["bob", "me"]);
		r.apply(&mut dir, &mut view, IrcEvent::ReceivedPrivmsg {
			sender: nick("bob"),
			recipient: Target::Channel(chan("#a")),
			text: "hello all".into(),
		})
		.unwrap();
		let rec = dir
			.get_by_name(&EntityKey::Channel(chan("#a")))
			.unwrap()
			.last_message()
			.unwrap()
			.clone();
		assert_eq!(rec.author, Author::User(nick("bob")));
		assert_eq!(rec.text, "hello all");

		let err = r
			.apply(&mut dir, &mut view, IrcEvent::ReceivedPrivmsg {
				sender: nick("bob"),
				recipient: Target::Channel(chan("#nope")),
				text: "x".into(),
			})
			.unwrap_err();
		assert!(matches!(err, ReconcileError::Directory(DirectoryError::NotFound(_))));

		let err = r
			.apply(&mut dir, &mut view, IrcEvent::ReceivedPrivmsg {
				sender: nick("bob"),
				recipient: Target::Nick(nick("someone_else")),
				text: "x".into(),
			})
			.unwrap_err();
		assert!(matches!(err, ReconcileError::Misaddressed { .. }));
		assert_eq!(dir.len(), 2);
	}

	#[test]
	fn sent_privmsg_is_authored_by_local_nick() {
		let (mut r, mut dir, mut view) = setup();
		r.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
			recipient: Target::Nick(nick("dave")),
			text: "hey".into(),
		})
		.unwrap();
		let pm = dir.get_by_name(&EntityKey::Private(nick("dave"))).unwrap();
		assert!(!pm.is_channel());
		assert_eq!(pm.last_message().unwrap().author, Author::User(nick("me")));

		let err = r
			.apply(&mut dir, &mut view, IrcEvent::SentPrivmsg {
				recipient: Target::Channel(chan("#notjoined")),
				text: "x".into(),
			})
			.unwrap_err();
		assert!(err.is_recoverable());
	}

	#[test]
	fn server_lines_land_on_server_pane() {
		let (mut r, mut dir, mut view) = setup();
		join(&mut r, &mut dir, &mut view, "#a", &[]);
		r.apply(&mut dir, &mut view, IrcEvent::ServerMessage {
			source: "irc.example.net".into(),
			command: "001".into(),
			args: vec!["me".into(), "Welcome".into()],
		})
		.unwrap();
		r.apply(&mut dir, &mut view, IrcEvent::UnknownMessage {
			source: "irc.example.net".into(),
			command: "FOO".into(),
			args: vec!["bar".into()],
		})
		.unwrap();

		let lines: Vec<(String, String)> = dir
			.server()
			.history()
			.iter()
			.map(|r| (r.author.to_string(), r.text.clone()))
			.collect();
		assert_eq!(
			lines,
			[
				("irc.example.net".to_string(), "me Welcome".to_string()),
				("irc.example.net".to_string(), "bar".to_string()),
			]
		);
		assert!(texts(&dir, &EntityKey::Channel(chan("#a"))).is_empty());
	}

	#[test]
	fn self_quit_stops() {
		let (mut r, mut dir, mut view) = setup();
		assert_eq!(r.apply(&mut dir, &mut view, IrcEvent::SelfQuit).unwrap(), Flow::Quit);
	}
}
