#![forbid(unsafe_code)]

use parley_domain::{EntityKey, Nick};

use crate::entity::{Author, Entity, EntityId, HistoryRecord};

/// Receives every observable state change, synchronously, in order.
///
/// Implemented by whatever draws the conversation panes.
pub trait ViewSink {
	fn entity_created(&mut self, entity: &Entity);
	fn entity_renamed(&mut self, entity: &Entity, old: &EntityKey);
	fn entity_removed(&mut self, entity: &Entity);
	fn message_appended(&mut self, entity: &Entity, record: &HistoryRecord);
	fn member_added(&mut self, entity: &Entity, nick: &Nick, index: usize);
	fn member_removed(&mut self, entity: &Entity, nick: &Nick, index: usize);
	fn member_renamed(&mut self, entity: &Entity, old: &Nick, new: &Nick, from: usize, to: usize);

	fn active_changed(&mut self, _entity: &Entity) {}
}

/// Owned copy of a `ViewSink` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
	EntityCreated {
		id: EntityId,
		key: EntityKey,
	},
	EntityRenamed {
		id: EntityId,
		old: EntityKey,
		new: EntityKey,
	},
	EntityRemoved {
		id: EntityId,
		key: EntityKey,
	},
	MessageAppended {
		id: EntityId,
		key: EntityKey,
		author: Author,
		text: String,
	},
	MemberAdded {
		key: EntityKey,
		nick: Nick,
		index: usize,
	},
	MemberRemoved {
		key: EntityKey,
		nick: Nick,
		index: usize,
	},
	MemberRenamed {
		key: EntityKey,
		old: Nick,
		new: Nick,
		from: usize,
		to: usize,
	},
	ActiveChanged {
		id: EntityId,
		key: EntityKey,
	},
}

/// Records callbacks; handy for batching and for tests.
impl ViewSink for Vec<ViewEvent> {
	fn entity_created(&mut self, entity: &Entity) {
		self.push(ViewEvent::EntityCreated {
			id: entity.id(),
			key: entity.key().clone(),
		});
	}

	fn entity_renamed(&mut self, entity: &Entity, old: &EntityKey) {
		self.push(ViewEvent::EntityRenamed {
			id: entity.id(),
			old: old.clone(),
			new: entity.key().clone(),
		});
	}

	fn entity_removed(&mut self, entity: &Entity) {
		self.push(ViewEvent::EntityRemoved {
			id: entity.id(),
			key: entity.key().clone(),
		});
	}

	fn message_appended(&mut self, entity: &Entity, record: &HistoryRecord) {
		self.push(ViewEvent::MessageAppended {
			id: entity.id(),
			key: entity.key().clone(),
			author: record.author.clone(),
			text: record.text.clone(),
		});
	}

	fn member_added(&mut self, entity: &Entity, nick: &Nick, index: usize) {
		self.push(ViewEvent::MemberAdded {
			key: entity.key().clone(),
			nick: nick.clone(),
			index,
		});
	}

	fn member_removed(&mut self, entity: &Entity, nick: &Nick, index: usize) {
		self.push(ViewEvent::MemberRemoved {
			key: entity.key().clone(),
			nick: nick.clone(),
			index,
		});
	}

	fn member_renamed(&mut self, entity: &Entity, old: &Nick, new: &Nick, from: usize, to: usize) {
		self.push(ViewEvent::MemberRenamed {
			key: entity.key().clone(),
			old: old.clone(),
			new: new.clone(),
			from,
			to,
		});
	}

	fn active_changed(&mut self, entity: &Entity) {
		self.push(ViewEvent::ActiveChanged {
			id: entity.id(),
			key: entity.key().clone(),
		});
	}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ViewSink for NullView {
	fn entity_created(&mut self, _entity: &Entity) {}
	fn entity_renamed(&mut self, _entity: &Entity, _old: &EntityKey) {}
	fn entity_removed(&mut self, _entity: &Entity) {}
	fn message_appended(&mut self, _entity: &Entity, _record: &HistoryRecord) {}
	fn member_added(&mut self, _entity: &Entity, _nick: &Nick, _index: usize) {}
	fn member_removed(&mut self, _entity: &Entity, _nick: &Nick, _index: usize) {}
	fn member_renamed(&mut self, _entity: &Entity, _old: &Nick, _new: &Nick, _from: usize, _to: usize) {}
}
