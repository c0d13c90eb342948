#![forbid(unsafe_code)]

use parley_core::{Entity, EntityKey, HistoryRecord, Nick, ViewSink};
use tracing::debug;

/// Prints conversation changes to stdout.
#[derive(Debug)]
pub struct ConsoleView {
	server_label: String,
	lines: usize,
}

impl ConsoleView {
	pub fn new(server_label: impl Into<String>) -> Self {
		Self {
			server_label: server_label.into(),
			lines: 0,
		}
	}

	/// Message lines printed so far.
	pub fn lines(&self) -> usize {
		self.lines
	}

	fn title(&self, key: &EntityKey) -> String {
		key.name().map_or_else(|| self.server_label.clone(), str::to_string)
	}
}

impl ViewSink for ConsoleView {
	fn entity_created(&mut self, entity: &Entity) {
		println!("-- opened {}", self.title(entity.key()));
	}

	fn entity_renamed(&mut self, entity: &Entity, old: &EntityKey) {
		println!("-- {} is now {}", self.title(old), self.title(entity.key()));
	}

	fn entity_removed(&mut self, entity: &Entity) {
		println!("-- closed {}", self.title(entity.key()));
	}

	fn message_appended(&mut self, entity: &Entity, record: &HistoryRecord) {
		self.lines += 1;
		println!("{:<16} {}", self.title(entity.key()), record.render());
	}

	fn member_added(&mut self, entity: &Entity, nick: &Nick, index: usize) {
		debug!(conversation = %entity.key(), %nick, index, "member added");
	}

	fn member_removed(&mut self, entity: &Entity, nick: &Nick, index: usize) {
		debug!(conversation = %entity.key(), %nick, index, "member removed");
	}

	fn member_renamed(&mut self, entity: &Entity, old: &Nick, new: &Nick, from: usize, to: usize) {
		debug!(conversation = %entity.key(), %old, %new, from, to, "member renamed");
	}

	fn active_changed(&mut self, entity: &Entity) {
		println!("-- viewing {}", self.title(entity.key()));
	}
}
