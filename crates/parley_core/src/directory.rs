#![forbid(unsafe_code)]

use std::collections::HashMap;

use parley_domain::EntityKey;
use thiserror::Error;
use tracing::{debug, info};

use crate::entity::{Entity, EntityId};
use crate::members::MemberList;

/// Errors for directory operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
	/// An entity with this name already exists.
	#[error("duplicate conversation name: {0}")]
	DuplicateName(EntityKey),

	/// The server pane cannot be renamed or removed.
	#[error("the server pane cannot be renamed or removed")]
	ProtectedName,

	/// No entity with this name exists.
	#[error("no such conversation: {0}")]
	NotFound(EntityKey),

	/// A rename would turn a channel into a private conversation or back.
	#[error("cannot rename {old} to {new}: different conversation kinds")]
	KindMismatch { old: EntityKey, new: EntityKey },
}

/// Result of a successful `remove`.
#[derive(Debug)]
pub struct Removed {
	/// The removed entity, handed back so the caller can release it.
	pub entity: Entity,

	/// Set when the removed entity was active and focus moved.
	pub new_active: Option<EntityId>,
}

/// Result of a successful `rename`.
#[derive(Debug)]
pub struct Renamed {
	pub id: EntityId,
	pub old: EntityKey,

	/// Entity that previously held the new name, if any.
	pub evicted: Option<Removed>,
}

/// Owns every conversation entity, keyed by unique name.
///
/// Display order is the server pane first, then everything else in creation
/// order. Exactly one entity is active at any time.
#[derive(Debug)]
pub struct EntityDirectory {
	entities: HashMap<EntityId, Entity>,
	order: Vec<EntityId>,
	names: HashMap<EntityKey, EntityId>,
	active: EntityId,
	next_id: u64,
}

impl Default for EntityDirectory {
	fn default() -> Self {
		Self::new()
	}
}

impl EntityDirectory {
	/// Create a directory holding only the server pane, which is active.
	pub fn new() -> Self {
		let server_id = EntityId(0);
		let mut entities = HashMap::new();
		entities.insert(server_id, Entity::new(server_id, EntityKey::Server, None));
		let mut names = HashMap::new();
		names.insert(EntityKey::Server, server_id);

		Self {
			entities,
			order: vec![server_id],
			names,
			active: server_id,
			next_id: 1,
		}
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Always false; the server pane is never removed.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn contains(&self, key: &EntityKey) -> bool {
		self.names.contains_key(key)
	}

	pub fn server_id(&self) -> EntityId {
		self.order[0]
	}

	pub fn server(&self) -> &Entity {
		&self.entities[&self.server_id()]
	}

	pub fn active_id(&self) -> EntityId {
		self.active
	}

	pub fn active(&self) -> &Entity {
		&self.entities[&self.active]
	}

	pub fn get(&self, id: EntityId) -> Option<&Entity> {
		self.entities.get(&id)
	}

	pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
		self.entities.get_mut(&id)
	}

	pub fn id_of(&self, key: &EntityKey) -> Option<EntityId> {
		self.names.get(key).copied()
	}

	/// Look up by name without changing focus.
	pub fn get_by_name(&self, key: &EntityKey) -> Result<&Entity, DirectoryError> {
		self.id_of(key)
			.and_then(|id| self.entities.get(&id))
			.ok_or_else(|| DirectoryError::NotFound(key.clone()))
	}

	pub(crate) fn get_mut_by_name(&mut self, key: &EntityKey) -> Result<&mut Entity, DirectoryError> {
		let id = self.id_of(key).ok_or_else(|| DirectoryError::NotFound(key.clone()))?;
		self.entities
			.get_mut(&id)
			.ok_or_else(|| DirectoryError::NotFound(key.clone()))
	}

	/// Make the named entity active. Returns it and whether focus moved.
	pub fn select_by_name(&mut self, key: &EntityKey) -> Result<(&Entity, bool), DirectoryError> {
		let id = self.id_of(key).ok_or_else(|| DirectoryError::NotFound(key.clone()))?;
		let changed = self.active != id;
		self.active = id;
		Ok((&self.entities[&id], changed))
	}

	/// All entities in display order.
	pub fn all(&self) -> impl Iterator<Item = &Entity> + '_ {
		self.order.iter().filter_map(|id| self.entities.get(id))
	}

	/// Snapshot of ids in display order, for fan-out while mutating.
	pub fn ids(&self) -> Vec<EntityId> {
		self.order.clone()
	}

	/// Display position of an entity.
	pub fn index_of(&self, id: EntityId) -> Option<usize> {
		self.order.iter().position(|x| *x == id)
	}

	/// Insert a new entity and make it active.
	pub fn create(&mut self, key: EntityKey, members: Option<MemberList>) -> Result<EntityId, DirectoryError> {
		if self.names.contains_key(&key) {
			return Err(DirectoryError::DuplicateName(key));
		}

		let id = EntityId(self.next_id);
		self.next_id += 1;

		info!(%id, name = %key, channel = members.is_some(), "conversation created");

		self.names.insert(key.clone(), id);
		self.entities.insert(id, Entity::new(id, key, members));
		self.order.push(id);
		self.active = id;

		Ok(id)
	}

	/// Move an entity to a new name, keeping its display slot and focus.
	///
	/// If `new` is already taken, that entity is removed first.
	pub fn rename(&mut self, old: &EntityKey, new: EntityKey) -> Result<Renamed, DirectoryError> {
		if old.is_server() || new.is_server() {
			return Err(DirectoryError::ProtectedName);
		}
		if old.is_channel() != new.is_channel() {
			return Err(DirectoryError::KindMismatch {
				old: old.clone(),
				new,
			});
		}

		let id = self.id_of(old).ok_or_else(|| DirectoryError::NotFound(old.clone()))?;
		if old == &new {
			return Ok(Renamed {
				id,
				old: old.clone(),
				evicted: None,
			});
		}

		let evicted = if self.names.contains_key(&new) {
			debug!(old = %old, new = %new, "rename target taken, removing it");
			Some(self.remove(&new)?)
		} else {
			None
		};

		self.names.remove(old);
		self.names.insert(new.clone(), id);
		if let Some(entity) = self.entities.get_mut(&id) {
			entity.set_key(new.clone());
		}

		info!(%id, old = %old, new = %new, "conversation renamed");

		Ok(Renamed {
			id,
			old: old.clone(),
			evicted,
		})
	}

	/// Remove an entity, moving focus first if it was active.
	pub fn remove(&mut self, key: &EntityKey) -> Result<Removed, DirectoryError> {
		if key.is_server() {
			return Err(DirectoryError::ProtectedName);
		}

		let id = self.id_of(key).ok_or_else(|| DirectoryError::NotFound(key.clone()))?;
		let index = self
			.index_of(id)
			.ok_or_else(|| DirectoryError::NotFound(key.clone()))?;

		let new_active = if self.active == id {
			// Index 0 is the server pane, so there is always a neighbour.
			let next = if index + 1 < self.order.len() {
				self.order[index + 1]
			} else {
				self.order[index - 1]
			};
			self.active = next;
			Some(next)
		} else {
			None
		};

		self.order.remove(index);
		self.names.remove(key);
		let entity = self
			.entities
			.remove(&id)
			.ok_or_else(|| DirectoryError::NotFound(key.clone()))?;

		info!(%id, name = %key, "conversation removed");

		Ok(Removed { entity, new_active })
	}

	/// Release everything, server pane included, in display order.
	pub fn into_entities(mut self) -> Vec<Entity> {
		self.order
			.iter()
			.filter_map(|id| self.entities.remove(id))
			.collect()
	}
}
