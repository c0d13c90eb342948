#![forbid(unsafe_code)]

use parley_domain::Nick;
use thiserror::Error;

/// Membership errors. Both indicate local state drifted from the server's.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemberError {
	#[error("{0} is not a member")]
	NotMember(Nick),
	#[error("{0} is already a member")]
	AlreadyMember(Nick),
}

/// Channel member list kept in case-insensitive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberList {
	nicks: Vec<Nick>,
}

impl MemberList {
	/// Build from the initial NAMES reply. Duplicates are dropped.
	pub fn new(nicks: impl IntoIterator<Item = Nick>) -> Self {
		let mut nicks: Vec<Nick> = nicks.into_iter().collect();
		nicks.sort_by(|a, b| a.casefold_cmp(b));
		nicks.dedup();
		Self { nicks }
	}

	fn search(&self, nick: &Nick) -> Result<usize, usize> {
		self.nicks.binary_search_by(|probe| probe.casefold_cmp(nick))
	}

	/// Insert at the sorted position and return that index.
	pub fn insert(&mut self, nick: Nick) -> Result<usize, MemberError> {
		match self.search(&nick) {
			Ok(_) => Err(MemberError::AlreadyMember(nick)),
			Err(index) => {
				self.nicks.insert(index, nick);
				Ok(index)
			}
		}
	}

	/// Remove and return the index the nick used to occupy.
	pub fn remove(&mut self, nick: &Nick) -> Result<usize, MemberError> {
		let index = self.search(nick).map_err(|_| MemberError::NotMember(nick.clone()))?;
		self.nicks.remove(index);
		Ok(index)
	}

	/// Replace `old` with `new`, returning `(from, to)` indices.
	///
	/// `to` is the index of `new` in the list after the replacement.
	pub fn rename(&mut self, old: &Nick, new: Nick) -> Result<(usize, usize), MemberError> {
		let from = self.search(old).map_err(|_| MemberError::NotMember(old.clone()))?;
		if old == &new {
			return Ok((from, from));
		}
		if self.search(&new).is_ok() {
			return Err(MemberError::AlreadyMember(new));
		}
		self.nicks.remove(from);
		let to = match self.search(&new) {
			Ok(index) | Err(index) => index,
		};
		self.nicks.insert(to, new);
		Ok((from, to))
	}

	pub fn contains(&self, nick: &Nick) -> bool {
		self.search(nick).is_ok()
	}

	pub fn len(&self) -> usize {
		self.nicks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nicks.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Nick> {
		self.nicks.iter()
	}
}
