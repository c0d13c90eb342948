#![forbid(unsafe_code)]

//! Conversation state for an IRC client.
//!
//! Connection-layer events are applied to an [`EntityDirectory`] of
//! conversations (the server pane, joined channels, private chats). A
//! [`ViewSink`] hears about every change so a presentation layer can follow
//! along without owning any state.

pub mod command;
pub mod directory;
pub mod entity;
pub mod error;
pub mod event;
pub mod members;
pub mod reconciler;
pub mod session;
pub mod source;
pub mod view;

pub use command::{Request, RequestSink, UserCommand};
pub use directory::{DirectoryError, EntityDirectory, Removed, Renamed};
pub use entity::{Author, Entity, EntityId, HistoryRecord};
pub use error::{CommandError, ReconcileError};
pub use event::IrcEvent;
pub use members::{MemberError, MemberList};
pub use reconciler::{EventReconciler, Flow};
pub use session::{DEFAULT_POLL_INTERVAL, DrainOutcome, Session, SessionEnd, SessionOptions};
pub use source::{EventProducer, EventQueue, EventSource, Next, QueueClosed, event_queue};
pub use view::{NullView, ViewEvent, ViewSink};

pub use parley_domain::{ChannelName, EntityKey, Nick, Target};
