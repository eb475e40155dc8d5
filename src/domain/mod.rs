//! Domain layer: chat entities and the concurrent room structures.

pub mod history;
pub mod message;
pub mod presence;
pub mod registry;
pub mod session;

pub use history::MessageRing;
pub use message::{ChatMessage, MessageArchive};
pub use presence::PresenceTable;
pub use registry::{RegistryError, SessionRegistry};
pub use session::{DropPolicy, OutboundQueue, PushOutcome, RegisteredSession, SessionId};
