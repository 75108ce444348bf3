//! Job-domain identifiers, bisect commands, and the payloads exchanged with the broker.

pub mod command;
pub mod id;
pub mod patch;
pub mod record;

pub use command::*;
pub use id::*;
pub use patch::*;
pub use record::*;
