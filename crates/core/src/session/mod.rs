//! Session state for the current visitor.

pub mod flag;
pub mod store;

pub use flag::Flag;
pub use store::{Session, SessionClosed, SessionObserver, SessionState, SessionStore};
