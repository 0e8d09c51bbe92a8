/// Session and authentication state
mod manager;

pub use manager::{SessionManager, SessionState};
