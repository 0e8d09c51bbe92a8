/// Trimbook - booking and session client for a barbershop platform
///
/// The client core behind the Trimbook UI: session/auth state with a
/// persisted token lifecycle, the booking status lifecycle, profile and
/// avatar handling, and the read-mostly catalog, all speaking to an external
/// backend through swappable adapters.
pub mod avatar;
pub mod backend;
pub mod bookings;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod models;
pub mod profile;
pub mod session;
pub mod token;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
