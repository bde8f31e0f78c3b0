//! Social integration module
//!
//! Connection state, identity resolution and the Twitter API client, wired together
//! at startup and consumed by the page controllers through the traits in `ports`.

mod connection;
mod identity;
mod model;
mod ports;
mod twitter;

pub use connection::InMemoryConnectionRepository;
pub use identity::FixedIdentitySource;
pub use model::{CursoredList, Identity, Profile};
pub use ports::{ConnectionProvider, IdentitySource, ProfileClient};
pub use twitter::TwitterClient;
