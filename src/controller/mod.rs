//! Page controllers
//!
//! Each controller turns an identity into a `View`; the router decides how a view
//! becomes an HTTP response.

pub mod connect;
pub mod hello;

pub use connect::ConnectController;
pub use hello::HelloController;
