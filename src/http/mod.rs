//! HTTP protocol layer module
//!
//! Response builders decoupled from the page controllers.

pub mod response;

pub use response::{
    build_403_response, build_404_response, build_405_response, build_413_response, build_500_response,
    build_health_response, build_html_response, build_options_response,
    build_redirect_response, with_server_name,
};
