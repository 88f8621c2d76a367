mod api_server;
mod error;
mod service;
mod tls;

pub use api_server::*;
pub use error::*;
pub use service::*;
pub use tls::*;
