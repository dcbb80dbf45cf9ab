//! Web API query layer: request building, transport, decoding, facade.
//!
//! All traffic targets the fixed `api.guildwars2.com` origin with plain GET
//! requests; authentication is the `access_token` query parameter.

pub mod decode;
pub mod error;
pub mod facade;
pub mod request;
pub mod transport;

pub use decode::{JsonDecoder, Page, ResponseDecoder};
pub use error::ApiError;
pub use facade::{ApiFacade, ConnectionMode};
pub use request::RequestBuilder;
pub use transport::{HttpTransport, Transport};
