pub mod authenticator;
pub mod request_id;

pub use authenticator::RequestAuthenticator;
pub use request_id::{RequestId, X_REQUEST_ID};
