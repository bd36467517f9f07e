pub mod coordinator;
pub mod dto;
pub mod error;
pub mod router;

pub use coordinator::RefreshCoordinator;
pub use dto::{CredentialPair, RefreshTokenRequest};
pub use error::RefreshError;
pub use router::{FailureClass, FailureRouter};
