pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::auth::{CredentialPair, RefreshCoordinator, RefreshError};
pub use domain::navigation::{Destination, Navigator};
pub use error::{GatewayError, GatewayResult};
pub use infrastructure::http::{ApiGateway, ApiRequest, ApiResponse};
