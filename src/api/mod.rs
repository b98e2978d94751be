//! The API layer, containing web handlers and routing.

pub mod extractors;
pub mod handlers;
pub mod router;

pub use extractors::JsonBody;
pub use handlers::{ApiDoc, ApiError};
pub use router::{DEFAULT_REQUEST_TIMEOUT, create_router, create_router_with_timeout};
