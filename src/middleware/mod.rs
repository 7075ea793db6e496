/// Middleware module
///
/// Access-token authentication and file server hit counting.

mod jwt_middleware;
mod metrics_middleware;

pub use jwt_middleware::{AuthenticatedUser, JwtMiddleware};
pub use metrics_middleware::MetricsMiddleware;
