//! GraphQL client: transport seam, bounded retry, cursor pagination.

pub mod paginate;
pub mod retry;
pub mod transport;

pub use paginate::CursorPaginator;
pub use retry::RetryingCaller;
pub use transport::{GraphqlTransport, HttpTransport, TransportError};
