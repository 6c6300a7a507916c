// ABOUTME: Gallery API account lookup and per-submission temp token sessions
// ABOUTME: Replaces process-wide account id caching with a request-scoped memoized session

pub mod client;
pub mod error;
pub mod resolver;
pub mod session;

pub use client::{GalleryApiClient, PingResponse};
pub use error::{ApiError, ApiResult};
pub use resolver::AccountResolver;
pub use session::SubmissionSession;
