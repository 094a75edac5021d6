//! Content generation adapters.
//!
//! The HTTP generator talks to the real backend; the retrying wrapper adds
//! timeout and bounded backoff; the cache keeps generated copy for
//! identical inputs; the mock drives tests.

mod cached_generator;
mod http_generator;
mod mock_generator;
mod retrying_generator;

pub use cached_generator::CachedGenerator;
pub use http_generator::HttpGenerator;
pub use mock_generator::MockGenerator;
pub use retrying_generator::{RetryPolicy, RetryingGenerator};
