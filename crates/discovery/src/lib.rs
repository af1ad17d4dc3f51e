//! Discovery layer: drives the recommendation backend from a user's
//! selection.
//!
//! - [`SystemBootstrap`]: startup calls and the catalog snapshot
//! - [`RecommendationOrchestrator`]: one request per calculate, last
//!   issued wins
//! - [`CandidateLoader`]: movie listings for movie and mood modes
//! - [`MovieDetailFetcher`]: single-movie detail
//! - [`DiscoverySession`]: the façade tying them to a
//!   [`session::SelectionStateMachine`]

pub mod bootstrap;
pub mod candidates;
pub mod detail;
pub mod facade;
pub mod orchestrator;

pub use bootstrap::{BootstrapError, SystemBootstrap};
pub use candidates::{CANDIDATE_LIMIT, CandidateLoader};
pub use detail::MovieDetailFetcher;
pub use facade::DiscoverySession;
pub use orchestrator::{RecommendationOrchestrator, RecommendationOutcome, RequestPlan, primary_movie};
