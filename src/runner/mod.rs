pub mod aggregator;
pub mod dispatcher;
pub mod executor;
pub mod export;
pub mod reporter;
pub mod types;

pub use aggregator::aggregate;
pub use dispatcher::Dispatcher;
pub use executor::RouteRunner;
pub use export::save_results;
pub use reporter::RouteReporter;
pub use types::{ErrorKind, OutcomeError, RequestOutcome, RouteReport, RunOptions, TimingStats};
