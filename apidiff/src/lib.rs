mod comparison_configuration;
mod data;
mod error;
mod harness;
mod http_client;
mod util;

pub mod collection;
pub mod diff;
pub mod logging;
pub mod report;

pub use comparison_configuration::{ComparisonConfiguration, ComparisonMode, RunInputs, RunPlan};
pub use data::{HttpMethod, RequestDefinition, ResponseRecord};
pub use error::{Error, ErrorKind, Side};
pub use harness::{BatchSummary, ComparisonHarness, ComparisonResult};
pub use http_client::{HttpClient, ReqwestHttpClient};
