//! apidiff CLI
//!
//! Replays the requests of a collection against an old and a new service and
//! reports how the responses differ.

use apidiff::{
    collection::{CollectionStore, PostmanCollectionStoreBuilder},
    logging::{self, LogFormat},
    report, ComparisonHarness, ComparisonMode, Error, ReqwestHttpClient, RunInputs, RunPlan,
};
use clap::{builder::BoolishValueParser, ArgAction, Parser};
use std::{io, process, sync::Arc};

const EXIT_FATAL: i32 = 1;
const EXIT_DIFFERENCES: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "apidiff")]
#[command(about = "Compare the responses of two services for the same requests", long_about = None)]
struct Cli {
    /// Base URL of the reference service
    #[arg(long, env = "OLD_URL")]
    old_url: Option<String>,

    /// Base URL of the service under test
    #[arg(long, env = "NEW_URL")]
    new_url: Option<String>,

    #[arg(long, env = "COLLECTION_ID")]
    collection_id: Option<String>,

    /// Compare only this request; the whole collection otherwise
    #[arg(long, env = "REQUEST_ID")]
    request_id: Option<String>,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Compare arrays without regard to element order
    #[arg(long, env = "SORT_ARRAYS", action = ArgAction::Set, value_parser = BoolishValueParser::new(), default_value = "false")]
    sort_arrays: bool,

    /// Log full requests and responses
    #[arg(long, env = "EXTENDED_LOGS", action = ArgAction::Set, value_parser = BoolishValueParser::new(), default_value = "false")]
    extended_logs: bool,

    /// `single` skips the body diff when status codes differ, `batch` always diffs
    #[arg(long, env = "COMPARISON_MODE")]
    mode: Option<ComparisonMode>,

    /// Replace `localhost` in both base URLs with host.docker.internal
    #[arg(long, env = "DOCKER_HOST_REWRITE", action = ArgAction::Set, value_parser = BoolishValueParser::new(), default_value = "false")]
    docker_host_rewrite: bool,

    #[arg(long, env = "COLLECTION_API_URL")]
    collection_api_url: Option<String>,

    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

impl Cli {
    fn into_parts(self) -> (RunInputs, Option<String>) {
        let inputs = RunInputs {
            old_base_url: self.old_url,
            new_base_url: self.new_url,
            collection_id: self.collection_id,
            request_id: self.request_id,
            api_key: self.api_key,
            sort_arrays: self.sort_arrays,
            extended_logs: self.extended_logs,
            mode: self.mode,
            docker_host_rewrite: self.docker_host_rewrite,
        };

        (inputs, self.collection_api_url)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_failure_exit_code(&e));
        }
    };
    logging::init(cli.log_format);

    let (inputs, collection_api_url) = cli.into_parts();

    let mut plan = match inputs.validate() {
        Ok(plan) => plan,
        Err(Error::MissingConfiguration(missing)) => {
            for name in missing {
                eprintln!("Missing required input: {}", name);
            }
            process::exit(EXIT_FATAL);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FATAL);
        }
    };

    let http = reqwest::Client::new();
    plan.configuration
        .set_http_client(Arc::new(ReqwestHttpClient::with_client(http.clone())));

    let mut store = PostmanCollectionStoreBuilder::new()
        .with_api_key(plan.api_key.clone())
        .with_http_client(http);
    if let Some(api_url) = collection_api_url {
        store = store.with_api_url(api_url);
    }

    match run(plan, &store.build()).await {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_DIFFERENCES),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}

/// `--help` goes to stdout and exits cleanly; any invalid argument or
/// environment value is a fatal configuration error.
fn parse_failure_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        EXIT_FATAL
    } else {
        0
    }
}

/// Resolve the requests and compare them. `Ok(false)` means some responses differed.
async fn run(plan: RunPlan, store: &dyn CollectionStore) -> Result<bool, Error> {
    let RunPlan {
        configuration,
        collection_id,
        request_id,
        ..
    } = plan;

    let requests = match &request_id {
        Some(request_id) => vec![store.load_request(&collection_id, request_id).await?],
        None => store.load_requests(&collection_id).await?,
    };
    let harness = ComparisonHarness::new(configuration);
    tracing::info!(
        collection_id = %collection_id,
        requests = requests.len(),
        mode = ?harness.configuration().mode(),
        "starting comparison"
    );
    let mut out = io::stdout();

    let summary = harness.compare_all(&requests, &mut out).await?;
    report::write_summary(&mut out, &summary)?;

    Ok(summary.all_matched())
}
