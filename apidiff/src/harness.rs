use crate::{
    comparison_configuration::{ComparisonConfiguration, ComparisonMode},
    diff::{self, ChangeSet},
    error::{Error, Side},
    http_client::HttpClient,
    report, util, HttpMethod, RequestDefinition, ResponseRecord,
};
use std::{io::Write, sync::Arc};
use tracing::{error, info, warn};

/// What one paired execution produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub name: String,
    pub old_status: u16,
    pub new_status: u16,
    /// `None` when the body diff was skipped after a status mismatch.
    pub changes: Option<ChangeSet>,
}

impl ComparisonResult {
    pub fn status_mismatch(&self) -> Option<(u16, u16)> {
        if self.old_status != self.new_status {
            Some((self.old_status, self.new_status))
        } else {
            None
        }
    }

    pub fn is_match(&self) -> bool {
        self.status_mismatch().is_none()
            && self.changes.as_ref().map_or(false, ChangeSet::is_empty)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub matched: usize,
    pub differed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.matched + self.differed + self.failed
    }

    pub fn all_matched(&self) -> bool {
        self.differed == 0 && self.failed == 0
    }
}

#[derive(Debug)]
pub struct ComparisonHarness {
    configuration: ComparisonConfiguration,
    http_client: Arc<dyn HttpClient + Send + Sync>,
}

impl ComparisonHarness {
    pub fn new(configuration: ComparisonConfiguration) -> Self {
        let http_client = configuration.http_client();

        Self {
            configuration,
            http_client,
        }
    }

    pub fn configuration(&self) -> &ComparisonConfiguration {
        &self.configuration
    }

    /// Replay `request` against both services and diff what came back.
    pub async fn compare(&self, request: &RequestDefinition) -> Result<ComparisonResult, Error> {
        let method = request.http_method()?;
        let old_url = util::join_url(self.configuration.old_base_url(), &request.path);
        let new_url = util::join_url(self.configuration.new_base_url(), &request.path);

        if self.configuration.extended_logs() {
            log_request(Side::Old, method, &old_url, request);
            log_request(Side::New, method, &new_url, request);
        }

        let (old_response, new_response) = futures::join!(
            self.http_client
                .make_request(Side::Old, &old_url, method, request),
            self.http_client
                .make_request(Side::New, &new_url, method, request)
        );
        let old_response = old_response?;
        let new_response = new_response?;

        if self.configuration.extended_logs() {
            log_response(Side::Old, &old_url, &old_response);
            log_response(Side::New, &new_url, &new_response);
        }

        let status_mismatch = old_response.status != new_response.status;
        if status_mismatch {
            warn!(
                name = %request.name,
                old_status = old_response.status,
                new_status = new_response.status,
                "status codes differ"
            );
        }

        let changes = if status_mismatch && self.configuration.mode() == ComparisonMode::Single {
            None
        } else {
            Some(diff::diff(
                &old_response.body,
                &new_response.body,
                self.configuration.sort_arrays(),
            ))
        };

        Ok(ComparisonResult {
            name: request.name.clone(),
            old_status: old_response.status,
            new_status: new_response.status,
            changes,
        })
    }

    /// Compare every request in turn, writing each report to `out` as soon as it is complete.
    ///
    /// A failed comparison is reported and the batch moves on; only a failure to
    /// write the report stops it.
    pub async fn compare_all<W: Write>(
        &self,
        requests: &[RequestDefinition],
        out: &mut W,
    ) -> Result<BatchSummary, Error> {
        let total = requests.len();
        let mut summary = BatchSummary::default();

        for (index, request) in requests.iter().enumerate() {
            info!(item = index + 1, total, name = %request.name, "comparing request");

            match self.compare(request).await {
                Ok(result) => {
                    if result.is_match() {
                        summary.matched += 1;
                    } else {
                        summary.differed += 1;
                    }
                    report::write_result(out, &result)?;
                }
                Err(err) => {
                    error!(name = %request.name, error = %err, "comparison failed");
                    summary.failed += 1;
                    report::write_failure(out, &request.name, &err)?;
                }
            }

            report::write_separator(out)?;
        }

        info!(
            matched = summary.matched,
            differed = summary.differed,
            failed = summary.failed,
            "batch complete"
        );

        Ok(summary)
    }
}

fn log_request(side: Side, method: HttpMethod, url: &str, request: &RequestDefinition) {
    info!(
        %side,
        %method,
        url,
        headers = ?request.headers,
        query = ?request.query_params,
        body = request.body.as_deref().unwrap_or(""),
        "sending request"
    );
}

fn log_response(side: Side, url: &str, response: &ResponseRecord) {
    info!(
        %side,
        url,
        status = response.status,
        headers = ?response.headers,
        body = %response.body,
        "received response"
    );
}
