use crate::{error::Error, http_client::HttpClient, util, ReqwestHttpClient};
use std::{str::FromStr, sync::Arc};

/// How a status code mismatch affects the body comparison.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComparisonMode {
    /// A status mismatch is reported and the body diff is skipped.
    Single,
    /// A status mismatch is reported and the bodies are still diffed.
    Batch,
}

impl FromStr for ComparisonMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ComparisonMode::Single),
            "batch" => Ok(ComparisonMode::Batch),
            _ => Err(Error::InvalidConfiguration {
                name: "COMPARISON_MODE",
                value: s.into(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct ComparisonConfiguration {
    old_base_url: String,
    new_base_url: String,
    sort_arrays: bool,
    extended_logs: bool,
    mode: ComparisonMode,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl ComparisonConfiguration {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        old_base_url: S1,
        new_base_url: S2,
        mode: ComparisonMode,
    ) -> Self {
        Self {
            old_base_url: old_base_url.into(),
            new_base_url: new_base_url.into(),
            sort_arrays: false,
            extended_logs: false,
            mode,
            http_client: None,
        }
    }

    pub fn old_base_url(&self) -> &str {
        &self.old_base_url
    }

    pub fn new_base_url(&self) -> &str {
        &self.new_base_url
    }

    pub fn set_sort_arrays(&mut self, value: bool) {
        self.sort_arrays = value;
    }

    pub fn sort_arrays(&self) -> bool {
        self.sort_arrays
    }

    pub fn set_extended_logs(&mut self, value: bool) {
        self.extended_logs = value;
    }

    pub fn extended_logs(&self) -> bool {
        self.extended_logs
    }

    pub fn set_mode(&mut self, mode: ComparisonMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    /// Aim both base URLs at the container host when they name `localhost`.
    pub fn rewrite_localhost_for_docker(&mut self) {
        self.old_base_url = util::rewrite_docker_host(&self.old_base_url);
        self.new_base_url = util::rewrite_docker_host(&self.new_base_url);
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }
}

/// Raw process inputs, validated into a [`ComparisonConfiguration`] and the
/// collection coordinates.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub old_base_url: Option<String>,
    pub new_base_url: Option<String>,
    pub collection_id: Option<String>,
    pub request_id: Option<String>,
    pub api_key: Option<String>,
    pub sort_arrays: bool,
    pub extended_logs: bool,
    pub mode: Option<ComparisonMode>,
    pub docker_host_rewrite: bool,
}

/// Everything needed to start a run once the inputs have been validated.
#[derive(Debug)]
pub struct RunPlan {
    pub configuration: ComparisonConfiguration,
    pub collection_id: String,
    pub request_id: Option<String>,
    pub api_key: String,
}

impl RunInputs {
    /// Check the required inputs, reporting every missing one at once.
    pub fn validate(self) -> Result<RunPlan, Error> {
        let mut missing = Vec::new();

        let old_base_url = required(self.old_base_url, "OLD_URL", &mut missing);
        let new_base_url = required(self.new_base_url, "NEW_URL", &mut missing);
        let collection_id = required(self.collection_id, "COLLECTION_ID", &mut missing);
        let api_key = required(self.api_key, "API_KEY", &mut missing);

        if !missing.is_empty() {
            return Err(Error::MissingConfiguration(missing));
        }

        let request_id = self.request_id.filter(|id| !id.trim().is_empty());
        let mode = self.mode.unwrap_or(if request_id.is_some() {
            ComparisonMode::Single
        } else {
            ComparisonMode::Batch
        });

        let mut configuration = ComparisonConfiguration::new(
            old_base_url.unwrap_or_default(),
            new_base_url.unwrap_or_default(),
            mode,
        );
        configuration.set_sort_arrays(self.sort_arrays);
        configuration.set_extended_logs(self.extended_logs);
        if self.docker_host_rewrite {
            configuration.rewrite_localhost_for_docker();
        }

        Ok(RunPlan {
            configuration,
            collection_id: collection_id.unwrap_or_default(),
            request_id,
            api_key: api_key.unwrap_or_default(),
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = value.filter(|v| !v.trim().is_empty());
    if value.is_none() {
        missing.push(name);
    }
    value
}
