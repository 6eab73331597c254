use super::CollectionStore;
use crate::{error::Error, util, RequestDefinition};
use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_API_URL: &str = "https://api.postman.com";

/// Builder used to build a PostmanCollectionStore instance
#[derive(Debug, Clone, Default)]
pub struct PostmanCollectionStoreBuilder {
    api_url: Option<String>,
    api_key: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl PostmanCollectionStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given API root instead of the public Postman API.
    pub fn with_api_url<T: Into<String>>(mut self, api_url: T) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Access key sent with every collection lookup.
    pub fn with_api_key<T: Into<String>>(mut self, api_key: T) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(mut self) -> PostmanCollectionStore {
        PostmanCollectionStore {
            http: self.http_client.take().unwrap_or_default(),
            api_url: self
                .api_url
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_API_URL)),
            api_key: self.api_key.take().unwrap_or_default(),
        }
    }
}

/// Reads request definitions from a collection hosted by the Postman API.
#[derive(Debug, Clone)]
pub struct PostmanCollectionStore {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl PostmanCollectionStore {
    async fn fetch_collection(
        &self,
        collection_id: &str,
    ) -> Result<Vec<(Option<String>, RequestDefinition)>, Error> {
        let url = format!(
            "{}/collections/{}",
            self.api_url.trim_end_matches('/'),
            collection_id
        );
        debug!(collection_id, url = %url, "fetching collection");

        let response = self
            .http
            .get(&url)
            .query(&[("access_key", self.api_key.as_str())])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(Error::CollectionNotFound(collection_id.into())),
            status => {
                return Err(Error::CollectionUnavailable {
                    collection_id: collection_id.into(),
                    status: status.as_u16(),
                })
            }
        }

        let text = response.text().await?;
        let definitions = parse_collection(&text)?;
        debug!(collection_id, requests = definitions.len(), "collection loaded");

        Ok(definitions)
    }
}

#[async_trait]
impl CollectionStore for PostmanCollectionStore {
    async fn load_requests(&self, collection_id: &str) -> Result<Vec<RequestDefinition>, Error> {
        Ok(self
            .fetch_collection(collection_id)
            .await?
            .into_iter()
            .map(|(_, definition)| definition)
            .collect())
    }

    async fn load_request(
        &self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<RequestDefinition, Error> {
        self.fetch_collection(collection_id)
            .await?
            .into_iter()
            .find(|(id, _)| id.as_deref() == Some(request_id))
            .map(|(_, definition)| definition)
            .ok_or_else(|| {
                warn!(collection_id, request_id, "request not found in collection");
                Error::RequestNotFound(request_id.into())
            })
    }
}

#[derive(Deserialize, Debug)]
struct CollectionEnvelope {
    collection: Collection,
}

#[derive(Deserialize, Debug)]
struct Collection {
    #[serde(default)]
    item: Vec<Item>,
}

#[derive(Deserialize, Debug)]
struct Item {
    id: Option<String>,
    #[serde(default)]
    name: String,
    request: Option<ItemRequest>,
    // folders nest further items
    #[serde(default)]
    item: Vec<Item>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ItemRequest {
    Url(String),
    Detailed(RequestDetails),
}

#[derive(Deserialize, Debug)]
struct RequestDetails {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    header: Vec<KeyValue>,
    url: Option<RequestUrl>,
    body: Option<RequestBody>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RequestUrl {
    Raw(String),
    Structured {
        raw: Option<String>,
        path: Option<UrlPath>,
        #[serde(default)]
        query: Vec<KeyValue>,
    },
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum UrlPath {
    Segments(Vec<String>),
    Joined(String),
}

#[derive(Deserialize, Debug)]
struct KeyValue {
    key: String,
    value: Option<String>,
    #[serde(default)]
    disabled: bool,
}

#[derive(Deserialize, Debug)]
struct RequestBody {
    raw: Option<String>,
}

fn default_method() -> String {
    String::from("GET")
}

fn parse_collection(text: &str) -> Result<Vec<(Option<String>, RequestDefinition)>, Error> {
    let envelope: CollectionEnvelope = serde_json::from_str(text)?;
    let mut definitions = Vec::new();
    flatten_items(envelope.collection.item, &mut definitions);

    Ok(definitions)
}

fn flatten_items(items: Vec<Item>, definitions: &mut Vec<(Option<String>, RequestDefinition)>) {
    for item in items {
        if let Some(request) = item.request {
            definitions.push((item.id, to_definition(item.name, request)));
        }
        flatten_items(item.item, definitions);
    }
}

fn to_definition(name: String, request: ItemRequest) -> RequestDefinition {
    let details = match request {
        ItemRequest::Url(raw) => return RequestDefinition::new(name, "GET", util::raw_url_path(&raw)),
        ItemRequest::Detailed(details) => details,
    };

    let (path, query) = match details.url {
        Some(RequestUrl::Raw(raw)) => (util::raw_url_path(&raw), Vec::new()),
        Some(RequestUrl::Structured { raw, path, query }) => {
            let path = match path {
                Some(UrlPath::Segments(segments)) => join_segments(&segments),
                Some(UrlPath::Joined(path)) => join_segments(&[path]),
                None => raw.as_deref().map(util::raw_url_path).unwrap_or_default(),
            };
            (path, query)
        }
        None => (String::new(), Vec::new()),
    };

    RequestDefinition {
        name,
        method: details.method,
        headers: to_map(details.header),
        query_params: to_map(query),
        path,
        body: details.body.and_then(|body| body.raw),
    }
}

fn join_segments(segments: &[String]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        joined
    } else {
        format!("/{}", joined)
    }
}

fn to_map(pairs: Vec<KeyValue>) -> IndexMap<String, String> {
    pairs
        .into_iter()
        .filter(|pair| !pair.disabled)
        .map(|pair| (pair.key, pair.value.unwrap_or_default()))
        .collect()
}
