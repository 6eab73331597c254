use crate::error::Error;
use indexmap::IndexMap;
use serde_json::Value;
use std::{collections::HashMap, fmt::Display, str::FromStr};

/// A request to replay against both services, as resolved from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefinition {
    pub name: String,
    pub method: String,
    pub headers: IndexMap<String, String>,
    pub query_params: IndexMap<String, String>,
    pub path: String,
    pub body: Option<String>,
}

impl RequestDefinition {
    /// Create a body-less definition with no headers or query parameters.
    pub fn new<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        name: S1,
        method: S2,
        path: S3,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            headers: IndexMap::new(),
            query_params: IndexMap::new(),
            path: path.into(),
            body: None,
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param<S1: Into<String>, S2: Into<String>>(
        mut self,
        name: S1,
        value: S2,
    ) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn http_method(&self) -> Result<HttpMethod, Error> {
        self.method.parse()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::UnsupportedMethod(s.into())),
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl ResponseRecord {
    /// Decode a raw response payload. Text that is not JSON is kept as a string tree.
    pub fn from_text<S: Into<String>>(
        status: u16,
        headers: HashMap<String, String>,
        text: S,
    ) -> Self {
        let text = text.into();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Self {
            status,
            headers,
            body,
        }
    }
}
