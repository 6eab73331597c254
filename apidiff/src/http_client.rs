use crate::{
    error::{Error, Side},
    util, HttpMethod, RequestDefinition, ResponseRecord,
};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::fmt::Debug;

#[async_trait]
pub trait HttpClient: Debug {
    /// Execute `request` against `url`. Any status code is a successful response.
    async fn make_request(
        &self,
        side: Side,
        url: &str,
        method: HttpMethod,
        request: &RequestDefinition,
    ) -> Result<ResponseRecord, Error>;
}

#[derive(Debug, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn make_request(
        &self,
        side: Side,
        url: &str,
        method: HttpMethod,
        request: &RequestDefinition,
    ) -> Result<ResponseRecord, Error> {
        let mut headers = HeaderMap::new();
        util::put_headers(
            &mut headers,
            request
                .headers
                .iter()
                .filter(|(header_name, _)| !header_name.eq_ignore_ascii_case("host")),
        )?;

        let mut request_builder = self
            .client
            .request(method.into(), url)
            .headers(headers)
            .query(&request.query_params);

        if let Some(body) = &request.body {
            request_builder = request_builder.body(body.clone());
        }

        let response = request_builder
            .send()
            .await
            .map_err(Error::transport(side))?;

        let status = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let text = response.text().await.map_err(Error::transport(side))?;

        Ok(ResponseRecord::from_text(status, headers, text))
    }
}
