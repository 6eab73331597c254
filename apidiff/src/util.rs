use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

lazy_static! {
    static ref LOCALHOST_REGEX: Regex =
        Regex::new(r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.\-]*://)localhost(?P<rest>[:/?#].*)?$")
            .unwrap();
    static ref RAW_URL_PATH_REGEX: Regex =
        Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.\-]*://)?[^/?#]*(?P<path>/[^?#]*)?").unwrap();
}

pub const DOCKER_HOST: &str = "host.docker.internal";

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // it currently ignores header values with opaque characters
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}

/// Append a request path to a base URL without doubling or dropping the slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) if !path.is_empty() => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Point a `localhost` base URL at the container host instead.
pub fn rewrite_docker_host(url: &str) -> String {
    match LOCALHOST_REGEX.captures(url) {
        Some(captures) => format!(
            "{}{}{}",
            &captures["scheme"],
            DOCKER_HOST,
            captures.name("rest").map_or("", |rest| rest.as_str())
        ),
        None => url.to_string(),
    }
}

/// The path component of a raw URL such as `{{baseUrl}}/users/1?active=true`.
pub fn raw_url_path(raw: &str) -> String {
    RAW_URL_PATH_REGEX
        .captures(raw.trim())
        .and_then(|captures| captures.name("path"))
        .map_or_else(String::new, |path| path.as_str().to_string())
}
