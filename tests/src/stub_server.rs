use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, HeaderMap, Request, Response, Server,
};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query as received.
    pub uri: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn text<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync;

/// HTTP server on an ephemeral local port answering with a fixed handler.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let handler: Arc<Handler> = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let make_service = make_service_fn(move |_| {
            let handler = handler.clone();
            let recorded = recorded.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |request| {
                    let handler = handler.clone();
                    let recorded = recorded.clone();

                    async move {
                        let request = read_request(request).await;
                        let stub = handler(&request);
                        recorded.lock().unwrap().push(request);

                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(stub.status)
                                .body(Body::from(stub.body))
                                .unwrap(),
                        )
                    }
                }))
            }
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
        let addr = server.local_addr();
        let (shutdown, stopped) = oneshot::channel::<()>();

        tokio::spawn(server.with_graceful_shutdown(async move {
            stopped.await.ok();
        }));

        Self {
            addr,
            requests,
            shutdown: Some(shutdown),
        }
    }

    /// Always answers with `status` and the JSON `body`.
    pub fn respond_json(status: u16, body: serde_json::Value) -> Self {
        let response = StubResponse::json(status, body);
        Self::start(move |_| response.clone())
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A base URL on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}", addr)
}

async fn read_request(request: Request<Body>) -> RecordedRequest {
    let method = request.method().to_string();
    let uri = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string());
    let headers = extract_headers(request.headers());
    let body = body::to_bytes(request.into_body()).await.unwrap_or_default();

    RecordedRequest {
        method,
        uri,
        headers,
        body: String::from_utf8_lossy(&body).into(),
    }
}

fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    header_map
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect()
}
