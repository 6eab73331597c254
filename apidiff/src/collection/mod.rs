mod postman;

pub use postman::{PostmanCollectionStore, PostmanCollectionStoreBuilder};

use crate::{error::Error, RequestDefinition};
use async_trait::async_trait;
use std::fmt::Debug;

/// Source of the request definitions to replay.
#[async_trait]
pub trait CollectionStore: Debug {
    /// Every request in the collection, in collection order.
    async fn load_requests(&self, collection_id: &str) -> Result<Vec<RequestDefinition>, Error>;

    async fn load_request(
        &self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<RequestDefinition, Error>;
}
