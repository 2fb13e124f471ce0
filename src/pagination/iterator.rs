//! Page iterator
//!
//! Walks a collection page by page, following `@odata.nextLink`, and feeds
//! every item to a callback.

use super::types::{CallbackResult, IterationSignal, IteratorState};
use crate::client::GraphClient;
use crate::error::{Error, Result};
use crate::http::RequestOptions;
use crate::response::{deserialize_entity, CollectionResponse, GraphResponse};
use crate::types::{JsonValue, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

type Callback<T> = Box<dyn FnMut(T) -> Result<IterationSignal> + Send>;

/// Resumable iterator over a paginated collection
///
/// Items are handed to the callback one at a time, in server order, as `T`.
/// With the default `T = JsonValue` the raw record is passed through; any
/// other `T` is deserialized from it first.
///
/// The callback decides what happens next, see [`CallbackResult`]. Note that
/// a callback returning `()` pauses after its first item: each `iterate()` or
/// `resume()` call then processes exactly one item.
///
/// An item that does not deserialize into `T` is returned as an error and
/// the cursor moves past it, so `resume()` continues with the next item and
/// the failed record is never handed to the callback.
///
/// Calls take `&mut self`, so only one page walk can be in flight at a time.
pub struct PageIterator<C, T = JsonValue> {
    client: C,
    collection: CollectionResponse,
    cursor: usize,
    callback: Callback<T>,
    request_options: Option<RequestOptions>,
    state: IteratorState,
    items_processed: u64,
    pages_fetched: u64,
}

impl<C, T> PageIterator<C, T>
where
    C: GraphClient,
    T: DeserializeOwned,
{
    /// Create an iterator from the first page of a collection
    ///
    /// Fails immediately with a client error if `response` has no `value`
    /// array.
    pub fn new<F, R>(client: C, response: GraphResponse, callback: F) -> Result<Self>
    where
        F: FnMut(T) -> R + Send + 'static,
        R: CallbackResult,
    {
        let collection = CollectionResponse::try_from(response)?;
        Ok(Self::from_collection(client, collection, callback))
    }

    /// Create an iterator from an already validated first page
    pub fn from_collection<F, R>(client: C, collection: CollectionResponse, mut callback: F) -> Self
    where
        F: FnMut(T) -> R + Send + 'static,
        R: CallbackResult,
    {
        Self {
            client,
            collection,
            cursor: 0,
            callback: Box::new(move |item| callback(item).into_signal()),
            request_options: None,
            state: IteratorState::Ready,
            items_processed: 0,
            pages_fetched: 0,
        }
    }

    /// Merge these options into every next-page request
    #[must_use]
    pub fn with_request_options(mut self, options: RequestOptions) -> Self {
        self.request_options = Some(options);
        self
    }

    /// Walk the collection until the callback pauses or the pages run out
    ///
    /// Returns `Ok(true)` once every page has been processed and `Ok(false)`
    /// when the callback paused. Called on a paused iterator it continues
    /// from where the pause happened; on a complete one it returns `Ok(true)`
    /// without any request.
    ///
    /// A failed next-page request returns that error unchanged. The iterator
    /// is then paused on the page it had, and `resume()` retries the request.
    pub async fn iterate(&mut self) -> Result<bool> {
        debug!("Starting page iteration at item {}", self.cursor);
        self.walk().await
    }

    /// Continue a paused iteration from the item after the pause
    ///
    /// Same contract as [`iterate`](Self::iterate).
    pub async fn resume(&mut self) -> Result<bool> {
        debug!("Resuming page iteration at item {}", self.cursor);
        self.walk().await
    }

    async fn walk(&mut self) -> Result<bool> {
        if self.state.is_complete() {
            return Ok(true);
        }
        self.state = IteratorState::Running;

        loop {
            match self.process_page() {
                Ok(IterationSignal::Continue) => {}
                Ok(IterationSignal::Pause) => {
                    self.state = IteratorState::Paused;
                    debug!(
                        "Iteration paused after {} items ({} pages fetched)",
                        self.items_processed, self.pages_fetched
                    );
                    return Ok(false);
                }
                Err(e) => {
                    self.state = IteratorState::Paused;
                    return Err(e);
                }
            }

            let Some(next_link) = self.collection.next_link().map(str::to_owned) else {
                self.state = IteratorState::Complete;
                debug!(
                    "Iteration complete: {} items, {} pages fetched",
                    self.items_processed, self.pages_fetched
                );
                return Ok(true);
            };

            match fetch_page(&self.client, self.request_options.as_ref(), &next_link).await {
                Ok(collection) => {
                    self.collection = collection;
                    self.cursor = 0;
                    self.pages_fetched += 1;
                }
                Err(e) => {
                    self.state = IteratorState::Paused;
                    return Err(e);
                }
            }
        }
    }

    /// Feed the rest of the current page to the callback
    ///
    /// Returns `Continue` when the page is exhausted.
    fn process_page(&mut self) -> Result<IterationSignal> {
        while let Some(raw) = self.collection.items().get(self.cursor) {
            let item = deserialize_entity::<T>(raw);
            self.cursor += 1;
            let item = item?;

            self.items_processed += 1;
            if (self.callback)(item)?.should_pause() {
                return Ok(IterationSignal::Pause);
            }
        }
        Ok(IterationSignal::Continue)
    }

    /// Replace the client's access token; later page requests use it
    pub fn set_access_token(&mut self, token: &str) -> &mut Self {
        self.client.set_access_token(token);
        self
    }
}

impl<C, T> PageIterator<C, T> {
    /// Check if every page has been processed
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Current lifecycle state
    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Index of the next item on the current page
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The page currently being processed
    pub fn collection(&self) -> &CollectionResponse {
        &self.collection
    }

    /// Next link of the current page
    pub fn next_link(&self) -> Option<&str> {
        self.collection.next_link()
    }

    /// Delta link of the current page
    pub fn delta_link(&self) -> Option<&str> {
        self.collection.delta_link()
    }

    /// Number of items handed to the callback so far
    pub fn items_processed(&self) -> u64 {
        self.items_processed
    }

    /// Number of pages fetched after the first
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// The client used for next-page requests
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C, T> std::fmt::Debug for PageIterator<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIterator")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("page_len", &self.collection.len())
            .field("next_link", &self.collection.next_link())
            .field("items_processed", &self.items_processed)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

async fn fetch_page<C: GraphClient>(
    client: &C,
    options: Option<&RequestOptions>,
    url: &str,
) -> Result<CollectionResponse> {
    let mut request = client.create_request(Method::GET, url);
    if let Some(options) = options {
        options.apply_to(&mut request);
    }

    let response = client.send(request).await?;
    if !response.is_success() {
        warn!("Next page request returned HTTP {}", response.status());
        return Err(Error::http_status(
            response.status(),
            response.raw_text().into_owned(),
        ));
    }

    let collection = CollectionResponse::try_from(response)?;
    debug!(
        "Fetched page: {} items, has next: {}",
        collection.len(),
        collection.has_next()
    );
    Ok(collection)
}
