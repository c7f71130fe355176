//! Aggregation of paged list responses.
//!
//! List endpoints answer with
//!
//! ```json
//! { "paging": { "pages": 3 }, "data": [ ... ] }
//! ```
//!
//! [`PageAggregator`] takes the first page, replays the request once for
//! every remaining page with a `page` query argument, and concatenates the
//! `data` arrays in page order.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::http::ApiClient;
use crate::models::{Params, Response};
use crate::Result;

/// Query argument carrying the requested page number.
pub const PAGE_ARG: &str = "page";

/// Something that can re-send its last request with extra query arguments.
pub trait RepeatRequest {
    /// Replay the last request with `extra_args` merged into its query.
    fn repeat_last_request(&mut self, extra_args: Params) -> Result<Response>;
}

impl RepeatRequest for ApiClient {
    fn repeat_last_request(&mut self, extra_args: Params) -> Result<Response> {
        ApiClient::repeat_last_request(self, extra_args)
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PagingInfo {
    /// Total number of pages.
    ///
    /// Accepted as a number or a numeric string; anything else counts as 0.
    #[serde(default, deserialize_with = "lenient_page_count")]
    pub pages: u32,
}

#[derive(Debug, Default, Deserialize)]
struct PageBody {
    paging: Option<PagingInfo>,
    #[serde(default)]
    data: Value,
}

impl PageBody {
    /// Parse a page; an empty body is a page without data.
    fn parse(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(body)?)
    }
}

fn lenient_page_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(count.map_or(0, |c| u32::try_from(c).unwrap_or(u32::MAX)))
}

/// Progress of a [`PageAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// No response processed yet.
    Start,
    /// Pages after the current one remain.
    HasMore,
    /// Aggregation is complete.
    Done,
}

/// Collects every page of a paged response into one result.
///
/// Pages are fetched one after another on the calling thread. The page
/// count of the first response is trusted: trailing pages are fetched up
/// to it even when they come back empty. An error on any page aborts the
/// aggregation and the pages collected so far are dropped.
///
/// # Example
///
/// ```no_run
/// use mpapi_client::{ApiClient, Method, PageAggregator, Params};
///
/// # fn example() -> mpapi_client::Result<()> {
/// let mut client = ApiClient::new("test_4f0c2a")?;
/// let first = client.send_request("orders", Method::GET, Params::new(), Params::new())?;
/// let orders = PageAggregator::collect(&mut client, &first)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PageAggregator {
    state: PageState,
    current_page: u32,
    total_pages: u32,
    paged: bool,
    raw: Value,
    items: Vec<Value>,
}

impl PageAggregator {
    /// Create an aggregator in the [`PageState::Start`] state.
    pub fn new() -> Self {
        Self {
            state: PageState::Start,
            current_page: 1,
            total_pages: 1,
            paged: false,
            raw: Value::Null,
            items: Vec::new(),
        }
    }

    /// Collect all pages starting from `first`.
    ///
    /// Returns the `data` field unchanged when `first` carries no paging
    /// metadata, otherwise a JSON array with the items of every page.
    pub fn collect<C: RepeatRequest + ?Sized>(client: &mut C, first: &Response) -> Result<Value> {
        let mut aggregator = Self::new();
        aggregator.start(first)?;
        aggregator.run(client)
    }

    /// Collect all pages and deserialize the result.
    pub fn collect_into<T, C>(client: &mut C, first: &Response) -> Result<T>
    where
        T: DeserializeOwned,
        C: RepeatRequest + ?Sized,
    {
        let value = Self::collect(client, first)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Process the first response.
    pub fn start(&mut self, first: &Response) -> Result<()> {
        let body = PageBody::parse(&first.body)?;

        match body.paging {
            Some(paging) => {
                self.paged = true;
                self.total_pages = paging.pages;
                append_page(&mut self.items, body.data);
                self.state = if self.total_pages > 1 {
                    PageState::HasMore
                } else {
                    PageState::Done
                };
            }
            None => {
                self.raw = body.data;
                self.state = PageState::Done;
            }
        }

        tracing::debug!(
            paged = self.paged,
            total_pages = self.total_pages,
            "processed first page"
        );
        Ok(())
    }

    /// Fetch the next page.
    ///
    /// Does nothing unless the state is [`PageState::HasMore`].
    pub fn next_page<C: RepeatRequest + ?Sized>(&mut self, client: &mut C) -> Result<()> {
        if self.state != PageState::HasMore {
            return Ok(());
        }

        self.current_page += 1;
        let response =
            client.repeat_last_request(Params::new().with(PAGE_ARG, self.current_page))?;
        let body = PageBody::parse(&response.body)?;

        let before = self.items.len();
        append_page(&mut self.items, body.data);
        if self.items.len() == before {
            tracing::debug!(page = self.current_page, "received empty page");
        }

        if self.current_page >= self.total_pages {
            self.state = PageState::Done;
        }
        Ok(())
    }

    /// Fetch every remaining page and return the result.
    pub fn run<C: RepeatRequest + ?Sized>(mut self, client: &mut C) -> Result<Value> {
        while self.state == PageState::HasMore {
            self.next_page(client)?;
        }
        Ok(self.into_result())
    }

    /// Current state.
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Last page processed (1-based).
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page count reported by the first response.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns `true` if the first response carried paging metadata.
    pub fn is_paged(&self) -> bool {
        self.paged
    }

    /// The result collected so far.
    pub fn into_result(self) -> Value {
        if self.paged {
            Value::Array(self.items)
        } else {
            self.raw
        }
    }
}

impl Default for PageAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn append_page(items: &mut Vec<Value>, data: Value) {
    match data {
        Value::Array(page) => items.extend(page),
        Value::Null => {}
        record => items.push(record),
    }
}
