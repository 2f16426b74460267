//! Paginated list state.
//!
//! [`ListView`] is the synchronous state machine behind every admin table:
//! it owns the page cursor and the currently displayed [`PageResult`], and
//! hands out a [`FetchTicket`] for each change that needs data. Tickets carry
//! a sequence number; only the completion of the most recently issued ticket
//! is applied, so responses that arrive out of order never overwrite newer
//! data.
//!
//! [`ListController`] pairs a view with a [`PageSource`] for async callers.
//!
//! # Example
//!
//! ```ignore
//! let controller = ListController::new(doctor_service, 10);
//! controller.reload().await;
//! controller.set_filter("search", "cardio").await; // back to page 1
//! controller.after_mutation(Mutation::Deleted).await; // may step back a page
//! ```

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use medadmin_core::{ApiError, Filters, PageCursor, PageRequest, PageResult};
use tracing::{debug, warn};

/// A fetch the caller must perform and report back through [`ListView::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    pub seq: u64,
    pub request: PageRequest,
}

/// Whether a completion was applied or discarded as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Kind of change made to the underlying collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct ListView<T> {
    cursor: PageCursor,
    result: Option<PageResult<T>>,
    // request behind `result`, and the one the latest ticket carries
    shown: Option<PageRequest>,
    pending: Option<PageRequest>,
    loading: bool,
    last_error: Option<ApiError>,
    issued: u64,
}

impl<T> ListView<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: PageCursor::new(page_size),
            result: None,
            shown: None,
            pending: None,
            loading: false,
            last_error: None,
            issued: 0,
        }
    }

    /// Starts with `filters` applied.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        *self.cursor.filters_mut() = filters;
        self
    }

    /// Starts on `page` instead of page 1.
    #[must_use]
    pub fn at_page(mut self, page: u32) -> Self {
        self.cursor.set_page(page);
        self
    }

    /// The request the next fetch will use.
    pub fn request(&self) -> &PageRequest {
        self.cursor.request()
    }

    pub fn page(&self) -> u32 {
        self.cursor.request().page()
    }

    pub fn page_size(&self) -> u32 {
        self.cursor.request().page_size()
    }

    /// The last successfully applied page.
    pub fn result(&self) -> Option<&PageResult<T>> {
        self.result.as_ref()
    }

    pub fn items(&self) -> &[T] {
        self.result.as_ref().map(|r| r.items.as_slice()).unwrap_or(&[])
    }

    pub fn total_count(&self) -> u64 {
        self.result.as_ref().map(|r| r.total_count).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u64 {
        self.result.as_ref().map(PageResult::total_pages).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error from the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        let request = self.cursor.request().clone();
        self.pending = Some(request.clone());
        FetchTicket {
            seq: self.issued,
            request,
        }
    }

    /// Refetches the current page.
    pub fn reload(&mut self) -> FetchTicket {
        self.issue()
    }

    pub fn go_to_page(&mut self, page: u32) -> FetchTicket {
        self.cursor.set_page(page);
        self.issue()
    }

    /// `None` when the cursor is on the last known page.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let page = u64::from(self.page());
        let has_next = self.result.as_ref().is_some_and(|r| page < r.total_pages());
        has_next.then(|| {
            let next = self.page().saturating_add(1);
            self.go_to_page(next)
        })
    }

    /// `None` on the first page.
    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        (self.page() > 1).then(|| {
            let prev = self.page() - 1;
            self.go_to_page(prev)
        })
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> FetchTicket {
        self.cursor.set_page_size(page_size);
        self.cursor.set_page(1);
        self.issue()
    }

    /// Sets one filter (a blank value clears it) and returns to page 1.
    pub fn set_filter(&mut self, field: &str, value: &str) -> FetchTicket {
        self.cursor.filters_mut().set(field, value);
        self.cursor.set_page(1);
        self.issue()
    }

    /// Clears every filter and returns to page 1.
    pub fn clear_filters(&mut self) -> FetchTicket {
        self.cursor.filters_mut().clear();
        self.cursor.set_page(1);
        self.issue()
    }

    /// Refetch after a create, update or delete.
    ///
    /// After a delete that emptied the displayed page (at most one row was
    /// shown) the view steps back one page, unless it is already on page 1.
    pub fn after_mutation(&mut self, mutation: Mutation) -> FetchTicket {
        if mutation == Mutation::Deleted && self.items().len() <= 1 && self.page() > 1 {
            let prev = self.page() - 1;
            debug!(from = self.page(), to = prev, "Last row on page deleted, stepping back");
            self.cursor.set_page(prev);
        }
        self.issue()
    }

    /// Applies the completion of ticket `seq`.
    ///
    /// Only the latest ticket's completion is applied. A failure keeps the
    /// previously displayed page, moves the cursor back to it and records
    /// the error.
    pub fn apply(&mut self, seq: u64, outcome: Result<PageResult<T>, ApiError>) -> Applied {
        if seq != self.issued {
            debug!(seq, latest = self.issued, "Discarding superseded page response");
            return Applied::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.shown = self.pending.take();
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, page = self.page(), "Failed to load page, keeping previous rows");
                self.pending = None;
                if let Some(shown) = &self.shown {
                    self.cursor.reset(shown.clone());
                }
                self.last_error = Some(e);
            }
        }
        Applied::Current
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new(medadmin_core::DEFAULT_PAGE_SIZE)
    }
}

/// Anything that can produce one page of `T`.
pub trait PageSource<T>: Send + Sync {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<PageResult<T>, ApiError>> + Send;
}

/// A [`ListView`] driven by a [`PageSource`].
///
/// Methods take `&self`, so overlapping fetches may be in flight at once;
/// the view's sequence numbers decide which one is shown.
pub struct ListController<T, S> {
    source: S,
    view: Mutex<ListView<T>>,
}

impl<T, S> ListController<T, S>
where
    T: Clone + Send,
    S: PageSource<T>,
{
    pub fn new(source: S, page_size: u32) -> Self {
        Self::with_view_state(source, ListView::new(page_size))
    }

    pub fn with_view_state(source: S, view: ListView<T>) -> Self {
        Self {
            source,
            view: Mutex::new(view),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, ListView<T>> {
        self.view
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reads the current view.
    pub fn with_view<R>(&self, f: impl FnOnce(&ListView<T>) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> ListView<T> {
        self.lock().clone()
    }

    /// Issues a ticket against the view without fetching it.
    pub fn issue(&self, f: impl FnOnce(&mut ListView<T>) -> FetchTicket) -> FetchTicket {
        f(&mut self.lock())
    }

    /// Fetches `ticket` and applies its outcome.
    pub async fn run(&self, ticket: FetchTicket) -> Applied {
        let outcome = self.source.fetch_page(&ticket.request).await;
        self.lock().apply(ticket.seq, outcome)
    }

    pub async fn reload(&self) -> Applied {
        let ticket = self.issue(ListView::reload);
        self.run(ticket).await
    }

    pub async fn go_to_page(&self, page: u32) -> Applied {
        let ticket = self.issue(|view| view.go_to_page(page));
        self.run(ticket).await
    }

    pub async fn next_page(&self) -> Option<Applied> {
        let ticket = self.lock().next_page()?;
        Some(self.run(ticket).await)
    }

    pub async fn prev_page(&self) -> Option<Applied> {
        let ticket = self.lock().prev_page()?;
        Some(self.run(ticket).await)
    }

    pub async fn set_page_size(&self, page_size: u32) -> Applied {
        let ticket = self.issue(|view| view.set_page_size(page_size));
        self.run(ticket).await
    }

    pub async fn set_filter(&self, field: &str, value: &str) -> Applied {
        let ticket = self.issue(|view| view.set_filter(field, value));
        self.run(ticket).await
    }

    pub async fn clear_filters(&self) -> Applied {
        let ticket = self.issue(ListView::clear_filters);
        self.run(ticket).await
    }

    pub async fn after_mutation(&self, mutation: Mutation) -> Applied {
        let ticket = self.issue(|view| view.after_mutation(mutation));
        self.run(ticket).await
    }
}
