//! Page requests for single-page listing calls.
//!
//! Every `list_*` operation on [`GitService`](super::GitService) returns
//! exactly one page. [`PageRequest`] validates the caller's paging input
//! before any I/O; [`collect_pages`] is an opt-in helper for callers that
//! really want to walk several pages.

use std::future::Future;

use super::error::GitServiceError;
use super::provider::Provider;

/// Default page number (1-based).
pub const DEFAULT_PAGE: u32 = 1;
/// Default number of items per page.
pub const DEFAULT_PER_PAGE: u8 = 30;
/// Largest page size both providers accept.
pub const MAX_PER_PAGE: u8 = 100;

/// Validated page position.
///
/// # Example
///
/// ```
/// use forgelink::forge::pagination::PageRequest;
/// use forgelink::forge::Provider;
///
/// let page = PageRequest::resolve(Provider::Gitea, Some(2), None)
///     .expect("page 2 is valid");
/// assert_eq!(page.page(), 2);
/// assert_eq!(page.per_page(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u8,
}

impl PageRequest {
    /// Applies defaults and validates the page position.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::InvalidRequest`] when `page` is zero or
    /// `per_page` falls outside `1..=100`.
    pub fn resolve(
        provider: Provider,
        page: Option<u32>,
        per_page: Option<u8>,
    ) -> Result<Self, GitServiceError> {
        let resolved_page = page.unwrap_or(DEFAULT_PAGE);
        let resolved_per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        if resolved_page == 0 {
            return Err(invalid(provider, "page must be at least 1"));
        }
        if resolved_per_page == 0 {
            return Err(invalid(provider, "per_page must be at least 1"));
        }
        if resolved_per_page > MAX_PER_PAGE {
            return Err(invalid(provider, "per_page must not exceed 100"));
        }

        Ok(Self {
            page: resolved_page,
            per_page: resolved_per_page,
        })
    }

    /// Returns the page number (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the request for the following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn invalid(provider: Provider, message: &str) -> GitServiceError {
    GitServiceError::InvalidRequest {
        provider,
        message: message.to_owned(),
    }
}

/// Walks pages starting at `first` until an empty page or `max_pages`.
///
/// The closure is called with each page request in turn; results are
/// concatenated in order. Only an empty page ends the walk: some Gitea
/// listings are filtered after fetching, so a short page may still have
/// more pages behind it.
///
/// # Errors
///
/// Propagates the first error returned by `fetch`.
pub async fn collect_pages<T, F, Fut>(
    first: PageRequest,
    max_pages: u32,
    mut fetch: F,
) -> Result<Vec<T>, GitServiceError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>, GitServiceError>>,
{
    let mut collected = Vec::new();
    let mut request = first;

    for _ in 0..max_pages {
        let items = fetch(request).await?;
        if items.is_empty() {
            break;
        }
        collected.extend(items);
        request = request.next();
    }

    Ok(collected)
}
