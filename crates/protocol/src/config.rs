use std::time::Duration;

/// Process-wide defaults, loaded once at startup and passed explicitly to the
/// controller. Per-invocation payload fields override individual settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexConfig {
    /// Network timeout applied to every cursor and bulk-write request.
    pub request_timeout: Duration,
    /// Cursor time-to-live requested from the source cluster, e.g. "5m".
    pub default_scroll: String,
    /// Documents fetched per cursor advance.
    pub default_page_size: u32,
    /// Documents per bulk-write request against the target.
    pub default_chunk_size: usize,
    /// Run the next step in-process instead of dispatching it asynchronously.
    pub inline_dispatch: bool,
}

impl Default for ReindexConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            default_scroll: "5m".to_string(),
            default_page_size: 500,
            default_chunk_size: 500,
            inline_dispatch: false,
        }
    }
}

impl ReindexConfig {
    /// Sets the network timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the default cursor time-to-live.
    #[must_use]
    pub fn with_default_scroll(mut self, scroll: impl Into<String>) -> Self {
        self.default_scroll = scroll.into();
        self
    }

    /// Sets the default page size.
    #[must_use]
    pub const fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Sets the default bulk-write chunk size.
    #[must_use]
    pub const fn with_default_chunk_size(mut self, size: usize) -> Self {
        self.default_chunk_size = size;
        self
    }

    /// Forces the synchronous in-process dispatch strategy.
    #[must_use]
    pub const fn with_inline_dispatch(mut self, inline: bool) -> Self {
        self.inline_dispatch = inline;
        self
    }
}
