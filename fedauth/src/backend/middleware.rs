//! Middleware that appends the backend API key to every request.

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Adds `key=<api key>` to the query string of outgoing requests.
pub struct ApiKeyMiddleware {
    api_key: Option<String>,
}

impl ApiKeyMiddleware {
    /// Create a new API key middleware. `None` leaves requests untouched.
    #[must_use]
    pub const fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl Middleware for ApiKeyMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if let Some(key) = self.api_key.as_deref() {
            req.url_mut().query_pairs_mut().append_pair("key", key);
        }

        next.run(req, extensions).await
    }
}
