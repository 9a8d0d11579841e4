//! Returning to the filtered transactions list after editing or deleting a transaction.

use serde::Deserialize;

use crate::endpoints;

/// The query parameters for pages and endpoints that send the user back to
/// the page they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

impl RedirectQuery {
    pub fn new(redirect_url: &str) -> Self {
        Self {
            redirect_url: Some(redirect_url.to_owned()),
        }
    }

    /// The URL to go to next.
    ///
    /// Only URLs within the transactions list are followed, anything else
    /// falls back to the unfiltered list.
    pub fn target(&self) -> &str {
        match self.redirect_url.as_deref() {
            Some(url) if is_transactions_url(url) => url,
            Some(url) => {
                tracing::warn!("ignoring redirect to \"{url}\"");
                endpoints::TRANSACTIONS_VIEW
            }
            None => endpoints::TRANSACTIONS_VIEW,
        }
    }

    /// Append this query to `url`.
    pub fn append_to(&self, url: &str) -> String {
        let Some(redirect_url) = self.redirect_url.as_deref() else {
            return url.to_owned();
        };

        match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
            Ok(query) => format!("{url}?{query}"),
            Err(error) => {
                tracing::warn!("could not encode redirect URL {redirect_url}: {error}");
                url.to_owned()
            }
        }
    }
}

fn is_transactions_url(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or_default();

    path == endpoints::TRANSACTIONS_VIEW
}
