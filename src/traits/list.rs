//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::TgitClient;
use crate::error::Result;
use crate::pagination::{Page, Paginated};

/// Default page size for [`List::list_all`].
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use tgit::{List, ListProjectsOptions, ProjectItem, TgitClient};
///
/// let client = TgitClient::from_env()?;
///
/// // Fetch a single page
/// let page = ProjectItem::list_page(&client, &ListProjectsOptions::default()).await?;
///
/// // Fetch all pages
/// let all_projects = ProjectItem::list_all(&client, &ListProjectsOptions::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters, including the paging parameters.
    type Query: Paginated + Clone + Send + Sync;

    /// List entities matching the query (single page).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(client: &TgitClient, query: &Self::Query) -> Result<Page<Self>>;

    /// List all entities matching the query, following `X-Next-Page`.
    ///
    /// Starts at page 1. When the query sets no page size,
    /// [`DEFAULT_PAGE_SIZE`] is used.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &TgitClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut query = query.clone();
        {
            let options = query.list_options_mut();
            options.page = Some(1);
            options.per_page.get_or_insert(DEFAULT_PAGE_SIZE);
        }

        let mut all_items = Vec::new();
        let mut fetched = 0;

        loop {
            let page = Self::list_page(client, &query).await?;
            let next = page.next_page();
            all_items.extend(page.items);
            fetched += 1;

            let Some(next) = next else {
                break;
            };

            // Safety limit to prevent infinite loops
            if fetched >= MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
            query.list_options_mut().page = Some(next);
        }

        Ok(all_items)
    }
}
