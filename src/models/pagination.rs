//! Paginated listing envelope.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=&per_page=` query for list endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100))]
    pub per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// One page of results plus navigation links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub links: Vec<Link>,
}

impl<T> Page<T> {
    /// Wrap `items` and add `prev`/`next` links rooted at `base_path`.
    pub fn new(items: Vec<T>, query: &ListQuery, total_items: u64, base_path: &str) -> Self {
        let total_pages = total_pages(total_items, query.per_page);
        let mut links = Vec::new();
        if query.page > 1 {
            links.push(Link::new(
                "prev",
                format!("{}?page={}&per_page={}", base_path, query.page - 1, query.per_page),
            ));
        }
        if u64::from(query.page) < total_pages {
            links.push(Link::new(
                "next",
                format!("{}?page={}&per_page={}", base_path, query.page + 1, query.per_page),
            ));
        }
        Self {
            items,
            page: query.page,
            per_page: query.per_page,
            total_items,
            total_pages,
            links,
        }
    }

    pub fn add_link(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        self.links.push(Link::new(rel, href));
    }
}

/// Number of pages needed for `total_items`, counting a partial last page.
pub fn total_pages(total_items: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(per_page))
}
