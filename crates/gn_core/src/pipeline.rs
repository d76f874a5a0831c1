//! Search, section filter, date sort and pagination over the fetched list.
//!
//! Everything here is a pure projection: the source slice is never touched
//! and the same inputs always give the same page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Article;

pub const DEFAULT_PAGE_SIZE: usize = 16;

/// Section filter value that means "every section".
pub const ALL_SECTIONS: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Newest => write!(f, "newest"),
            SortKey::Oldest => write!(f, "oldest"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            other => Err(format!("Unknown sort order: {} (expected newest or oldest)", other)),
        }
    }
}

/// The user-controlled inputs of the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub sort: SortKey,
    section: Option<String>,
}

impl Query {
    pub fn new(search: impl Into<String>, sort: SortKey, section: Option<&str>) -> Self {
        let mut query = Self {
            search: search.into(),
            sort,
            section: None,
        };
        query.set_section(section);
        query
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Empty and `all` both clear the filter.
    pub fn set_section(&mut self, section: Option<&str>) {
        self.section = section
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL_SECTIONS))
            .map(str::to_string);
    }

    fn matches_search(&self, article: &Article) -> bool {
        self.search.is_empty()
            || article
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    fn matches_section(&self, article: &Article) -> bool {
        match &self.section {
            Some(section) => article.section.to_lowercase() == section.to_lowercase(),
            None => true,
        }
    }
}

/// Filtered and sorted view of `source`, before pagination.
pub fn filter_and_sort<'a>(source: &'a [Article], query: &Query) -> Vec<&'a Article> {
    let mut view: Vec<&Article> = source
        .iter()
        .filter(|article| query.matches_search(article))
        .filter(|article| query.matches_section(article))
        .collect();

    // sort_by is stable, equal dates keep their source order
    match query.sort {
        SortKey::Newest => view.sort_by(|a, b| b.published_at.chronological(&a.published_at)),
        SortKey::Oldest => view.sort_by(|a, b| a.published_at.chronological(&b.published_at)),
    }
    view
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a 1-based page number into the valid range.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of the projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<'a> {
    pub items: Vec<&'a Article>,
    /// 1-based, already clamped.
    pub page: usize,
    pub total_pages: usize,
    /// Number of articles that passed both filters.
    pub matched: usize,
}

impl<'a> Projection<'a> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages
    }
}

pub fn project<'a>(
    source: &'a [Article],
    query: &Query,
    page: usize,
    page_size: usize,
) -> Projection<'a> {
    let view = filter_and_sort(source, query);
    let matched = view.len();
    let total_pages = total_pages(matched, page_size);
    let page = clamp_page(page, total_pages);

    let start = (page - 1).saturating_mul(page_size).min(matched);
    let end = start.saturating_add(page_size).min(matched);
    let items = view[start..end].to_vec();

    Projection {
        items,
        page,
        total_pages,
        matched,
    }
}

/// Query plus current page. Every query change goes back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    query: Query,
    page: usize,
    page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: Query::default(),
            page: 1,
            page_size,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
        self.page = 1;
    }

    pub fn set_section(&mut self, section: Option<&str>) {
        self.query.set_section(section);
        self.page = 1;
    }

    /// Projection clamps out-of-range pages, so any value is accepted here.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn project<'a>(&self, source: &'a [Article]) -> Projection<'a> {
        project(source, &self.query, self.page, self.page_size)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
