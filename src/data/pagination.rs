use serde::{Serialize, Serializer};

use crate::Document;

/// Number of pages in a page-mode result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    Finite(u64),
    /// A zero limit divides the total by zero.
    Unbounded,
}

impl PageCount {
    /// `ceil(total / limit)`, never less than one page for a non-zero limit.
    pub fn compute(total: u64, limit: u64) -> Self {
        if limit == 0 {
            return PageCount::Unbounded;
        }
        PageCount::Finite(total.div_ceil(limit).max(1))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, PageCount::Unbounded)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            PageCount::Finite(pages) => *pages as f64,
            PageCount::Unbounded => f64::INFINITY,
        }
    }
}

impl PartialEq<u64> for PageCount {
    fn eq(&self, other: &u64) -> bool {
        matches!(self, PageCount::Finite(pages) if pages == other)
    }
}

impl Serialize for PageCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageCount::Finite(pages) => serializer.serialize_u64(*pages),
            PageCount::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

/// One page of a paginated query.
///
/// `offset` is present in offset mode, `page` and `pages` in page mode. A call
/// that names neither mode gets all three.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub docs: Vec<Document>,
    pub total: u64,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageCount>,
}

impl PageResult {
    pub fn new(docs: Vec<Document>, total: u64, limit: u64, window: &Window) -> Self {
        PageResult {
            docs,
            total,
            limit,
            offset: window.offset,
            page: window.page,
            pages: window.page.map(|_| PageCount::compute(total, limit)),
        }
    }
}

/// Where a page starts, and how the caller asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub offset: Option<u64>,
    pub page: Option<u64>,
}

impl Window {
    /// Offset wins over page; with neither the window starts at offset 0, page 1.
    ///
    /// Page 0 is treated like page 1 for the skip computation.
    pub fn resolve(offset: Option<u64>, page: Option<u64>, limit: u64) -> Self {
        match (offset, page) {
            (Some(offset), _) => Window {
                skip: offset,
                offset: Some(offset),
                page: None,
            },
            (None, Some(page)) => Window {
                skip: page.saturating_sub(1).saturating_mul(limit),
                offset: None,
                page: Some(page),
            },
            (None, None) => Window {
                skip: 0,
                offset: Some(0),
                page: Some(1),
            },
        }
    }
}
