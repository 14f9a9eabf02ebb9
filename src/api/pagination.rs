use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid page number")]
    InvalidPage,

    #[error("Invalid limit")]
    InvalidLimit,
}

/// A validated page/size pair. Both are at least 1 and the derived offset fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
    offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if limit < 1 {
            return Err(PaginationError::InvalidLimit);
        }

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or(PaginationError::InvalidPage)?;

        Ok(Self { page, limit, offset })
    }

    /// Parse raw query values. Absent or empty values take the defaults
    /// (page 1, limit 10); anything else must be an integer of at least 1.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let page = match page.filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| PaginationError::InvalidPage)?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit.filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| PaginationError::InvalidLimit)?,
            None => DEFAULT_LIMIT,
        };

        Self::new(page, limit)
    }

    pub fn page(&self) -> u64 {
        self.page as u64
    }

    pub fn limit(&self) -> u64 {
        self.limit as u64
    }

    /// `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        self.offset as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total items in the collection, not just this page.
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Response envelope for a page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(request: PageRequest, count: u64, result: Vec<T>) -> Self {
        Self {
            meta: PageMeta {
                count,
                limit: request.limit(),
                offset: request.offset(),
            },
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = PageRequest::parse(None, None).unwrap();
        assert_eq!((req.page(), req.limit(), req.offset()), (1, 10, 0));
        assert_eq!(req, PageRequest::default());
        assert_eq!(PageRequest::parse(Some(""), Some("")).unwrap(), req);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let req = PageRequest::parse(Some("3"), Some("10")).unwrap();
        assert_eq!(req.offset(), 20);
        assert_eq!(PageRequest::new(4, 7).unwrap().offset(), 21);
    }

    #[test]
    fn page_below_one_is_invalid() {
        assert_eq!(PageRequest::parse(Some("0"), None), Err(PaginationError::InvalidPage));
        assert_eq!(PageRequest::parse(Some("-1"), None), Err(PaginationError::InvalidPage));
    }

    #[test]
    fn non_numeric_values_are_invalid() {
        assert_eq!(PageRequest::parse(Some("two"), None), Err(PaginationError::InvalidPage));
        assert_eq!(PageRequest::parse(None, Some("1.5")), Err(PaginationError::InvalidLimit));
        assert_eq!(PageRequest::parse(None, Some("0")), Err(PaginationError::InvalidLimit));
    }

    #[test]
    fn overflowing_offset_is_invalid() {
        let huge = i64::MAX.to_string();
        assert_eq!(
            PageRequest::parse(Some(&huge), Some("10")),
            Err(PaginationError::InvalidPage)
        );
    }

    #[test]
    fn envelope_serializes_meta_and_result() {
        let page = PageResult::new(PageRequest::new(2, 5).unwrap(), 12, vec!["x"]);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["meta"]["count"], 12);
        assert_eq!(value["meta"]["limit"], 5);
        assert_eq!(value["meta"]["offset"], 5);
        assert_eq!(value["result"][0], "x");
    }
}
