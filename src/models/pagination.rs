use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Page size used by the dashboard tables when none is given.
pub const DEFAULT_LIMIT: u32 = 5;
/// The largest page a caller may ask for.
pub const MAX_LIMIT: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request, clamping `page` to at least 1 and `limit` to `1..=MAX_LIMIT`.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.page, self.limit)
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.limit as u64
    }

    /// `page` and `limit` as query parameters.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

/// The `{data, count, page, limit}` envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Total number of matching records.
    pub count: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            count: 0,
            page: request.page,
            limit: request.limit,
        }
    }

    /// Number of pages needed to show `count` records.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.count.div_ceil(self.limit as u64)
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages()
    }

    /// Checks the envelope invariants.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::InvalidResponse("page must be at least 1".to_string()));
        }
        if self.data.len() > self.limit as usize {
            return Err(AppError::InvalidResponse(format!(
                "page holds {} records but limit is {}",
                self.data.len(),
                self.limit
            )));
        }
        if self.data.len() as u64 > self.count {
            return Err(AppError::InvalidResponse(format!(
                "page holds {} records but count is {}",
                self.data.len(),
                self.count
            )));
        }
        Ok(())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            limit: self.limit,
        }
    }
}

impl<T: Clone> Paginated<T> {
    /// Cuts the page `[offset, offset + limit)` out of the full filtered set.
    pub fn from_slice(items: &[T], request: PageRequest) -> Self {
        let request = request.normalized();
        let start = (request.offset() as usize).min(items.len());
        let end = (start + request.limit as usize).min(items.len());
        Self {
            data: items[start..end].to_vec(),
            count: items.len() as u64,
            page: request.page,
            limit: request.limit,
        }
    }
}

impl<T> Paginated<T> {
    /// Like `from_slice`, taking ownership of the full set.
    pub fn from_vec(items: Vec<T>, request: PageRequest) -> Self {
        let request = request.normalized();
        let count = items.len() as u64;
        let data = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit as usize)
            .collect();
        Self {
            data,
            count,
            page: request.page,
            limit: request.limit,
        }
    }
}

/// A list envelope as the backend sends it. Some endpoints omit `page` and
/// `limit`, and a few omit `count`.
#[derive(Debug, Deserialize)]
pub struct RawPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> RawPage<T> {
    /// Fills the missing fields from `request` and checks the invariants.
    ///
    /// An envelope without `page` and `limit` whose `count` is absent or
    /// matches its length holds the full set; the requested page is always
    /// cut out of it here.
    pub fn into_paginated(self, request: PageRequest) -> Result<Paginated<T>> {
        let request = request.normalized();
        let unpaged = self.page.is_none() && self.limit.is_none();
        let full_set = self
            .count
            .is_none_or(|count| count == self.data.len() as u64);
        if unpaged && full_set {
            return Ok(Paginated::from_vec(self.data, request));
        }

        let count = self.count.unwrap_or(self.data.len() as u64);
        let page = Paginated {
            page: self.page.unwrap_or(request.page),
            limit: self.limit.unwrap_or(request.limit),
            count,
            data: self.data,
        };
        page.validate()?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_page_of_twelve_holds_two() {
        let items: Vec<u32> = (1..=12).collect();
        let page = Paginated::from_slice(&items, PageRequest::new(3, 5));
        assert_eq!(page.data, vec![11, 12]);
        assert_eq!(page.count, 12);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        page.validate().unwrap();
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=12).collect();
        let page = Paginated::from_slice(&items, PageRequest::new(9, 5));
        assert!(page.data.is_empty());
        assert_eq!(page.count, 12);
    }

    #[test]
    fn request_is_clamped() {
        let request = PageRequest::new(0, 1000);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_LIMIT);
        assert_eq!(PageRequest::new(3, 5).offset(), 10);
    }

    #[test]
    fn oversized_page_is_rejected() {
        let page = Paginated {
            data: vec![1, 2, 3],
            count: 3,
            page: 1,
            limit: 2,
        };
        assert!(matches!(page.validate(), Err(AppError::InvalidResponse(_))));
    }

    #[test]
    fn raw_page_without_paging_fields_takes_them_from_request() {
        let raw: RawPage<u32> = sonic_rs::from_str(r#"{"data":[1,2],"count":7}"#).unwrap();
        let page = raw.into_paginated(PageRequest::new(2, 5)).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 5);
        assert_eq!(page.count, 7);
    }

    #[test]
    fn small_unpaged_set_is_empty_past_its_first_page() {
        let raw: RawPage<u32> = sonic_rs::from_str(r#"{"data":[1,2,3,4],"count":4}"#).unwrap();
        let page = raw.into_paginated(PageRequest::new(2, 5)).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.page, 2);
        assert_eq!(page.count, 4);

        let raw: RawPage<u32> = sonic_rs::from_str(r#"{"data":[1,2,3,4]}"#).unwrap();
        let first = raw.into_paginated(PageRequest::new(1, 5)).unwrap();
        assert_eq!(first.data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unpaged_full_set_is_sliced_locally() {
        let raw: RawPage<u32> =
            sonic_rs::from_str(r#"{"data":[1,2,3,4,5,6,7,8,9,10,11,12]}"#).unwrap();
        let page = raw.into_paginated(PageRequest::new(3, 5)).unwrap();
        assert_eq!(page.data, vec![11, 12]);
        assert_eq!(page.count, 12);
    }
}
