//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// `?page=&perPage=` query parameters shared by every list endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page, capped at 100
    #[serde(default = "default_per_page", alias = "per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Page number, never below 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Wrap one page of `data` fetched with `params` out of `total` rows.
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        Self {
            data,
            meta: PaginationMeta {
                page: params.page(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }

    /// Convert every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let params = PaginationParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_limit_is_clamped() {
        let huge = PaginationParams {
            page: 0,
            per_page: 10_000,
        };
        assert_eq!(huge.limit(), MAX_PAGE_SIZE);
        assert_eq!(huge.offset(), 0);

        let zero = PaginationParams {
            page: 1,
            per_page: 0,
        };
        assert_eq!(zero.limit(), 1);
    }

    #[test]
    fn test_meta_total_pages() {
        let page = Paginated::new(vec![1, 2, 3], &PaginationParams::default(), 41);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.per_page, 20);
    }

    #[test]
    fn test_query_accepts_camel_case_and_snake_case() {
        let camel: PaginationParams = serde_json::from_str(r#"{"page":2,"perPage":5}"#).unwrap();
        let snake: PaginationParams = serde_json::from_str(r#"{"per_page":7}"#).unwrap();
        assert_eq!(camel.per_page, 5);
        assert_eq!(snake.per_page, 7);
        assert_eq!(snake.page, 1);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let page = Paginated::new(Vec::<u8>::new(), &PaginationParams::default(), 0);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["meta"]["totalPages"], 0);
        assert_eq!(json["meta"]["perPage"], 20);
    }
}
