use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[allow(dead_code)]
impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }

    pub fn err(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

/// Page envelope shared by every list endpoint. An empty page is a valid
/// result, never an error.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_items: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };
        Self {
            current_page: page,
            total_pages,
            total_items,
            items,
        }
    }
}

/// Expanded reference to a related row: just enough to display it.
#[derive(Debug, Serialize, ToSchema)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    /// Requested page, clamped to >= 1.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size, clamped to >= 1.
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_basic() {
        let resp = PaginatedResponse::<String>::new(vec![], 100, 1, 10);
        assert_eq!(resp.total_pages, 10);
    }

    #[test]
    fn total_pages_with_remainder() {
        let resp = PaginatedResponse::<String>::new(vec![], 101, 1, 10);
        assert_eq!(resp.total_pages, 11);
    }

    #[test]
    fn total_pages_exact_division() {
        let resp = PaginatedResponse::<String>::new(vec![], 30, 2, 10);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.current_page, 2);
    }

    #[test]
    fn total_pages_zero_total() {
        let resp = PaginatedResponse::<String>::new(vec![], 0, 3, 10);
        assert_eq!(resp.total_pages, 0);
        assert_eq!(resp.current_page, 3);
        assert!(resp.items.is_empty());
    }

    #[test]
    fn total_pages_single_item() {
        let resp = PaginatedResponse::<String>::new(vec![], 1, 1, 10);
        assert_eq!(resp.total_pages, 1);
    }

    #[test]
    fn pagination_defaults() {
        let q = PaginationQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn pagination_clamps_below_one() {
        let q = PaginationQuery {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 1);
    }
}
