use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{ErrorCode, GlobalException, GlobalResult};

/// Pagination metadata for one page of a query result.
///
/// Pages are zero-based. The navigation flags are computed once when the value
/// is built and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    page: i32,
    size: i32,
    total_elements: i64,
    total_pages: i32,
    number_of_elements: i32,
    first: bool,
    last: bool,
    has_next: bool,
    has_previous: bool,
    empty: bool,
}

impl PageInfo {
    /// Build page metadata, rejecting the first invalid argument.
    ///
    /// An empty result (`total_pages == 0`) is its own last page.
    pub fn of(
        page: i32,
        size: i32,
        total_elements: i64,
        total_pages: i32,
        number_of_elements: i32,
    ) -> GlobalResult<Self> {
        if page < 0 {
            return Err(GlobalException::new(ErrorCode::InvalidPageNumber));
        }
        if size <= 0 {
            return Err(GlobalException::new(ErrorCode::InvalidPageSize));
        }
        if total_elements < 0 {
            return Err(GlobalException::new(ErrorCode::InvalidTotalElements));
        }
        if total_pages < 0 {
            return Err(GlobalException::new(ErrorCode::InvalidTotalPages));
        }

        Ok(Self {
            page,
            size,
            total_elements,
            total_pages,
            number_of_elements,
            first: page == 0,
            last: page == total_pages - 1 || total_pages == 0,
            has_next: page < total_pages - 1,
            has_previous: page > 0,
            empty: number_of_elements == 0,
        })
    }

    /// Build page metadata, deriving the page count from the element total.
    pub fn from_totals(
        page: i32,
        size: i32,
        total_elements: i64,
        number_of_elements: i32,
    ) -> GlobalResult<Self> {
        if page < 0 {
            return Err(GlobalException::new(ErrorCode::InvalidPageNumber));
        }
        if size <= 0 {
            return Err(GlobalException::new(ErrorCode::InvalidPageSize));
        }
        if total_elements < 0 {
            return Err(GlobalException::new(ErrorCode::InvalidTotalElements));
        }

        let size_wide = i64::from(size);
        let total_pages = total_elements / size_wide + i64::from(total_elements % size_wide != 0);
        let total_pages = i32::try_from(total_pages).map_err(|e| {
            GlobalException::with_cause(ErrorCode::InvalidTotalPages, e)
        })?;

        Self::of(page, size, total_elements, total_pages, number_of_elements)
    }

    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn total_elements(&self) -> i64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> i32 {
        self.total_pages
    }

    pub fn number_of_elements(&self) -> i32 {
        self.number_of_elements
    }

    pub fn is_first(&self) -> bool {
        self.first
    }

    pub fn is_last(&self) -> bool {
        self.last
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// One page of results together with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    content: Vec<T>,
    page_info: PageInfo,
}

impl<T> PageResponse<T> {
    /// Missing content is an empty page; missing metadata is an error.
    pub fn of(content: Option<Vec<T>>, page_info: Option<PageInfo>) -> GlobalResult<Self> {
        let page_info = page_info.ok_or_else(|| GlobalException::new(ErrorCode::PageInfoNull))?;

        Ok(Self::new(content.unwrap_or_default(), page_info))
    }

    pub fn new(content: Vec<T>, page_info: PageInfo) -> Self {
        Self { content, page_info }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.content, self.page_info)
    }
}
