pub mod api_response;
pub mod item;
pub mod page;

pub use api_response::ApiResponse;
pub use item::{CreateItemRequest, Item};
pub use page::{PageInfo, PageResponse};
