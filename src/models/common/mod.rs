pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo};
pub use response::ApiResponse;
