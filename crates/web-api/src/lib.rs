//! HTTP 边界：路由、状态与错误映射。

mod error;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::router;
pub use state::AppState;
