mod middleware;
mod public;

pub use middleware::{HTTP_RESPONSES_TOTAL, REQUEST_ID_HEADER, RequestContext};
pub use public::{HttpState, build_router};
