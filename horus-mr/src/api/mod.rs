//! HTTP API handlers for horus-mr

pub mod fallback;
pub mod health;
pub mod records;
pub mod response;
pub mod root;

pub use fallback::{handle_panic, method_not_allowed, route_not_found};
pub use health::health_check;
pub use records::{create_record, get_record, list_records, record_routes};
pub use root::{service_descriptor, ENDPOINTS};
