// Authentication layer - cookie bridge middleware
pub mod cookie_bridge;

pub use cookie_bridge::CookieJwtBridge;
