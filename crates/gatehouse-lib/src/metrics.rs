// ==============
// crates/gatehouse-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_SUCCESS: &str = "auth.success";
pub const AUTH_REJECTED: &str = "auth.rejected";
pub const USER_PROVISIONED: &str = "user.provisioned";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_DESTROYED: &str = "session.destroyed";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
