// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "auth.user.registered";
pub const ACCOUNT_CONFIRMED: &str = "auth.account.confirmed";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const RESET_REQUESTED: &str = "auth.reset.requested";
pub const RESET_COMPLETED: &str = "auth.reset.completed";
