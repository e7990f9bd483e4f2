//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its form state and calls into `session` for the action;
//! navigation after an action is the page's job, route protection is not.

pub mod home;
pub mod login;
pub mod register;
