//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render app chrome around the routed pages while reading
//! session state from the Leptos context provided by `app`.

pub mod app_header;
pub mod session_gate;
