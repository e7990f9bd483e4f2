//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Only the authenticated-identity store lives here; feature screens keep
//! their own local signals and read identity through `session`.

pub mod session;
