//! HTTP handlers, grouped per resource.

pub mod completion;
pub mod question;
pub mod room;
pub mod round;
pub mod session;
