//! Request outcome pipeline.
//!
//! Handlers never fail with business errors. They push notifications into a
//! request-scoped [`Notifier`], carry the payload's [`StructuralOutcome`], and
//! finish with [`shape`], which turns those inputs into exactly one
//! [`Outcome`].

pub mod notifier;
pub mod payload;
pub mod shaper;
pub mod structural;

pub use notifier::{Notification, Notifier};
pub use payload::Payload;
pub use shaper::{FORBIDDEN_MESSAGE, NOT_FOUND_MESSAGE, Outcome, shape, shape_empty};
pub use structural::StructuralOutcome;
