//! Enrollment Fee Grant (EFG) portal views.
//!
//! The crate evaluates a student's free tuition eligibility from the Banner
//! extensibility endpoints, derives the academic-year label for a term, and
//! builds the view state rendered by the self-service and staff review pages.
//! The `widgets` module carries the adapters for the vendor identity widgets.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
pub mod widgets;
