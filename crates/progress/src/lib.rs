//! Reading progress estimation.
//!
//! Turns a book's checkpoint history into a reading speed and a projected
//! completion time. Estimation is a pure function of the book and the
//! current instant; it never touches storage.

#![warn(missing_docs)]

pub mod estimator;

pub use estimator::{estimate, CompletionEstimator, Estimation, ProjectionPoint, SPEED_FLOOR};
