//! Geometric fits used by the classifier and the target selector.
//!
//! - Minimum enclosing circle (incremental Welzl, no shuffling so results are
//!   reproducible).
//! - Direct least-squares ellipse fit (Fitzgibbon et al., 1999).
//! - Minimum-area oriented rectangle.
//! - Closed-polygon Douglas-Peucker approximation.

mod circle;
mod ellipse;
mod polygon;
mod rect;

pub use circle::{Circle, min_enclosing_circle};
pub use ellipse::{Ellipse, fit_ellipse};
pub use polygon::approximate_closed_polygon;
pub use rect::min_area_rect;
