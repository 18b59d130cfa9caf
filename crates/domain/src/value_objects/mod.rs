//! Value Objects - Immutable, identity-less domain primitives

pub mod point;
pub mod polyline;
mod position;
mod product;
mod style;

pub use point::{FIXED_POINT_SCALE, Point, from_fixed_point, to_fixed_point};
pub use position::Position;
pub use product::{Product, ProductSet};
pub use style::{Shape, Style};
