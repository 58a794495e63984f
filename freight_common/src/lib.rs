mod geo;
mod helpers;
mod money;
mod secret;

pub use geo::{Coordinate, Point, RouteOption};
pub use helpers::{is_blank, parse_boolean_flag};
pub use money::Money;
pub use secret::Secret;
