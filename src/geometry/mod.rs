pub mod distance;
pub mod normalize;
pub mod simplify;

pub use distance::{great_circle_m, within_radius};
pub use normalize::representative_coordinate;
pub use simplify::simplify_boundary;
