pub mod prober;

pub use prober::{AmenityCategory, AmenityProber};
