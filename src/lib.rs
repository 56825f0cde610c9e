pub mod converter;
pub mod error;
pub mod geometry;
pub mod index;
pub mod input;
pub mod osm;

pub use converter::*;
pub use error::*;
pub use geometry::*;
pub use index::*;
pub use input::*;
pub use osm::*;
