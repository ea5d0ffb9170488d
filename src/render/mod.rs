pub mod rasterizer;
pub mod snapshot;

pub use rasterizer::{Rasterizer, SvgRasterizer};
pub use snapshot::DesignSnapshot;
