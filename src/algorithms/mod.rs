pub mod animal_zones;
pub mod clearing;
pub mod crossing;
pub mod decoration;
pub mod params;
pub mod spawn_points;
pub mod terrain;
pub mod water;

pub use params::GenerationParams;
