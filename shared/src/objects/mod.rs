mod game_base;
mod physical_zone;
mod scene_object;
mod trigger;
mod trigger_data;
mod water_block;

pub use game_base::GameBase;
pub use physical_zone::PhysicalZone;
pub use scene_object::SceneObject;
pub use trigger::Trigger;
pub use trigger_data::TriggerData;
pub use water_block::{WaterBlock, WaterObject, WaterWave};
