//! Systems related to the game world.
mod chunk;
mod level;
mod object;
mod spawn;
mod terrain;
mod time;

pub use chunk::ChunkPlugin;
pub use level::LevelPlugin;
pub use object::ObjectPlugin;
pub use spawn::SpawnPlugin;
pub use terrain::TerrainPlugin;
pub use time::TimePlugin;
