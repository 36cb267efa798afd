//! Systems related to the game world.
mod chunk;
mod object;
mod spawn;
mod time;

pub use chunk::ChunkPlugin;
pub use object::ObjectPlugin;
pub use spawn::SpawnPlugin;
pub use time::TimePlugin;
