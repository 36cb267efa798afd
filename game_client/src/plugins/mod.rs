mod camera;
pub mod combat;
pub mod hotkeys;
pub mod interactions;
pub mod movement;
pub mod respawn;

pub use camera::CameraPlugin;
pub use hotkeys::HotkeyPlugin;
pub use movement::MovementPlugin;
