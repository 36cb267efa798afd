mod container;
mod object;
mod physics;
mod transform;
mod visibility;
mod weapon;

pub use container::ContainerBundle;
pub use object::ObjectBundle;
pub use physics::PhysicsBundle;
pub use transform::TransformBundle;
pub use visibility::VisibilityBundle;
pub use weapon::WeaponBundle;
