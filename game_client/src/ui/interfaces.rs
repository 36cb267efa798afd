use super::InterfaceId;

pub const MENU_GAME: InterfaceId = InterfaceId(0x01);
pub const MENU_DEATH: InterfaceId = InterfaceId(0x02);
pub const MENU_DEBUG: InterfaceId = InterfaceId(0x03);

pub const MENU_INVENTORY: InterfaceId = InterfaceId(0x0A);
