//! https://docs.pipewire.org/group__pw__keys.html

pub(super) const PW_KEY_APP_NAME: &str = "application.name";
pub(super) const PW_KEY_APP_ID: &str = "application.id";
pub(super) const PW_KEY_APP_VERSION: &str = "application.version";
pub(super) const PW_KEY_APP_ICON: &str = "application.icon";
pub(super) const PW_KEY_APP_ICON_NAME: &str = "application.icon-name";
pub(super) const PW_KEY_APP_PROCESS_BINARY: &str = "application.process.binary";
pub(super) const PW_KEY_APP_PROCESS_ID: &str = "application.process.id";
