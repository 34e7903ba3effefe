use serde::{Deserialize, Serialize};

/// Notification configuration for the module, stored as a singleton row and
/// read once per submission. Handed to the submission service as a value so
/// no component reads configuration from ambient state.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NotificationSettings {
    /// The address admin notifications are sent to.
    pub admin_email: String,

    /// Whether a copy of each registration email goes to the administrator.
    #[serde(default = "default_enable_admin_notifications")]
    pub enable_admin_notifications: bool,
}

fn default_enable_admin_notifications() -> bool {
    true
}

impl NotificationSettings {
    /// The defaults applied before an administrator has saved anything:
    /// notifications enabled, addressed to the site-wide email.
    pub fn site_default(site_email: &str) -> Self {
        NotificationSettings {
            admin_email: site_email.to_owned(),
            enable_admin_notifications: true,
        }
    }
}
