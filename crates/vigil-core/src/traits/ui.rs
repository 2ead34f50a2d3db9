//! UI capability: create/attach/remove transient notification elements
//! in a host element tree. Element lifetime is driven by the caller via
//! expiry deadlines; `remove` must tolerate unknown ids.

use crate::errors::NotifyError;
use crate::models::NotificationRecord;

pub trait UiHost {
    /// Attach a transient element for the notification, returning the
    /// element id used for later removal.
    fn attach(&self, notification: &NotificationRecord) -> Result<String, NotifyError>;

    /// Remove a previously attached element. Unknown ids are a no-op.
    fn remove(&self, element_id: &str);
}
