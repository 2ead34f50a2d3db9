//! Prefixed uuid-v4 id generation for every record kind.

use uuid::Uuid;

fn prefixed(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub fn error_id() -> String {
    prefixed("err")
}

pub fn session_id() -> String {
    prefixed("session")
}

pub fn notification_id() -> String {
    prefixed("ntf")
}

pub fn recovery_id() -> String {
    prefixed("rec")
}

pub fn snapshot_id() -> String {
    prefixed("snap")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = error_id();
        let b = error_id();
        assert!(a.starts_with("err_"));
        assert_ne!(a, b);
        assert!(notification_id().starts_with("ntf_"));
        assert!(snapshot_id().starts_with("snap_"));
    }
}
