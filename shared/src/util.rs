/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque order ID: `ORD-` plus 8 uppercase hex characters.
///
/// Collision-free at restaurant scale; the store rejects duplicate inserts
/// anyway since order IDs are table keys.
pub fn order_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}", uuid[..8].to_uppercase())
}

/// Generate a unique notification event ID.
pub fn event_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_format() {
        let id = order_id();
        assert!(id.starts_with("ORD-"));
        assert_eq!(id.len(), 12);
        assert!(id[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
