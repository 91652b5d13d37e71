/// Port for desktop notifications.
pub trait NotificationPort: Send + Sync {
    /// Whether the platform allows showing notifications.
    fn is_permitted(&self) -> bool {
        true
    }

    /// Shows a notification.
    fn send(&self, title: &str, body: &str);
}

#[cfg(test)]
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct MockNotificationPort {
        pub notifications: Arc<Mutex<Vec<(String, String)>>>,
        pub denied: bool,
    }

    impl MockNotificationPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn denied() -> Self {
            Self {
                denied: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.notifications.lock().unwrap().clone()
        }
    }

    impl NotificationPort for MockNotificationPort {
        fn is_permitted(&self) -> bool {
            !self.denied
        }

        fn send(&self, title: &str, body: &str) {
            self.notifications
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }
}
