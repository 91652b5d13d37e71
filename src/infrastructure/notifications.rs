//! Desktop notifications with conditional compilation.

use crate::domain::ports::NotificationPort;

const APP_NAME: &str = "Postwatch";

/// Desktop notification service.
#[cfg(feature = "notify")]
mod notify_impl {
    use super::*;
    use notify_rust::Notification;

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotificationService;

    impl DesktopNotificationService {
        #[must_use]
        pub fn new() -> Self {
            Self
        }
    }

    fn show(title: &str, body: &str) {
        if let Err(e) = Notification::new()
            .summary(title)
            .body(body)
            .appname(APP_NAME)
            .show()
        {
            tracing::warn!("Failed to show notification: {}", e);
        }
    }

    impl NotificationPort for DesktopNotificationService {
        fn send(&self, title: &str, body: &str) {
            let title = title.to_string();
            let body = body.to_string();

            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn_blocking(move || show(&title, &body));
                }
                Err(_) => show(&title, &body),
            }
        }
    }
}

/// Stub notification service when notify feature is disabled.
#[cfg(not(feature = "notify"))]
mod stub_impl {
    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotificationService;

    impl DesktopNotificationService {
        #[must_use]
        pub fn new() -> Self {
            Self
        }
    }

    impl NotificationPort for DesktopNotificationService {
        fn is_permitted(&self) -> bool {
            false
        }

        fn send(&self, _title: &str, _body: &str) {
            tracing::debug!(app = APP_NAME, "Desktop notifications not compiled in");
        }
    }
}

#[cfg(feature = "notify")]
pub use notify_impl::DesktopNotificationService;
#[cfg(not(feature = "notify"))]
pub use stub_impl::DesktopNotificationService;
