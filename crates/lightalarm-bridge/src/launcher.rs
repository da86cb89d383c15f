// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Activity launcher: raises the main window and fires the alarm screen.

use std::sync::Arc;

use lightalarm_core::error::Result;
use lightalarm_core::types::{AlarmLaunchRequest, IntentFlags};
use tracing::{info, warn};

use crate::notifications::NotificationManager;
use crate::traits::{NativeNotifications, NativeWindow};

/// Brings the application's main window to the foreground.
pub struct ActivityLauncher<B: ?Sized> {
    bridge: Arc<B>,
}

impl<B: NativeWindow + ?Sized> ActivityLauncher<B> {
    pub fn new(bridge: Arc<B>) -> Self {
        Self { bridge }
    }

    /// Raise the existing main window, or start it if there is none.
    /// Never stacks a second instance.
    pub fn bring_to_foreground(&self) -> Result<()> {
        self.bridge.start_main_activity(IntentFlags::RAISE)?;
        info!("main window raised");
        Ok(())
    }

    /// Raise the window and post the pinned alarm notification.
    ///
    /// The host may refuse a background activity start; the notification
    /// (with its full-screen intent) is the fallback, so a failed raise is
    /// only logged.
    pub fn launch_alarm_screen(
        &self,
        notifications: &NotificationManager<B>,
        request: &AlarmLaunchRequest,
    ) -> Result<()>
    where
        B: NativeNotifications,
    {
        info!(alarm_id = request.alarm_id, label = %request.label, "launching alarm screen");

        if let Err(e) = self.bring_to_foreground() {
            warn!(alarm_id = request.alarm_id, error = %e, "window raise refused; relying on notification");
        }

        notifications.show(&request.backup_notification())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBridge;
    use lightalarm_core::config::BridgeConfig;
    use lightalarm_core::error::AlarmBridgeError;
    use lightalarm_core::types::NotificationId;

    fn setup() -> (
        Arc<StubBridge>,
        ActivityLauncher<StubBridge>,
        NotificationManager<StubBridge>,
    ) {
        let stub = Arc::new(StubBridge::new());
        let launcher = ActivityLauncher::new(Arc::clone(&stub));
        let notifications = NotificationManager::new(Arc::clone(&stub), &BridgeConfig::default());
        (stub, launcher, notifications)
    }

    #[test]
    fn bring_to_foreground_uses_raise_flags() {
        let (stub, launcher, _) = setup();
        launcher.bring_to_foreground().unwrap();
        assert_eq!(stub.launches(), vec![IntentFlags::RAISE]);
    }

    #[test]
    fn launch_alarm_raises_and_notifies() {
        let (stub, launcher, notifications) = setup();
        let request = AlarmLaunchRequest {
            alarm_id: 7,
            label: "Wake up".into(),
        };
        launcher.launch_alarm_screen(&notifications, &request).unwrap();

        assert_eq!(stub.launches(), vec![IntentFlags::RAISE]);
        let posted = stub.notification(NotificationId::ALARM).unwrap();
        assert!(posted.body.contains("Wake up"));
        assert!(!posted.auto_cancel);
        assert!(posted.ongoing);
    }

    #[test]
    fn blocked_raise_still_posts_backup_notification() {
        let (stub, launcher, notifications) = setup();
        stub.set_activity_starts_blocked(true);
        launcher
            .launch_alarm_screen(&notifications, &AlarmLaunchRequest::default())
            .unwrap();
        assert!(stub.task().is_empty());
        assert_eq!(stub.notification_count(), 1);
    }

    #[test]
    fn denied_backup_notification_is_reported() {
        let (stub, launcher, notifications) = setup();
        stub.set_notifications_denied(true);
        let err = launcher
            .launch_alarm_screen(&notifications, &AlarmLaunchRequest::default())
            .unwrap_err();
        assert!(matches!(err, AlarmBridgeError::PermissionDenied));
        assert_eq!(stub.task().len(), 1);
    }
}
