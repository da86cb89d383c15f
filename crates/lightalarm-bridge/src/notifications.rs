// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Alarm notification manager.
//
// Owns the fixed notification channel and the single alarm notification id.
// Every post reuses that id, so at most one alarm notification is ever live.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lightalarm_core::config::{BridgeConfig, PermissionDenialPolicy};
use lightalarm_core::error::{AlarmBridgeError, Result};
use lightalarm_core::types::{
    NotificationChannelSpec, NotificationId, NotificationRequest, NotificationSpec,
};
use tracing::{debug, info, warn};

use crate::traits::NativeNotifications;

/// Posts and cancels the alarm notification through a platform bridge.
pub struct NotificationManager<B: ?Sized> {
    bridge: Arc<B>,
    channel: NotificationChannelSpec,
    notification_id: NotificationId,
    permission_denial: PermissionDenialPolicy,
    channel_ready: AtomicBool,
}

impl<B: NativeNotifications + ?Sized> NotificationManager<B> {
    pub fn new(bridge: Arc<B>, config: &BridgeConfig) -> Self {
        Self {
            bridge,
            channel: config.notification_channel.clone(),
            notification_id: config.notification_id,
            permission_denial: config.permission_denial,
            channel_ready: AtomicBool::new(false),
        }
    }

    /// Register the alarm channel if the host needs one. Safe to call
    /// repeatedly; only the first successful call reaches the host.
    pub fn ensure_channel(&self) -> Result<()> {
        if self.channel_ready.load(Ordering::Acquire) {
            return Ok(());
        }
        if !self.bridge.requires_notification_channel() {
            debug!("host does not use notification channels");
            self.channel_ready.store(true, Ordering::Release);
            return Ok(());
        }

        self.bridge.create_notification_channel(&self.channel)?;
        self.channel_ready.store(true, Ordering::Release);
        info!(
            channel = %self.channel.id,
            importance = ?self.channel.importance,
            sound = self.channel.sound_enabled,
            "notification channel registered"
        );
        Ok(())
    }

    /// Post the alarm notification, replacing any previous one.
    pub fn show(&self, request: &NotificationRequest) -> Result<()> {
        self.ensure_channel()?;

        let spec = NotificationSpec::alarm(self.notification_id, &self.channel.id, request);
        match self.bridge.post_notification(&spec) {
            Ok(()) => {
                info!(
                    id = %spec.id,
                    title = %spec.title,
                    auto_cancel = spec.auto_cancel,
                    ongoing = spec.ongoing,
                    "alarm notification posted"
                );
                Ok(())
            }
            Err(AlarmBridgeError::PermissionDenied) => {
                warn!(id = %spec.id, "notification permission denied; nothing posted");
                match self.permission_denial {
                    PermissionDenialPolicy::Report => Err(AlarmBridgeError::PermissionDenied),
                    PermissionDenialPolicy::Swallow => Ok(()),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the alarm notification. No-op when none is posted.
    pub fn cancel(&self) -> Result<()> {
        self.bridge.cancel_notification(self.notification_id)?;
        info!(id = %self.notification_id, "alarm notification cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBridge;

    fn manager(stub: &Arc<StubBridge>, config: &BridgeConfig) -> NotificationManager<StubBridge> {
        NotificationManager::new(Arc::clone(stub), config)
    }

    #[test]
    fn ensure_channel_registers_once() {
        let stub = Arc::new(StubBridge::new());
        let notifications = manager(&stub, &BridgeConfig::default());
        notifications.ensure_channel().unwrap();
        notifications.ensure_channel().unwrap();
        notifications.show(&NotificationRequest::default()).unwrap();
        assert_eq!(stub.channel_registrations(), 1);
        let channel = stub.channel("alarm_channel").unwrap();
        assert!(!channel.sound_enabled);
    }

    #[test]
    fn legacy_host_skips_channel() {
        let stub = Arc::new(StubBridge::legacy());
        let notifications = manager(&stub, &BridgeConfig::default());
        notifications.show(&NotificationRequest::default()).unwrap();
        assert_eq!(stub.channel_registrations(), 0);
        assert_eq!(stub.notification_count(), 1);
    }

    #[test]
    fn show_posts_under_fixed_id() {
        let stub = Arc::new(StubBridge::new());
        let notifications = manager(&stub, &BridgeConfig::default());
        notifications
            .show(&NotificationRequest {
                title: "Morning".into(),
                ..Default::default()
            })
            .unwrap();
        let posted = stub.notification(NotificationId(1001)).unwrap();
        assert_eq!(posted.title, "Morning");
        assert_eq!(posted.channel_id, "alarm_channel");
        assert!(posted.full_screen_intent);
    }

    #[test]
    fn cancel_without_notification_is_noop() {
        let stub = Arc::new(StubBridge::new());
        let notifications = manager(&stub, &BridgeConfig::default());
        notifications.cancel().unwrap();
        assert_eq!(stub.notification_count(), 0);
    }

    #[test]
    fn permission_denial_is_reported_by_default() {
        let stub = Arc::new(StubBridge::new());
        stub.set_notifications_denied(true);
        let notifications = manager(&stub, &BridgeConfig::default());
        let err = notifications.show(&NotificationRequest::default()).unwrap_err();
        assert!(matches!(err, AlarmBridgeError::PermissionDenied));
    }

    #[test]
    fn permission_denial_can_be_swallowed() {
        let stub = Arc::new(StubBridge::new());
        stub.set_notifications_denied(true);
        let config = BridgeConfig {
            permission_denial: PermissionDenialPolicy::Swallow,
            ..Default::default()
        };
        let notifications = manager(&stub, &config);
        notifications.show(&NotificationRequest::default()).unwrap();
        assert_eq!(stub.notification_count(), 0);
    }
}
