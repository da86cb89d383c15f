// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native capabilities the alarm
// service needs.

use lightalarm_core::error::Result;
use lightalarm_core::types::{
    IntentFlags, NotificationChannelSpec, NotificationId, NotificationSpec,
};

/// Unified bridge that groups all native capabilities.
///
/// One implementation exists per host platform. Implementations are shared
/// between the notification manager and the activity launcher, so they must
/// be usable from any thread.
pub trait PlatformBridge: NativeNotifications + NativeWindow + Send + Sync {
    /// Human-readable platform name (e.g. "Android 14").
    fn platform_name(&self) -> &str;
}

/// Post and cancel notifications through the OS notification service.
pub trait NativeNotifications {
    /// Whether notification channels must be registered before posting
    /// (Android 8.0 / API 26 and later).
    fn requires_notification_channel(&self) -> bool;

    /// Register (or update) a notification channel. Idempotent on the host.
    fn create_notification_channel(&self, channel: &NotificationChannelSpec) -> Result<()>;

    /// Post `notification`, replacing any notification with the same id.
    ///
    /// Returns `AlarmBridgeError::PermissionDenied` when the host refuses.
    fn post_notification(&self, notification: &NotificationSpec) -> Result<()>;

    /// Remove the notification with `id`. No-op if none is posted.
    fn cancel_notification(&self, id: NotificationId) -> Result<()>;
}

/// Control the application's main window.
pub trait NativeWindow {
    /// Start (or raise) the main activity with the given launch flags.
    fn start_main_activity(&self, flags: IntentFlags) -> Result<()>;
}
