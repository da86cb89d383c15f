// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the alarm service bridge.

use serde::{Deserialize, Serialize};

/// Default notification title ("Alarm").
pub const DEFAULT_TITLE: &str = "アラーム";
/// Default notification body ("The alarm is ringing").
pub const DEFAULT_BODY: &str = "アラームが鳴っています";
/// Default alarm label.
pub const DEFAULT_LABEL: &str = "アラーム";
/// Instruction shown on the backup notification of a launched alarm
/// ("Brighten the room to stop the alarm").
pub const ALARM_INSTRUCTION: &str = "部屋を明るくしてアラームを停止してください";

/// Identifier under which the single alarm notification lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub i32);

impl NotificationId {
    /// The fixed id reused for every alarm notification.
    pub const ALARM: NotificationId = NotificationId(1001);
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::ALARM
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arguments of a `showNotification` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    /// Dismiss the notification when the user taps it.
    pub auto_cancel: bool,
    /// Pin the notification so it cannot be swiped away.
    pub ongoing: bool,
}

impl Default for NotificationRequest {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            body: DEFAULT_BODY.into(),
            auto_cancel: true,
            ongoing: false,
        }
    }
}

/// Arguments of a `launchAlarm` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmLaunchRequest {
    pub alarm_id: i32,
    pub label: String,
}

impl Default for AlarmLaunchRequest {
    fn default() -> Self {
        Self {
            alarm_id: 0,
            label: DEFAULT_LABEL.into(),
        }
    }
}

impl AlarmLaunchRequest {
    /// The backup notification posted alongside the window raise.
    ///
    /// Never auto-cancelled and pinned, so it survives until the alarm is
    /// stopped from inside the app.
    pub fn backup_notification(&self) -> NotificationRequest {
        NotificationRequest {
            title: format!("🚨 {DEFAULT_TITLE}: {}", self.label),
            body: format!("{ALARM_INSTRUCTION}（{}）", self.label),
            auto_cancel: false,
            ongoing: true,
        }
    }
}

/// Importance levels of a notification channel (Android `IMPORTANCE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
}

impl Importance {
    /// Host constant value.
    pub fn as_android(self) -> i32 {
        match self {
            Importance::Min => 1,
            Importance::Low => 2,
            Importance::Default => 3,
            Importance::High => 4,
        }
    }
}

/// Notification priority for hosts without channels (Android `PRIORITY_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Default,
    High,
    Max,
}

impl Priority {
    pub fn as_android(self) -> i32 {
        match self {
            Priority::Low => -1,
            Priority::Default => 0,
            Priority::High => 1,
            Priority::Max => 2,
        }
    }
}

/// System category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Alarm,
}

impl Category {
    pub fn as_android(self) -> &'static str {
        match self {
            Category::Alarm => "alarm",
        }
    }
}

/// Bit set of activity-launch flags (Android `Intent.FLAG_ACTIVITY_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentFlags(pub i32);

impl IntentFlags {
    pub const NEW_TASK: IntentFlags = IntentFlags(0x1000_0000);
    pub const SINGLE_TOP: IntentFlags = IntentFlags(0x2000_0000);
    pub const CLEAR_TOP: IntentFlags = IntentFlags(0x0400_0000);
    pub const CLEAR_TASK: IntentFlags = IntentFlags(0x0000_8000);

    /// Raise the existing window or start fresh; never stack duplicates.
    pub const RAISE: IntentFlags =
        IntentFlags(Self::NEW_TASK.0 | Self::CLEAR_TOP.0 | Self::SINGLE_TOP.0);

    /// Relaunch target used by the notification tap action.
    pub const RELAUNCH: IntentFlags = IntentFlags(Self::NEW_TASK.0 | Self::CLEAR_TASK.0);

    pub fn contains(self, other: IntentFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Android `PendingIntent.FLAG_UPDATE_CURRENT | FLAG_IMMUTABLE`.
pub const PENDING_INTENT_FLAGS: i32 = 0x0800_0000 | 0x0400_0000;

/// A registered notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationChannelSpec {
    pub id: String,
    /// User-visible name in system settings.
    pub name: String,
    pub description: String,
    pub importance: Importance,
    /// Alarm audio is played by the app itself, so the channel is silent.
    pub sound_enabled: bool,
}

impl Default for NotificationChannelSpec {
    fn default() -> Self {
        Self {
            id: "alarm_channel".into(),
            name: "アラーム通知".into(),
            description: "アラームが鳴った時の通知".into(),
            importance: Importance::High,
            sound_enabled: false,
        }
    }
}

/// Fully resolved notification, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub id: NotificationId,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub category: Category,
    pub auto_cancel: bool,
    pub ongoing: bool,
    /// Flags of the intent fired when the notification is tapped.
    pub content_intent_flags: IntentFlags,
    /// Ask the host to show the window over the lock screen. Advisory.
    pub full_screen_intent: bool,
}

impl NotificationSpec {
    /// Build the alarm notification for `request` on `channel_id`.
    pub fn alarm(id: NotificationId, channel_id: &str, request: &NotificationRequest) -> Self {
        Self {
            id,
            channel_id: channel_id.to_owned(),
            title: request.title.clone(),
            body: request.body.clone(),
            priority: Priority::High,
            category: Category::Alarm,
            auto_cancel: request.auto_cancel,
            ongoing: request.ongoing,
            content_intent_flags: IntentFlags::RELAUNCH,
            full_screen_intent: true,
        }
    }
}
