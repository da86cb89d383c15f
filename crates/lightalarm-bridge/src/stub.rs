// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Instead of failing, the stub keeps an in-memory model of the host: a
// notification registry keyed by id and a single task stack that honours the
// activity-launch flags. Tests drive the alarm service against it.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use lightalarm_core::error::{AlarmBridgeError, Result};
use lightalarm_core::types::{
    IntentFlags, NotificationChannelSpec, NotificationId, NotificationSpec,
};

use crate::traits::*;

/// Component name used for the app's main window in the simulated task.
pub const MAIN_ACTIVITY: &str = "MainActivity";

/// Number of recent activity starts kept for inspection.
pub const LAUNCH_HISTORY: usize = 32;

/// One activity instance in the simulated task stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub component: String,
    /// Monotonic instance number; a new number means a new window.
    pub instance: u32,
    /// Times this instance received a new intent instead of being recreated.
    pub new_intents: u32,
}

#[derive(Debug, Default)]
struct StubState {
    channels: BTreeMap<String, NotificationChannelSpec>,
    channel_registrations: usize,
    notifications: BTreeMap<NotificationId, NotificationSpec>,
    task: Vec<ActivityRecord>,
    launches: VecDeque<IntentFlags>,
    next_instance: u32,
}

impl StubState {
    fn new_record(&mut self, component: &str) -> ActivityRecord {
        self.next_instance += 1;
        ActivityRecord {
            component: component.to_owned(),
            instance: self.next_instance,
            new_intents: 0,
        }
    }
}

/// In-memory bridge returned on non-mobile platforms.
#[derive(Debug)]
pub struct StubBridge {
    state: Mutex<StubState>,
    requires_channel: bool,
    deny_notifications: AtomicBool,
    deny_activity_starts: AtomicBool,
}

impl Default for StubBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl StubBridge {
    /// A host that requires notification channels (API 26+ behaviour).
    pub fn new() -> Self {
        Self::with_channel_support(true)
    }

    /// A host that predates notification channels.
    pub fn legacy() -> Self {
        Self::with_channel_support(false)
    }

    fn with_channel_support(requires_channel: bool) -> Self {
        Self {
            state: Mutex::new(StubState::default()),
            requires_channel,
            deny_notifications: AtomicBool::new(false),
            deny_activity_starts: AtomicBool::new(false),
        }
    }

    /// Simulate the user revoking (or granting) the notification permission.
    pub fn set_notifications_denied(&self, denied: bool) {
        self.deny_notifications.store(denied, Ordering::SeqCst);
    }

    /// Simulate the host blocking background activity starts.
    pub fn set_activity_starts_blocked(&self, blocked: bool) {
        self.deny_activity_starts.store(blocked, Ordering::SeqCst);
    }

    /// Put another activity on top of the task, e.g. a settings screen.
    pub fn push_activity(&self, component: &str) {
        let mut state = self.inspect();
        let record = state.new_record(component);
        state.task.push(record);
    }

    /// Currently posted notification with `id`.
    pub fn notification(&self, id: NotificationId) -> Option<NotificationSpec> {
        self.inspect().notifications.get(&id).cloned()
    }

    /// Number of posted notifications.
    pub fn notification_count(&self) -> usize {
        self.inspect().notifications.len()
    }

    /// Registered channel with `id`.
    pub fn channel(&self, id: &str) -> Option<NotificationChannelSpec> {
        self.inspect().channels.get(id).cloned()
    }

    /// How many times a channel registration reached the host.
    pub fn channel_registrations(&self) -> usize {
        self.inspect().channel_registrations
    }

    /// Snapshot of the task stack, bottom first.
    pub fn task(&self) -> Vec<ActivityRecord> {
        self.inspect().task.clone()
    }

    /// Flags of the most recent accepted activity starts (at most
    /// [`LAUNCH_HISTORY`]), oldest first.
    pub fn launches(&self) -> Vec<IntentFlags> {
        self.inspect().launches.iter().copied().collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StubState>> {
        self.state
            .lock()
            .map_err(|_| AlarmBridgeError::Bridge("stub state lock poisoned".into()))
    }

    // Inspection helpers stay usable after a panicking test poisoned the lock.
    fn inspect(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeNotifications for StubBridge {
    fn requires_notification_channel(&self) -> bool {
        self.requires_channel
    }

    fn create_notification_channel(&self, channel: &NotificationChannelSpec) -> Result<()> {
        let mut state = self.lock()?;
        state.channel_registrations += 1;
        state.channels.insert(channel.id.clone(), channel.clone());
        tracing::debug!(channel = %channel.id, "stub: notification channel registered");
        Ok(())
    }

    fn post_notification(&self, notification: &NotificationSpec) -> Result<()> {
        if self.deny_notifications.load(Ordering::SeqCst) {
            return Err(AlarmBridgeError::PermissionDenied);
        }
        let mut state = self.lock()?;
        if self.requires_channel && !state.channels.contains_key(&notification.channel_id) {
            // Android drops notifications posted to unknown channels.
            return Err(AlarmBridgeError::Bridge(format!(
                "no notification channel `{}`",
                notification.channel_id
            )));
        }
        state.notifications.insert(notification.id, notification.clone());
        tracing::debug!(id = %notification.id, title = %notification.title, "stub: notification posted");
        Ok(())
    }

    fn cancel_notification(&self, id: NotificationId) -> Result<()> {
        let removed = self.lock()?.notifications.remove(&id).is_some();
        tracing::debug!(%id, removed, "stub: notification cancelled");
        Ok(())
    }
}

impl NativeWindow for StubBridge {
    fn start_main_activity(&self, flags: IntentFlags) -> Result<()> {
        if self.deny_activity_starts.load(Ordering::SeqCst) {
            return Err(AlarmBridgeError::Bridge(
                "background activity start blocked".into(),
            ));
        }

        let mut state = self.lock()?;
        if state.launches.len() == LAUNCH_HISTORY {
            state.launches.pop_front();
        }
        state.launches.push_back(flags);

        if flags.contains(IntentFlags::NEW_TASK) && flags.contains(IntentFlags::CLEAR_TASK) {
            state.task.clear();
            let record = state.new_record(MAIN_ACTIVITY);
            state.task.push(record);
            return Ok(());
        }

        let existing = state.task.iter().rposition(|r| r.component == MAIN_ACTIVITY);
        match existing {
            Some(idx) if flags.contains(IntentFlags::CLEAR_TOP) => {
                state.task.truncate(idx + 1);
                if flags.contains(IntentFlags::SINGLE_TOP) {
                    state.task[idx].new_intents += 1;
                } else {
                    // Without SINGLE_TOP the cleared-to instance is recreated.
                    let record = state.new_record(MAIN_ACTIVITY);
                    state.task[idx] = record;
                }
            }
            Some(idx) if flags.contains(IntentFlags::SINGLE_TOP) && idx + 1 == state.task.len() => {
                state.task[idx].new_intents += 1;
            }
            _ => {
                let record = state.new_record(MAIN_ACTIVITY);
                state.task.push(record);
            }
        }
        Ok(())
    }
}
