// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{
    DEFAULT_BODY, DEFAULT_LABEL, DEFAULT_TITLE, NotificationChannelSpec, NotificationId,
};

/// How method-call arguments are extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentPolicy {
    /// Missing or wrong-typed values silently fall back to their defaults.
    #[default]
    Lenient,
    /// Missing values take their defaults; wrong-typed values are rejected.
    Strict,
}

/// What the caller sees when the host refuses to post a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDenialPolicy {
    /// Return a `PERMISSION_DENIED` error to the caller.
    #[default]
    Report,
    /// Log the denial and report success anyway.
    Swallow,
}

/// Texts substituted for omitted call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTexts {
    /// `showNotification` title.
    pub title: String,
    /// `showNotification` body.
    pub body: String,
    /// `launchAlarm` label.
    pub label: String,
}

impl Default for DefaultTexts {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            body: DEFAULT_BODY.into(),
            label: DEFAULT_LABEL.into(),
        }
    }
}

/// Settings for the alarm service bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the method channel the UI layer talks to.
    pub method_channel: String,
    /// Notification channel registered on first use.
    pub notification_channel: NotificationChannelSpec,
    /// Fixed id of the single alarm notification.
    pub notification_id: NotificationId,
    pub defaults: DefaultTexts,
    pub argument_policy: ArgumentPolicy,
    pub permission_denial: PermissionDenialPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            method_channel: "alarm_service".into(),
            notification_channel: NotificationChannelSpec::default(),
            notification_id: NotificationId::ALARM,
            defaults: DefaultTexts::default(),
            argument_policy: ArgumentPolicy::Lenient,
            permission_denial: PermissionDenialPolicy::Report,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration handed over by the host. Absent keys keep their
    /// defaults; an empty string yields the default configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
