// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `alarm_service` method channel.
//
// The UI layer sends named calls with an argument map; the handler extracts
// typed arguments, runs the matching native operation, and answers with
// success(null), an error envelope, or "not implemented".

pub mod args;
pub mod codec;

use std::str::FromStr;
use std::sync::Arc;

use lightalarm_core::config::{ArgumentPolicy, BridgeConfig, DefaultTexts};
use lightalarm_core::error::{AlarmBridgeError, Result};
use lightalarm_core::types::{AlarmLaunchRequest, NotificationRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::launcher::ActivityLauncher;
use crate::notifications::NotificationManager;
use crate::traits::PlatformBridge;

use args::Arguments;

/// An incoming call on the method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// The reply sent back over the method channel.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error {
        code: String,
        message: String,
        details: Value,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn error_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: Value::Null,
        }
    }
}

impl From<&AlarmBridgeError> for MethodResponse {
    fn from(err: &AlarmBridgeError) -> Self {
        let details = match err {
            AlarmBridgeError::InvalidArgument { field, .. } => Value::String(field.clone()),
            _ => Value::Null,
        };
        Self::Error {
            code: err.code().to_owned(),
            message: err.to_string(),
            details,
        }
    }
}

/// Methods understood by `alarm_service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmMethod {
    BringToForeground,
    ShowNotification,
    CancelNotification,
    LaunchAlarm,
}

impl FromStr for AlarmMethod {
    type Err = AlarmBridgeError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "bringToForeground" => Ok(Self::BringToForeground),
            "showNotification" => Ok(Self::ShowNotification),
            "cancelNotification" => Ok(Self::CancelNotification),
            "launchAlarm" => Ok(Self::LaunchAlarm),
            other => Err(AlarmBridgeError::NotImplemented(other.to_owned())),
        }
    }
}

impl AlarmMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::BringToForeground => "bringToForeground",
            Self::ShowNotification => "showNotification",
            Self::CancelNotification => "cancelNotification",
            Self::LaunchAlarm => "launchAlarm",
        }
    }
}

/// Handler behind the `alarm_service` channel.
pub struct AlarmService<B: ?Sized> {
    channel_name: String,
    argument_policy: ArgumentPolicy,
    defaults: DefaultTexts,
    notifications: NotificationManager<B>,
    launcher: ActivityLauncher<B>,
}

impl<B: PlatformBridge + ?Sized> AlarmService<B> {
    pub fn new(bridge: Arc<B>, config: &BridgeConfig) -> Self {
        tracing::info!(
            channel = %config.method_channel,
            platform = bridge.platform_name(),
            policy = ?config.argument_policy,
            "alarm service ready"
        );
        Self {
            channel_name: config.method_channel.clone(),
            argument_policy: config.argument_policy,
            defaults: config.defaults.clone(),
            notifications: NotificationManager::new(Arc::clone(&bridge), config),
            launcher: ActivityLauncher::new(bridge),
        }
    }

    /// Name of the channel this handler serves.
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Register the notification channel ahead of the first call.
    pub fn ensure_channel(&self) -> Result<()> {
        self.notifications.ensure_channel()
    }

    pub fn bring_to_foreground(&self) -> Result<()> {
        self.launcher.bring_to_foreground()
    }

    pub fn show_notification(&self, request: &NotificationRequest) -> Result<()> {
        self.notifications.show(request)
    }

    pub fn cancel_notification(&self) -> Result<()> {
        self.notifications.cancel()
    }

    pub fn launch_alarm(&self, request: &AlarmLaunchRequest) -> Result<()> {
        self.launcher.launch_alarm_screen(&self.notifications, request)
    }

    /// Handle one decoded call. Never panics on caller input.
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        let method = match call.method.parse::<AlarmMethod>() {
            Ok(method) => method,
            Err(e) => {
                warn!(channel = %self.channel_name, error = %e, "unsupported call");
                return MethodResponse::NotImplemented;
            }
        };

        debug!(method = method.name(), "dispatching");
        match self.dispatch(method, &call.args) {
            Ok(()) => MethodResponse::Success(Value::Null),
            Err(e) => {
                warn!(method = method.name(), code = e.code(), error = %e, "call failed");
                MethodResponse::from(&e)
            }
        }
    }

    /// Decode, handle, and encode one raw channel message.
    pub fn handle_message(&self, message: &[u8]) -> Vec<u8> {
        let response = match codec::decode_call(message) {
            Ok(call) => self.handle(&call),
            Err(e) => {
                warn!(error = %e, bytes = message.len(), "undecodable method call");
                MethodResponse::from(&e)
            }
        };
        codec::encode_response(&response)
    }

    fn dispatch(&self, method: AlarmMethod, raw_args: &Value) -> Result<()> {
        let args = Arguments::new(raw_args, self.argument_policy)?;
        match method {
            AlarmMethod::BringToForeground => self.bring_to_foreground(),
            AlarmMethod::ShowNotification => {
                let request = NotificationRequest {
                    title: args.string("title", &self.defaults.title)?,
                    body: args.string("body", &self.defaults.body)?,
                    auto_cancel: args.bool("autoCancel", true)?,
                    ongoing: args.bool("ongoing", false)?,
                };
                self.show_notification(&request)
            }
            AlarmMethod::CancelNotification => self.cancel_notification(),
            AlarmMethod::LaunchAlarm => {
                let request = AlarmLaunchRequest {
                    alarm_id: args.int("alarmId", 0)?,
                    label: args.string("label", &self.defaults.label)?,
                };
                self.launch_alarm(&request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBridge;
    use lightalarm_core::config::PermissionDenialPolicy;
    use lightalarm_core::types::{DEFAULT_BODY, DEFAULT_TITLE, IntentFlags, NotificationId};
    use serde_json::json;

    fn service_with(config: BridgeConfig) -> (Arc<StubBridge>, AlarmService<StubBridge>) {
        let stub = Arc::new(StubBridge::new());
        let service = AlarmService::new(Arc::clone(&stub), &config);
        (stub, service)
    }

    fn service() -> (Arc<StubBridge>, AlarmService<StubBridge>) {
        service_with(BridgeConfig::default())
    }

    fn ok() -> MethodResponse {
        MethodResponse::Success(Value::Null)
    }

    #[test]
    fn show_then_cancel_leaves_nothing() {
        let (stub, service) = service();
        assert_eq!(service.handle(&MethodCall::new("showNotification", json!({}))), ok());
        assert_eq!(service.handle(&MethodCall::new("cancelNotification", Value::Null)), ok());
        assert!(stub.notification(NotificationId::ALARM).is_none());
    }

    #[test]
    fn second_show_replaces_first() {
        let (stub, service) = service();
        service.handle(&MethodCall::new("showNotification", json!({ "title": "one" })));
        service.handle(&MethodCall::new("showNotification", json!({ "title": "two" })));
        assert_eq!(stub.notification_count(), 1);
        assert_eq!(stub.notification(NotificationId::ALARM).unwrap().title, "two");
    }

    #[test]
    fn bring_to_foreground_twice_keeps_one_window() {
        let (stub, service) = service();
        let call = MethodCall::new("bringToForeground", Value::Null);
        assert_eq!(service.handle(&call), ok());
        assert_eq!(service.handle(&call), ok());
        assert_eq!(stub.task().len(), 1);
    }

    #[test]
    fn launch_alarm_raises_and_posts_pinned_notification() {
        let (stub, service) = service();
        let response = service.handle(&MethodCall::new(
            "launchAlarm",
            json!({ "alarmId": 7, "label": "Wake up" }),
        ));
        assert_eq!(response, ok());
        assert_eq!(stub.launches(), vec![IntentFlags::RAISE]);
        let posted = stub.notification(NotificationId::ALARM).unwrap();
        assert!(posted.body.contains("Wake up"));
        assert!(!posted.auto_cancel);
        assert!(posted.ongoing);
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let (_, service) = service();
        assert_eq!(
            service.handle(&MethodCall::new("doSomethingElse", json!({ "x": 1 }))),
            MethodResponse::NotImplemented
        );
    }

    #[test]
    fn omitted_arguments_use_defaults() {
        let (stub, service) = service();
        assert_eq!(service.handle(&MethodCall::new("showNotification", Value::Null)), ok());
        let posted = stub.notification(NotificationId::ALARM).unwrap();
        assert_eq!(posted.title, DEFAULT_TITLE);
        assert_eq!(posted.body, DEFAULT_BODY);
        assert!(posted.auto_cancel);
        assert!(!posted.ongoing);
    }

    #[test]
    fn configured_default_texts_fill_omitted_arguments() {
        let (stub, service) = service_with(BridgeConfig {
            defaults: DefaultTexts {
                title: "Alarm".into(),
                body: "Time to get up".into(),
                label: "Morning".into(),
            },
            ..Default::default()
        });
        service.handle(&MethodCall::new("showNotification", json!({ "body": "custom" })));
        let posted = stub.notification(NotificationId::ALARM).unwrap();
        assert_eq!(posted.title, "Alarm");
        assert_eq!(posted.body, "custom");

        service.handle(&MethodCall::new("launchAlarm", Value::Null));
        let posted = stub.notification(NotificationId::ALARM).unwrap();
        assert!(posted.body.contains("Morning"));
    }

    #[test]
    fn method_names_parse_or_report_not_implemented() {
        assert_eq!("launchAlarm".parse::<AlarmMethod>().unwrap(), AlarmMethod::LaunchAlarm);
        match "doSomethingElse".parse::<AlarmMethod>().unwrap_err() {
            AlarmBridgeError::NotImplemented(name) => assert_eq!(name, "doSomethingElse"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lenient_policy_masks_bad_types() {
        let (stub, service) = service();
        let response =
            service.handle(&MethodCall::new("showNotification", json!({ "title": 12 })));
        assert_eq!(response, ok());
        assert_eq!(stub.notification(NotificationId::ALARM).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn strict_policy_reports_invalid_argument() {
        let (stub, service) = service_with(BridgeConfig {
            argument_policy: ArgumentPolicy::Strict,
            ..Default::default()
        });
        let response =
            service.handle(&MethodCall::new("launchAlarm", json!({ "alarmId": "seven" })));
        match response {
            MethodResponse::Error { code, details, .. } => {
                assert_eq!(code, "INVALID_ARGUMENT");
                assert_eq!(details, json!("alarmId"));
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(stub.launches().is_empty());
    }

    #[test]
    fn permission_denial_surfaces_as_error() {
        let (stub, service) = service();
        stub.set_notifications_denied(true);
        let response = service.handle(&MethodCall::new("showNotification", json!({})));
        assert_eq!(
            response,
            MethodResponse::Error {
                code: "PERMISSION_DENIED".into(),
                message: "permission to post notifications was denied".into(),
                details: Value::Null,
            }
        );
    }

    #[test]
    fn swallow_policy_keeps_original_success() {
        let (stub, service) = service_with(BridgeConfig {
            permission_denial: PermissionDenialPolicy::Swallow,
            ..Default::default()
        });
        stub.set_notifications_denied(true);
        assert_eq!(service.handle(&MethodCall::new("showNotification", json!({}))), ok());
        assert_eq!(stub.notification_count(), 0);
    }

    #[test]
    fn raw_messages_round_through_codec() {
        let (stub, service) = service();
        let reply = service.handle_message(br#"{"method":"showNotification","args":{"body":"b"}}"#);
        assert_eq!(reply, b"[null]");
        assert_eq!(stub.notification(NotificationId::ALARM).unwrap().body, "b");

        assert!(service.handle_message(br#"{"method":"nope"}"#).is_empty());

        let bad = codec::decode_response(&service.handle_message(b"not json")).unwrap();
        match bad {
            MethodResponse::Error { code, .. } => assert_eq!(code, "BAD_MESSAGE"),
            other => panic!("expected error, got {other:?}"),
        }
    }
}
