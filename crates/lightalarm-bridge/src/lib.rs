// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Light Alarm — native alarm service bridge.
//!
//! Serves the `alarm_service` method channel for the cross-platform UI:
//! raising the main window, posting and cancelling the single alarm
//! notification, and launching the alarm screen. The host OS is reached
//! through the [`traits::PlatformBridge`] capability traits, with one
//! implementation per platform.

pub mod channel;
pub mod launcher;
pub mod notifications;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

use std::sync::Arc;

use lightalarm_core::config::BridgeConfig;

pub use channel::{AlarmMethod, AlarmService, MethodCall, MethodResponse};

/// Retrieves the bridge implementation for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn PlatformBridge`) that hides the
/// native SDK details.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into NotificationManager / Activity.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: in-memory host model.
        Box::new(stub::StubBridge::new())
    }
}

/// Build the `alarm_service` handler on top of [`platform_bridge`].
pub fn alarm_service(config: &BridgeConfig) -> AlarmService<dyn traits::PlatformBridge> {
    AlarmService::new(Arc::from(platform_bridge()), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn platform_service_handles_calls() {
        let service = alarm_service(&BridgeConfig::default());
        assert_eq!(service.channel_name(), "alarm_service");
        assert_eq!(
            service.handle(&MethodCall::new("showNotification", Value::Null)),
            MethodResponse::Success(Value::Null)
        );
        assert_eq!(
            service.handle(&MethodCall::new("cancelNotification", Value::Null)),
            MethodResponse::Success(Value::Null)
        );
    }
}
