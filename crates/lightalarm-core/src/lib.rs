// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Light Alarm — Core types, errors, and configuration shared by the bridge.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{ArgumentPolicy, BridgeConfig, DefaultTexts, PermissionDenialPolicy};
pub use error::AlarmBridgeError;
pub use logging::init_logging;
pub use types::*;
