// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Targets `aarch64-linux-android` / `armv7-linux-androideabi`. Each trait
// method calls the framework API directly (`NotificationManager`,
// `Notification.Builder`, `PendingIntent`, `Intent`) through the ART runtime.
//
// ## Host integration
//
// The host Activity loads the library and calls
// `AlarmServiceBridge.nativeInit(activity, configJson)` from `onCreate`. The
// bridge keeps the application context and the Activity's class, never the
// Activity itself. The host then forwards
// every `alarm_service` message through `nativeHandleMessage(bytes)` and
// replies with the returned bytes (JSON method codec, see `channel::codec`).

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::JNIEnv;
use jni::objects::{GlobalRef, JByteArray, JClass, JObject, JString, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jbyteArray};

use lightalarm_core::config::BridgeConfig;
use lightalarm_core::error::{AlarmBridgeError, Result};
use lightalarm_core::types::{
    IntentFlags, NotificationChannelSpec, NotificationId, NotificationSpec, PENDING_INTENT_FLAGS,
};

use crate::channel::{AlarmService, codec};
use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// API level that introduced notification channels (Android 8.0).
const API_CHANNELS: i32 = 26;

/// API level that introduced `areNotificationsEnabled` (Android 7.0).
const API_NOTIFICATIONS_ENABLED: i32 = 24;

/// `Context.NOTIFICATION_SERVICE`.
const NOTIFICATION_SERVICE: &str = "notification";

/// Request code of the notification's content / full-screen intent.
const CONTENT_REQUEST_CODE: i32 = 0;

/// Run `f` with a JNI environment attached to the current thread and the
/// application `Context`.
///
/// The `JavaVM*` and Context come from `ndk_context`, populated by
/// `nativeInit`. Any Java exception still pending when `f` returns is
/// cleared before the environment is handed to the next caller.
fn with_context<R>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<R>) -> Result<R> {
    // `android_context()` panics before initialisation.
    if MAIN_ACTIVITY_CLASS.get().is_none() {
        return Err(AlarmBridgeError::PlatformUnavailable);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` registered with ndk_context,
    // valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| jni_err("JavaVM::from_raw", e))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| jni_err("attach_current_thread", e))?;
    // SAFETY: the context pointer is the application-context global
    // reference held by `APP_CONTEXT`.
    let context = unsafe { JObject::from_raw(ctx.context().cast()) };
    let result = f(&mut env, &context);
    clear_pending_exception(&mut env);
    result
}

/// Describe and clear a pending Java exception, if any.
///
/// JNI calls made while an exception is pending are undefined behaviour
/// (CheckJNI aborts), so every failed call path ends here.
fn clear_pending_exception(env: &mut JNIEnv<'_>) -> bool {
    match env.exception_check() {
        Ok(true) => {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
            tracing::warn!("Android: cleared pending Java exception");
            true
        }
        _ => false,
    }
}

/// Convenience: map any `jni::errors::Error` into `AlarmBridgeError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> AlarmBridgeError {
    AlarmBridgeError::Bridge(format!("{context}: {e}"))
}

/// `Build.VERSION.SDK_INT`.
fn sdk_int(env: &mut JNIEnv<'_>) -> Result<i32> {
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err("SDK_INT->i", e))
}

/// `context.getSystemService(Context.NOTIFICATION_SERVICE)`.
fn notification_manager<'a>(env: &mut JNIEnv<'a>, context: &JObject<'_>) -> Result<JObject<'a>> {
    let j_name: JString = env
        .new_string(NOTIFICATION_SERVICE)
        .map_err(|e| jni_err("new_string(NOTIFICATION_SERVICE)", e))?;
    let manager = env
        .call_method(
            context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&j_name)],
        )
        .map_err(|e| jni_err("getSystemService(notification)", e))?
        .l()
        .map_err(|e| jni_err("getSystemService->l", e))?;
    if manager.is_null() {
        return Err(AlarmBridgeError::Bridge("NotificationManager unavailable".into()));
    }
    Ok(manager)
}

/// `new Intent(context, MainActivity.class).setFlags(flags)`.
fn main_activity_intent<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject<'_>,
    flags: IntentFlags,
) -> Result<JObject<'a>> {
    let class = MAIN_ACTIVITY_CLASS
        .get()
        .ok_or(AlarmBridgeError::PlatformUnavailable)?;

    let intent = env
        .new_object(
            "android/content/Intent",
            "(Landroid/content/Context;Ljava/lang/Class;)V",
            &[JValue::Object(context), JValue::Object(class.as_obj())],
        )
        .map_err(|e| jni_err("new Intent(main)", e))?;

    env.call_method(
        &intent,
        "setFlags",
        "(I)Landroid/content/Intent;",
        &[JValue::Int(flags.0)],
    )
    .map_err(|e| jni_err("Intent.setFlags", e))?;

    Ok(intent)
}

/// Clear a pending Java exception. Returns true if it was a
/// `SecurityException`.
fn take_security_exception(env: &mut JNIEnv<'_>) -> Result<bool> {
    if !env.exception_check().map_err(|e| jni_err("exception_check", e))? {
        return Ok(false);
    }
    let throwable = env
        .exception_occurred()
        .map_err(|e| jni_err("exception_occurred", e))?;
    env.exception_clear().map_err(|e| jni_err("exception_clear", e))?;
    env.is_instance_of(&throwable, "java/lang/SecurityException")
        .map_err(|e| jni_err("is_instance_of(SecurityException)", e))
}

/// Set a boolean builder property, e.g. `builder.setOngoing(true)`.
fn builder_bool(env: &mut JNIEnv<'_>, builder: &JObject<'_>, name: &str, value: bool) -> Result<()> {
    env.call_method(
        builder,
        name,
        "(Z)Landroid/app/Notification$Builder;",
        &[JValue::Bool(jboolean::from(value))],
    )
    .map_err(|e| jni_err(name, e))?;
    Ok(())
}

/// Set a text builder property, e.g. `builder.setContentTitle(title)`.
fn builder_text(env: &mut JNIEnv<'_>, builder: &JObject<'_>, name: &str, value: &str) -> Result<()> {
    let j_value: JString = env.new_string(value).map_err(|e| jni_err("new_string", e))?;
    env.call_method(
        builder,
        name,
        "(Ljava/lang/CharSequence;)Landroid/app/Notification$Builder;",
        &[JValue::Object(&j_value)],
    )
    .map_err(|e| jni_err(name, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the alarm platform bridge.
///
/// Zero-sized; all state lives on the Java side.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge. Does not touch JNI until first use.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativeNotifications — android.app.NotificationManager
// ---------------------------------------------------------------------------

impl NativeNotifications for AndroidBridge {
    fn requires_notification_channel(&self) -> bool {
        match with_context(|env, _| sdk_int(env)) {
            Ok(sdk) => sdk >= API_CHANNELS,
            Err(e) => {
                // Registering a channel on an old host would fail loudly,
                // whereas skipping it on a new one drops the notification.
                tracing::warn!(error = %e, "SDK level unknown; assuming channels are required");
                true
            }
        }
    }

    /// `NotificationManager.createNotificationChannel(channel)` with the
    /// channel's sound cleared; the app plays alarm audio itself.
    fn create_notification_channel(&self, channel: &NotificationChannelSpec) -> Result<()> {
        with_context(|env, context| {
            let j_id: JString = env
                .new_string(&channel.id)
                .map_err(|e| jni_err("new_string(channel.id)", e))?;
            let j_name: JString = env
                .new_string(&channel.name)
                .map_err(|e| jni_err("new_string(channel.name)", e))?;

            let j_channel = env
                .new_object(
                    "android/app/NotificationChannel",
                    "(Ljava/lang/String;Ljava/lang/CharSequence;I)V",
                    &[
                        JValue::Object(&j_id),
                        JValue::Object(&j_name),
                        JValue::Int(channel.importance.as_android()),
                    ],
                )
                .map_err(|e| jni_err("new NotificationChannel", e))?;

            let j_description: JString = env
                .new_string(&channel.description)
                .map_err(|e| jni_err("new_string(channel.description)", e))?;
            env.call_method(
                &j_channel,
                "setDescription",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_description)],
            )
            .map_err(|e| jni_err("NotificationChannel.setDescription", e))?;

            if !channel.sound_enabled {
                let null = JObject::null();
                env.call_method(
                    &j_channel,
                    "setSound",
                    "(Landroid/net/Uri;Landroid/media/AudioAttributes;)V",
                    &[JValue::Object(&null), JValue::Object(&null)],
                )
                .map_err(|e| jni_err("NotificationChannel.setSound", e))?;
            }

            let manager = notification_manager(env, context)?;
            env.call_method(
                &manager,
                "createNotificationChannel",
                "(Landroid/app/NotificationChannel;)V",
                &[JValue::Object(&j_channel)],
            )
            .map_err(|e| jni_err("createNotificationChannel", e))?;

            tracing::info!(channel = %channel.id, "Android: notification channel created");
            Ok(())
        })
    }

    /// Build and post the notification through `Notification.Builder`.
    ///
    /// The tap action and the full-screen intent share one immutable
    /// `PendingIntent` that relaunches the main Activity.
    fn post_notification(&self, spec: &NotificationSpec) -> Result<()> {
        with_context(|env, context| {
            let sdk = sdk_int(env)?;
            let manager = notification_manager(env, context)?;

            // Android 13+ silently drops notifications without the runtime
            // permission; report it instead.
            if sdk >= API_NOTIFICATIONS_ENABLED {
                let enabled = env
                    .call_method(&manager, "areNotificationsEnabled", "()Z", &[])
                    .map_err(|e| jni_err("areNotificationsEnabled", e))?
                    .z()
                    .map_err(|e| jni_err("areNotificationsEnabled->z", e))?;
                if !enabled {
                    return Err(AlarmBridgeError::PermissionDenied);
                }
            }

            // -- Content / full-screen intent ------------------------------------
            let intent = main_activity_intent(env, context, spec.content_intent_flags)?;
            let pending = env
                .call_static_method(
                    "android/app/PendingIntent",
                    "getActivity",
                    "(Landroid/content/Context;ILandroid/content/Intent;I)Landroid/app/PendingIntent;",
                    &[
                        JValue::Object(context),
                        JValue::Int(CONTENT_REQUEST_CODE),
                        JValue::Object(&intent),
                        JValue::Int(PENDING_INTENT_FLAGS),
                    ],
                )
                .map_err(|e| jni_err("PendingIntent.getActivity", e))?
                .l()
                .map_err(|e| jni_err("getActivity->l", e))?;

            // -- Builder ----------------------------------------------------------
            let builder = if sdk >= API_CHANNELS {
                let j_channel: JString = env
                    .new_string(&spec.channel_id)
                    .map_err(|e| jni_err("new_string(channel_id)", e))?;
                env.new_object(
                    "android/app/Notification$Builder",
                    "(Landroid/content/Context;Ljava/lang/String;)V",
                    &[JValue::Object(context), JValue::Object(&j_channel)],
                )
            } else {
                env.new_object(
                    "android/app/Notification$Builder",
                    "(Landroid/content/Context;)V",
                    &[JValue::Object(context)],
                )
            }
            .map_err(|e| jni_err("new Notification.Builder", e))?;

            let icon = env
                .get_static_field("android/R$drawable", "ic_lock_idle_alarm", "I")
                .map_err(|e| jni_err("R.drawable.ic_lock_idle_alarm", e))?
                .i()
                .map_err(|e| jni_err("ic_lock_idle_alarm->i", e))?;
            env.call_method(
                &builder,
                "setSmallIcon",
                "(I)Landroid/app/Notification$Builder;",
                &[JValue::Int(icon)],
            )
            .map_err(|e| jni_err("setSmallIcon", e))?;

            builder_text(env, &builder, "setContentTitle", &spec.title)?;
            builder_text(env, &builder, "setContentText", &spec.body)?;

            // Ignored by channel-based hosts, honoured by older ones.
            env.call_method(
                &builder,
                "setPriority",
                "(I)Landroid/app/Notification$Builder;",
                &[JValue::Int(spec.priority.as_android())],
            )
            .map_err(|e| jni_err("setPriority", e))?;

            env.call_method(
                &builder,
                "setContentIntent",
                "(Landroid/app/PendingIntent;)Landroid/app/Notification$Builder;",
                &[JValue::Object(&pending)],
            )
            .map_err(|e| jni_err("setContentIntent", e))?;

            builder_bool(env, &builder, "setAutoCancel", spec.auto_cancel)?;
            builder_bool(env, &builder, "setOngoing", spec.ongoing)?;

            let j_category: JString = env
                .new_string(spec.category.as_android())
                .map_err(|e| jni_err("new_string(category)", e))?;
            env.call_method(
                &builder,
                "setCategory",
                "(Ljava/lang/String;)Landroid/app/Notification$Builder;",
                &[JValue::Object(&j_category)],
            )
            .map_err(|e| jni_err("setCategory", e))?;

            if spec.full_screen_intent {
                env.call_method(
                    &builder,
                    "setFullScreenIntent",
                    "(Landroid/app/PendingIntent;Z)Landroid/app/Notification$Builder;",
                    &[JValue::Object(&pending), JValue::Bool(JNI_TRUE)],
                )
                .map_err(|e| jni_err("setFullScreenIntent", e))?;
            }

            let notification = env
                .call_method(&builder, "build", "()Landroid/app/Notification;", &[])
                .map_err(|e| jni_err("Notification.Builder.build", e))?
                .l()
                .map_err(|e| jni_err("build->l", e))?;

            // -- Post -------------------------------------------------------------
            let posted = env.call_method(
                &manager,
                "notify",
                "(ILandroid/app/Notification;)V",
                &[JValue::Int(spec.id.0), JValue::Object(&notification)],
            );
            if let Err(e) = posted {
                if take_security_exception(env)? {
                    return Err(AlarmBridgeError::PermissionDenied);
                }
                return Err(jni_err("NotificationManager.notify", e));
            }

            tracing::info!(id = %spec.id, sdk, "Android: notification posted");
            Ok(())
        })
    }

    fn cancel_notification(&self, id: NotificationId) -> Result<()> {
        with_context(|env, context| {
            let manager = notification_manager(env, context)?;
            env.call_method(&manager, "cancel", "(I)V", &[JValue::Int(id.0)])
                .map_err(|e| jni_err("NotificationManager.cancel", e))?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// NativeWindow — Activity.startActivity
// ---------------------------------------------------------------------------

impl NativeWindow for AndroidBridge {
    fn start_main_activity(&self, flags: IntentFlags) -> Result<()> {
        with_context(|env, context| {
            let intent = main_activity_intent(env, context, flags)?;
            env.call_method(
                context,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )
            .map_err(|e| jni_err("startActivity(main)", e))?;

            tracing::info!(flags = flags.0, "Android: main activity started");
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// JNI exports — com.example.light_alarm_prototype.AlarmServiceBridge
// ---------------------------------------------------------------------------

/// Global reference to the application `Context`. Unlike an Activity it
/// lives as long as the process, so it survives Activity recreation.
static APP_CONTEXT: OnceLock<GlobalRef> = OnceLock::new();

/// Global reference to the host Activity's class, target of every intent.
static MAIN_ACTIVITY_CLASS: OnceLock<GlobalRef> = OnceLock::new();

/// The process-wide `alarm_service` handler, built by the first `nativeInit`.
static SERVICE: OnceLock<AlarmService<AndroidBridge>> = OnceLock::new();

fn init(env: &mut JNIEnv<'_>, activity: &JObject<'_>, config_json: &JString<'_>) -> Result<()> {
    lightalarm_core::init_logging(None);

    let config_json: String = if config_json.is_null() {
        String::new()
    } else {
        env.get_string(config_json)
            .map_err(|e| jni_err("get_string(config)", e))?
            .into()
    };
    let config = BridgeConfig::from_json_str(&config_json)?;

    if APP_CONTEXT.get().is_none() {
        let app_context = env
            .call_method(activity, "getApplicationContext", "()Landroid/content/Context;", &[])
            .map_err(|e| jni_err("getApplicationContext", e))?
            .l()
            .map_err(|e| jni_err("getApplicationContext->l", e))?;
        let global_context = env
            .new_global_ref(&app_context)
            .map_err(|e| jni_err("new_global_ref(app_context)", e))?;

        let class: JClass = env
            .get_object_class(activity)
            .map_err(|e| jni_err("getClass(activity)", e))?;
        let global_class = env
            .new_global_ref(&class)
            .map_err(|e| jni_err("new_global_ref(activity_class)", e))?;

        let vm = env.get_java_vm().map_err(|e| jni_err("get_java_vm", e))?;
        // SAFETY: both pointers stay valid for the rest of the process; the
        // global reference is kept alive by `APP_CONTEXT`.
        unsafe {
            ndk_context::initialize_android_context(
                vm.get_java_vm_pointer().cast(),
                global_context.as_obj().as_raw().cast(),
            );
        }
        let _ = APP_CONTEXT.set(global_context);
        let _ = MAIN_ACTIVITY_CLASS.set(global_class);
    }

    let mut fresh = false;
    let service = SERVICE.get_or_init(|| {
        fresh = true;
        AlarmService::new(std::sync::Arc::new(AndroidBridge::new()), &config)
    });
    if !fresh {
        tracing::debug!("alarm service already initialised; keeping first configuration");
    }
    service.ensure_channel()
}

/// `static native boolean nativeInit(Activity activity, String configJson)`
///
/// Safe to call from every `onCreate`; only the first call configures the
/// service.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_light_1alarm_1prototype_AlarmServiceBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
    config_json: JString<'local>,
) -> jboolean {
    let result = init(&mut env, &activity, &config_json);
    clear_pending_exception(&mut env);
    match result {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            tracing::error!(error = %e, "alarm service initialisation failed");
            JNI_FALSE
        }
    }
}

/// `static native byte[] nativeHandleMessage(byte[] message)`
///
/// Returns the encoded reply; an empty array means "not implemented". Before
/// `nativeInit` has run every call is answered with `PLATFORM_UNAVAILABLE`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_light_1alarm_1prototype_AlarmServiceBridge_nativeHandleMessage<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    message: JByteArray<'local>,
) -> jbyteArray {
    let bytes = match env.convert_byte_array(&message) {
        Ok(bytes) => bytes,
        Err(e) => {
            clear_pending_exception(&mut env);
            tracing::error!(error = %e, "could not read method call bytes");
            return std::ptr::null_mut();
        }
    };

    let reply = match SERVICE.get() {
        Some(service) => service.handle_message(&bytes),
        None => {
            tracing::warn!("alarm_service message before nativeInit");
            codec::encode_error(&AlarmBridgeError::PlatformUnavailable)
        }
    };

    match env.byte_array_from_slice(&reply) {
        Ok(array) => array.into_raw(),
        Err(e) => {
            clear_pending_exception(&mut env);
            tracing::error!(error = %e, "could not allocate reply array");
            std::ptr::null_mut()
        }
    }
}
