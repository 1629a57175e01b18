//! JNI entry points for `com.msun.rlcap.MainActivity`
//!
//! `System.loadLibrary("rlcap")` runs `JNI_OnLoad` once per process, which
//! installs the logger and loads the library state. `stringFromJNI` then
//! reads that state. Any failure here is fatal for the VM: there is no
//! fallback text.

use std::ffi::c_void;

use jni::objects::JObject;
use jni::sys::{jint, jstring, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use log::{error, info};

use crate::error::Result;
use crate::library;
use crate::logging;

#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    logging::init();
    library::global().load();
    info!("{} native library loaded", crate::APP_ID);
    JNI_VERSION_1_6
}

/// `public native String stringFromJNI();`
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn Java_com_msun_rlcap_MainActivity_stringFromJNI<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    let result: Result<jstring> = library::global()
        .get()
        .and_then(|greeter| Ok(env.new_string(greeter.greeting())?.into_raw()));

    match result {
        Ok(s) => s,
        Err(e) => {
            error!("stringFromJNI failed: {}", e);
            env.fatal_error(format!("rlcap: {}", e))
        }
    }
}
