/// Browser API locator and callback-to-future adaptation
///
/// The popup may run under a Chromium-style `chrome` global or a
/// Gecko-style `browser` global. Both expose the same callback-based
/// `tabs`/`cookies` namespaces with a `runtime.lastError` side channel,
/// so one handle serves both once located.

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{PopupError, Result};

/// URL schemes the cookie APIs refuse to operate on.
const RESTRICTED_SCHEMES: [&str; 4] = [
    "chrome://",
    "chrome-extension://",
    "moz-extension://",
    "edge://",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chromium,
    Gecko,
}

impl BrowserFamily {
    pub fn label(&self) -> &'static str {
        match self {
            BrowserFamily::Chromium => "Chrome/Chromium",
            BrowserFamily::Gecko => "Firefox/Other",
        }
    }
}

/// Uniform handle over whichever extension API global is present.
#[derive(Clone)]
pub struct BrowserApi {
    root: Object,
}

impl BrowserApi {
    /// Probe the ambient globals, `browser` first (Firefox, some Edge
    /// versions), then `chrome` (Chromium-based browsers). One lookup
    /// per popup session; no side effects.
    pub fn locate() -> Result<BrowserApi> {
        let global = js_sys::global();
        for (name, family) in [
            ("browser", BrowserFamily::Gecko),
            ("chrome", BrowserFamily::Chromium),
        ] {
            if let Ok(value) = Reflect::get(&global, &JsValue::from_str(name)) {
                if let Ok(root) = value.dyn_into::<Object>() {
                    log::info!("Detected {} extension API", family.label());
                    return Ok(BrowserApi { root });
                }
            }
        }
        Err(PopupError::UnsupportedBrowser)
    }

    fn namespace(&self, name: &str) -> Option<Object> {
        let value = Reflect::get(&self.root, &JsValue::from_str(name)).ok()?;
        value.dyn_into::<Object>().ok()
    }

    fn tabs(&self) -> Result<Object> {
        self.namespace("tabs").ok_or(PopupError::UnsupportedBrowser)
    }

    pub(crate) fn cookies(&self) -> Result<Object> {
        self.namespace("cookies")
            .ok_or_else(|| PopupError::HostApi("Browser cookies API not available".to_string()))
    }

    /// Read `runtime.lastError.message` if the host reported a failure
    /// for the call that just completed.
    fn last_error(&self) -> Option<String> {
        let runtime = Reflect::get(&self.root, &JsValue::from_str("runtime")).ok()?;
        let last_error = Reflect::get(&runtime, &JsValue::from_str("lastError")).ok()?;
        if last_error.is_undefined() || last_error.is_null() {
            return None;
        }
        Reflect::get(&last_error, &JsValue::from_str("message"))
            .ok()
            .and_then(|message| message.as_string())
            .or_else(|| Some("Unknown browser error".to_string()))
    }

    /// Call a callback-style host method and await its completion.
    ///
    /// This is the single place the callback + `lastError` convention is
    /// adapted: the host invokes the callback once, we inspect the error
    /// side channel, and settle a promise accordingly. Every host call in
    /// the crate goes through here.
    pub(crate) async fn invoke(
        &self,
        target: &Object,
        method: &str,
        arg: JsValue,
    ) -> Result<JsValue> {
        let method_fn: Function = Reflect::get(target, &JsValue::from_str(method))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| PopupError::HostApi(format!("{method} is not available")))?;

        let promise = Promise::new(&mut |resolve, reject| {
            let api = self.clone();
            let reject_on_error = reject.clone();
            let callback = Closure::once_into_js(move |result: JsValue| {
                match api.last_error() {
                    Some(message) => {
                        let _ = reject_on_error
                            .call1(&JsValue::UNDEFINED, &JsValue::from_str(&message));
                    }
                    None => {
                        let _ = resolve.call1(&JsValue::UNDEFINED, &result);
                    }
                }
            });
            if let Err(thrown) = method_fn.call2(target, &arg, &callback) {
                let _ = reject.call1(&JsValue::UNDEFINED, &thrown);
            }
        });

        JsFuture::from(promise)
            .await
            .map_err(|rejection| PopupError::HostApi(js_value_message(&rejection)))
    }

    /// Resolve the URL of the active tab in the current window.
    pub async fn active_tab_url(&self) -> Result<String> {
        let tabs = self.tabs()?;
        let query = Object::new();
        let _ = Reflect::set(&query, &JsValue::from_str("active"), &JsValue::TRUE);
        let _ = Reflect::set(&query, &JsValue::from_str("currentWindow"), &JsValue::TRUE);

        let result = self.invoke(&tabs, "query", query.into()).await?;
        let first = js_sys::Array::from(&result).get(0);
        if first.is_undefined() || first.is_null() {
            return Err(PopupError::NoActiveTab);
        }

        Reflect::get(&first, &JsValue::from_str("url"))
            .ok()
            .and_then(|url| url.as_string())
            .filter(|url| !url.is_empty())
            .ok_or(PopupError::NoActiveTab)
    }
}

/// Family used for diagnostics even when `locate` failed.
pub fn detected_family() -> BrowserFamily {
    match Reflect::get(&js_sys::global(), &JsValue::from_str("chrome")) {
        Ok(value) if !value.is_undefined() && !value.is_null() => BrowserFamily::Chromium,
        _ => BrowserFamily::Gecko,
    }
}

/// Internal browser pages and extension pages are off limits to the
/// cookie APIs regardless of vendor.
pub fn is_restricted_url(url: &str) -> bool {
    RESTRICTED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

fn js_value_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_urls() {
        assert!(is_restricted_url("chrome://settings"));
        assert!(is_restricted_url("chrome-extension://abcdef/popup.html"));
        assert!(is_restricted_url("moz-extension://abcdef/popup.html"));
        assert!(is_restricted_url("edge://flags"));
    }

    #[test]
    fn test_ordinary_urls_not_restricted() {
        assert!(!is_restricted_url("https://example.com"));
        assert!(!is_restricted_url("http://localhost:3000/app"));
        assert!(!is_restricted_url("about:blank"));
        // Scheme must be the prefix, not merely present somewhere
        assert!(!is_restricted_url("https://example.com/?next=chrome://settings"));
    }

    #[test]
    fn test_family_labels() {
        assert_eq!(BrowserFamily::Chromium.label(), "Chrome/Chromium");
        assert_eq!(BrowserFamily::Gecko.label(), "Firefox/Other");
    }
}
