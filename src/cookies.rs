/// Cookie gateway over the host's `cookies` namespace
///
/// Only name/value pairs are read and written; cookie attributes
/// (domain, path, expiry, flags) are left to the host's defaults.

use futures::future::try_join_all;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use serde::Deserialize;

use crate::browser::BrowserApi;
use crate::error::{PopupError, Result};

/// A cookie as this popup sees it. The host's `getAll` results carry
/// many more fields; everything beyond name and value is ignored.
/// Names are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cookie {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// List every cookie the host associates with `url`. An empty list is a
/// valid success result.
pub async fn get_all(api: &BrowserApi, url: &str) -> Result<Vec<Cookie>> {
    let cookies = api.cookies()?;
    let details = Object::new();
    let _ = Reflect::set(&details, &JsValue::from_str("url"), &JsValue::from_str(url));

    let result = api.invoke(&cookies, "getAll", details.into()).await?;
    if result.is_null() || result.is_undefined() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(result)
        .map_err(|err| PopupError::HostApi(format!("Failed to parse cookies: {err}")))
}

/// Remove a single cookie by name. Removing an absent cookie is not
/// distinguished from success.
pub async fn remove(api: &BrowserApi, url: &str, name: &str) -> Result<()> {
    let cookies = api.cookies()?;
    let details = Object::new();
    let _ = Reflect::set(&details, &JsValue::from_str("url"), &JsValue::from_str(url));
    let _ = Reflect::set(&details, &JsValue::from_str("name"), &JsValue::from_str(name));

    log::debug!("Removing cookie {name} from {url}");
    api.invoke(&cookies, "remove", details.into()).await?;
    Ok(())
}

/// Remove every cookie for `url`: list, then remove concurrently,
/// failing on the first host-reported rejection. A failure can leave a
/// partial clear behind; there is no compensating rollback.
pub async fn remove_all(api: &BrowserApi, url: &str) -> Result<()> {
    let existing = get_all(api, url).await?;
    try_join_all(
        existing
            .iter()
            .map(|cookie| remove(api, url, &cookie.name)),
    )
    .await?;
    Ok(())
}

/// Write one name/value pair for `url`.
pub async fn set(api: &BrowserApi, url: &str, name: &str, value: &str) -> Result<()> {
    let cookies = api.cookies()?;
    let details = Object::new();
    let _ = Reflect::set(&details, &JsValue::from_str("url"), &JsValue::from_str(url));
    let _ = Reflect::set(&details, &JsValue::from_str("name"), &JsValue::from_str(name));
    let _ = Reflect::set(&details, &JsValue::from_str("value"), &JsValue::from_str(value));

    log::debug!("Setting cookie {name}={value} on {url}");
    api.invoke(&cookies, "set", details.into()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_deserializes_with_extra_fields() {
        // getAll results carry domain/path/expiry fields we don't model
        let json = r#"{"name":"sid","value":"abc123","domain":".example.com","path":"/","secure":true}"#;
        let cookie: Cookie = serde_json::from_str(json).unwrap();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.value, "abc123");
    }

    #[test]
    fn test_cookie_value_defaults_to_empty() {
        let cookie: Cookie = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();
        assert_eq!(cookie.value, "");
    }
}
