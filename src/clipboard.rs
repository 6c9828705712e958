/// Clipboard adapter: modern Clipboard API with a DOM fallback

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlTextAreaElement};

use crate::error::{PopupError, Result};

/// Copy `text` to the system clipboard.
///
/// Tries the secure-context Clipboard API first; on any failure falls
/// back to a transient off-screen textarea and `execCommand("copy")`.
/// Fails with [`PopupError::Clipboard`] only when both paths fail.
pub async fn copy_to_clipboard(text: &str) -> Result<()> {
    match copy_with_clipboard_api(text).await {
        Ok(()) => {
            log::debug!("Copied to clipboard via Clipboard API");
            Ok(())
        }
        Err(reason) => {
            log::warn!("Clipboard API unavailable ({reason}), using fallback");
            copy_with_textarea(text)
        }
    }
}

async fn copy_with_clipboard_api(text: &str) -> std::result::Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    if !window.is_secure_context() {
        return Err("not a secure context".to_string());
    }
    JsFuture::from(window.navigator().clipboard().write_text(text))
        .await
        .map_err(|err| format!("{err:?}"))?;
    Ok(())
}

/// Legacy copy path: insert an off-screen editable element, select its
/// contents, issue the copy command. The element is removed on every
/// exit path.
fn copy_with_textarea(text: &str) -> Result<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| PopupError::Clipboard("document is not available".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| PopupError::Clipboard("document has no body".to_string()))?;

    let textarea: HtmlTextAreaElement = document
        .create_element("textarea")
        .ok()
        .and_then(|element| element.dyn_into().ok())
        .ok_or_else(|| PopupError::Clipboard("failed to create textarea".to_string()))?;

    // Keep the element out of view and visually inert
    let style = textarea.style();
    for (property, value) in [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "2em"),
        ("height", "2em"),
        ("padding", "0"),
        ("border", "none"),
        ("outline", "none"),
        ("box-shadow", "none"),
        ("background", "transparent"),
    ] {
        let _ = style.set_property(property, value);
    }

    textarea.set_value(text);
    body.append_child(&textarea)
        .map_err(|_| PopupError::Clipboard("failed to attach textarea".to_string()))?;
    let _ = textarea.focus();
    textarea.select();

    let copied = exec_copy(&document);
    textarea.remove();

    match copied {
        Ok(true) => {
            log::debug!("Copied to clipboard via fallback textarea");
            Ok(())
        }
        Ok(false) => Err(PopupError::Clipboard(
            "copy command was rejected".to_string(),
        )),
        Err(message) => Err(PopupError::Clipboard(message)),
    }
}

fn exec_copy(document: &Document) -> std::result::Result<bool, String> {
    let html_document: web_sys::HtmlDocument = document
        .clone()
        .dyn_into()
        .map_err(|_| "execCommand is not available".to_string())?;
    html_document
        .exec_command("copy")
        .map_err(|err| format!("{err:?}"))
}
