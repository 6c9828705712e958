/// Popup UI for the Cookiedough extension

use futures::future::try_join_all;
use js_sys::Promise;
use patternfly_yew::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlElement, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::browser::{detected_family, is_restricted_url, BrowserApi};
use crate::clipboard::copy_to_clipboard;
use crate::cookies;
use crate::error::{PopupError, Result};
use crate::header::{format_cookie_header, plan_submit, Op, SubmitPlan};
use crate::ui::boundary::{ErrorBoundary, ViewBuilder};

/// Fixed wait before the first host call, giving the hosting context
/// time to finish attaching the extension APIs.
const STARTUP_DELAY_MS: i32 = 200;

#[derive(Clone, PartialEq)]
enum InitState {
    Initializing,
    Ready,
    Failed(String),
}

/// Everything resolved during initialization; immutable for the rest of
/// the popup session.
struct Session {
    api: BrowserApi,
    url: String,
    existing_header: String,
}

#[function_component(App)]
pub fn app() -> Html {
    let init_state = use_state(|| InitState::Initializing);
    let api = use_state(|| None::<BrowserApi>);
    let url = use_state(|| None::<String>);
    let existing = use_state(String::new);
    let draft = use_state(String::new);
    let clear_first = use_state(|| true);
    let submitting = use_state(|| false);

    // Initialization: locate the API, resolve the active tab, refuse
    // restricted pages, load the current cookies. Any failure is
    // terminal for this popup session.
    {
        let init_state = init_state.clone();
        let api = api.clone();
        let url = url.clone();
        let existing = existing.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                sleep(STARTUP_DELAY_MS).await;
                match initialize().await {
                    Ok(session) => {
                        existing.set(session.existing_header);
                        url.set(Some(session.url));
                        api.set(Some(session.api));
                        init_state.set(InitState::Ready);
                    }
                    Err(error) => {
                        log::error!("Popup initialization failed: {error}");
                        init_state.set(InitState::Failed(failure_message(&error)));
                    }
                }
                hide_loading_placeholder();
            });
            || ()
        });
    }

    // Copy the existing cookies to the clipboard
    let on_copy = {
        let existing = existing.clone();
        Callback::from(move |_| {
            let text = (*existing).clone();
            spawn_local(async move {
                if let Err(error) = copy_to_clipboard(&text).await {
                    log::error!("{error}");
                    alert("Failed to copy cookies to clipboard");
                }
            });
        })
    };

    let on_draft_input = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(textarea) = event.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(textarea.value());
            }
        })
    };

    let on_toggle_clear = {
        let clear_first = clear_first.clone();
        Callback::from(move |event: Event| {
            if let Some(checkbox) = event.target_dyn_into::<HtmlInputElement>() {
                clear_first.set(checkbox.checked());
            }
        })
    };

    // Submit: optionally clear, then apply the edited pairs. Success
    // closes the popup; failure leaves the edits intact for a retry.
    let on_submit = {
        let api = api.clone();
        let url = url.clone();
        let draft = draft.clone();
        let clear_first = clear_first.clone();
        let submitting = submitting.clone();
        Callback::from(move |_| {
            let (Some(api), Some(url)) = ((*api).clone(), (*url).clone()) else {
                return;
            };
            let plan = plan_submit(*clear_first, &draft);
            let submitting = submitting.clone();
            submitting.set(true);
            spawn_local(async move {
                match apply_plan(&api, &url, &plan).await {
                    Ok(()) => close_popup(),
                    Err(error) => {
                        alert(&error.to_string());
                        submitting.set(false);
                    }
                }
            });
        })
    };

    match &*init_state {
        InitState::Initializing => html! {
            <div class="loading-text-center">
                <Spinner />
                <p class="loading-text">{"Loading cookies..."}</p>
            </div>
        },
        InitState::Failed(message) => html! {
            <div class="message-top-margin">
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    <pre class="error-detail">{message.clone()}</pre>
                </Alert>
            </div>
        },
        InitState::Ready => {
            let view = {
                let existing = (*existing).clone();
                let draft = (*draft).clone();
                let clear = *clear_first;
                let busy = *submitting;
                let on_copy = on_copy.clone();
                let on_draft_input = on_draft_input.clone();
                let on_toggle_clear = on_toggle_clear.clone();
                let on_submit = on_submit.clone();
                ViewBuilder::new(move || {
                    Ok(html! {
                        <div class="padding-20">
                            <div class="section-label">
                                {"Existing cookies "}
                                <Button onclick={on_copy.clone()} variant={ButtonVariant::Secondary}>
                                    {"copy"}
                                </Button>
                            </div>

                            <div class="section-body">
                                <textarea
                                    rows="5"
                                    cols="100"
                                    value={existing.clone()}
                                    readonly={true}
                                ></textarea>
                            </div>

                            <div class="section-label">
                                {"Update cookies with a cookie header, e.g. "}
                                <code>{"foo=bar; bat=baz; oof=rab"}</code>
                            </div>

                            <div class="section-body">
                                <textarea
                                    rows="5"
                                    cols="100"
                                    value={draft.clone()}
                                    oninput={on_draft_input.clone()}
                                ></textarea>
                            </div>

                            <div class="section-body">
                                <label>
                                    <input
                                        type="checkbox"
                                        checked={clear}
                                        onchange={on_toggle_clear.clone()}
                                    />
                                    {" Clear existing cookies first"}
                                </label>
                            </div>

                            <div class="section-body">
                                <Button
                                    onclick={on_submit.clone()}
                                    disabled={busy}
                                    variant={ButtonVariant::Primary}
                                >
                                    {"Set Cookies"}
                                </Button>
                            </div>
                        </div>
                    })
                })
            };
            html! { <ErrorBoundary {view} /> }
        }
    }
}

// Helper functions

async fn initialize() -> Result<Session> {
    let api = BrowserApi::locate()?;
    let url = api.active_tab_url().await?;
    if is_restricted_url(&url) {
        return Err(PopupError::RestrictedUrl(url));
    }
    log::info!("Active tab URL: {url}");

    let existing = cookies::get_all(&api, &url).await?;
    Ok(Session {
        existing_header: format_cookie_header(&existing),
        api,
        url,
    })
}

/// Execute the plan's operation sequence: any clear completes before
/// the first set starts; the sets themselves run concurrently,
/// fail-fast.
async fn apply_plan(api: &BrowserApi, url: &str, plan: &SubmitPlan) -> Result<()> {
    let mut pending_sets = Vec::new();
    for op in plan.operations() {
        match op {
            Op::ClearAll => cookies::remove_all(api, url).await?,
            Op::Set { name, value } => pending_sets.push((name, value)),
        }
    }
    try_join_all(
        pending_sets
            .iter()
            .map(|(name, value)| cookies::set(api, url, name, value)),
    )
    .await?;
    Ok(())
}

/// Diagnostic shown when initialization fails: error text, detected
/// browser family, remediation hint.
fn failure_message(error: &PopupError) -> String {
    format!(
        "Error: {error}\n\nBrowser: {}\n\nThis extension may not be compatible with your browser.\n\nTry refreshing the page or restarting the browser.",
        detected_family().label(),
    )
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        // Settle immediately if the timer cannot be scheduled; the
        // promise must never be left pending
        let scheduled = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// The popup page ships a static `loading` placeholder; hide it once
/// initialization settles, whichever way it went.
fn hide_loading_placeholder() {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("loading"))
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.style().set_property("display", "none");
    }
}

/// Blocking user-facing notification for operational failures.
fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn close_popup() {
    if let Some(window) = web_sys::window() {
        let _ = window.close();
    }
}
