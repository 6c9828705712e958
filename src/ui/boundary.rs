/// Rendering-failure containment for the popup's main view
///
/// The controller hands this wrapper a fallible view builder; if the
/// builder fails, the subtree is replaced with a static fallback panel
/// instead of leaving the popup blank. No recovery is attempted.

use std::rc::Rc;

use patternfly_yew::prelude::*;
use yew::prelude::*;

use crate::error::PopupError;

/// Builder for the guarded subtree. Compared by pointer, so supplying a
/// fresh builder re-renders the wrapper.
#[derive(Clone)]
pub struct ViewBuilder(pub Rc<dyn Fn() -> Result<Html, PopupError>>);

impl ViewBuilder {
    pub fn new(builder: impl Fn() -> Result<Html, PopupError> + 'static) -> Self {
        ViewBuilder(Rc::new(builder))
    }
}

impl PartialEq for ViewBuilder {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorBoundaryProps {
    pub view: ViewBuilder,
}

#[function_component(ErrorBoundary)]
pub fn error_boundary(props: &ErrorBoundaryProps) -> Html {
    match (props.view.0)() {
        Ok(subtree) => subtree,
        Err(error) => {
            log::error!("Error boundary caught a rendering failure: {error}");
            html! {
                <div class="message-top-margin">
                    <Alert r#type={AlertType::Danger} title={"Extension Error"} inline={true}>
                        <p>{"Something went wrong with the Cookiedough extension."}</p>
                        <p><strong>{"Error: "}</strong>{error.to_string()}</p>
                        <p>{"Please try refreshing the page or restarting your browser."}</p>
                    </Alert>
                </div>
            }
        }
    }
}
