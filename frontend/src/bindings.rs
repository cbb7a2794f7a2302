//! Page bootstrap.
//!
//! Handlers are attached only to elements the current page actually has;
//! login, registration and profile pages share this script.
//! `sendFeedback`, `showAlert` and `showFeedbackMessage` are installed on
//! `window` so inline `onclick` attributes keep working. Rating buttons
//! without an inline handler get a click listener instead.

use leptos::spawn_local;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, FormData, HtmlFormElement, HtmlInputElement, Window,
};

use crate::config::{
    ClientConfig, ACTION_BUTTONS_SELECTOR, IMAGE_INPUT_ID, LOGOUT_BUTTON_ID, REGISTER_FORM_ID,
    REGISTER_PATH, UPLOAD_FORM_ID,
};
use crate::controller::{Controller, Page, SelectedFile};
use crate::dom::DomPage;
use crate::services::FetchTransport;
use crate::types::NoticeKind;

type DomController = Controller<FetchTransport, DomPage>;

fn controller(config: &ClientConfig) -> DomController {
    Controller::new(FetchTransport::new(config.clone()), DomPage::new(config.clone()))
}

/// Attach every handler whose element is present.
pub fn bind_page(config: ClientConfig) {
    let document = gloo_utils::document();

    install_globals(&gloo_utils::window());

    bind_logout(&document, &config);
    bind_upload(&document, &config);
    bind_register(&document, &config);
    bind_feedback_buttons(&document, &config);
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let callback = closure.as_ref().unchecked_ref();
    if let Err(e) = target.add_event_listener_with_callback(event, callback) {
        log::error!("Failed to bind {} handler: {:?}", event, e);
    }
    // Listeners live as long as the page.
    closure.forget();
}

/// Make `closure` callable as `window[name]`.
fn expose<T: ?Sized + WasmClosure>(window: &Window, name: &str, closure: Closure<T>) {
    if let Err(e) = js_sys::Reflect::set(window, &JsValue::from_str(name), closure.as_ref()) {
        log::error!("Failed to install {}: {:?}", name, e);
    }
    closure.forget();
}

fn install_globals(window: &Window) {
    let send = Closure::wrap(
        Box::new(|is_good: JsValue| send_feedback(is_good.is_truthy())) as Box<dyn FnMut(JsValue)>
    );
    expose(window, "sendFeedback", send);

    let alert = Closure::wrap(Box::new(|message: JsValue, kind: JsValue| {
        show_alert(&message.as_string().unwrap_or_default(), kind.as_string())
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    expose(window, "showAlert", alert);

    let feedback = Closure::wrap(Box::new(|text: JsValue, is_success: JsValue| {
        show_feedback_message(&text.as_string().unwrap_or_default(), is_success.is_truthy())
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    expose(window, "showFeedbackMessage", feedback);
}

/// Rating submitted by a button, given its class list.
///
/// Buttons carrying an inline `onclick` already call `sendFeedback`.
fn feedback_verdict(class_name: &str, has_inline_handler: bool) -> Option<bool> {
    if has_inline_handler {
        return None;
    }
    let mut classes = class_name.split_whitespace();
    if classes.clone().any(|class| class == "btn-success") {
        Some(true)
    } else if classes.any(|class| class == "btn-danger") {
        Some(false)
    } else {
        None
    }
}

fn bind_feedback_buttons(document: &Document, config: &ClientConfig) {
    let Ok(buttons) = document.query_selector_all(ACTION_BUTTONS_SELECTOR) else {
        return;
    };

    for index in 0..buttons.length() {
        let Some(button) = buttons.item(index).and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let verdict = feedback_verdict(&button.class_name(), button.has_attribute("onclick"));
        let Some(is_good) = verdict else {
            continue;
        };

        let config = config.clone();
        listen(&button, "click", move |event| {
            event.prevent_default();
            let controller = controller(&config);
            spawn_local(async move { controller.send_feedback(is_good).await });
        });
    }
}

/// Registration endpoint for a form's resolved `action`.
fn registration_target(resolved_action: String) -> String {
    if resolved_action.is_empty() {
        REGISTER_PATH.to_string()
    } else {
        resolved_action
    }
}

fn bind_logout(document: &Document, config: &ClientConfig) {
    let Some(button) = document.get_element_by_id(LOGOUT_BUTTON_ID) else {
        return;
    };

    let config = config.clone();
    listen(&button, "click", move |event| {
        event.prevent_default();
        let controller = controller(&config);
        spawn_local(async move { controller.logout().await });
    });
    log::debug!("🔗 Logout handler bound");
}

fn bind_upload(document: &Document, config: &ClientConfig) {
    let Some(form) = form_by_id(document, UPLOAD_FORM_ID) else {
        return;
    };

    let config = config.clone();
    let document = document.clone();
    let target = form.clone();
    listen(&target, "submit", move |event| {
        event.prevent_default();
        let controller = controller(&config);

        let form_data = match FormData::new_with_form(&form) {
            Ok(data) => data,
            Err(e) => {
                log::error!("❌ Failed to read upload form: {:?}", e);
                controller
                    .page()
                    .show_feedback_message("Upload error: could not read the form", false);
                return;
            }
        };
        let file = selected_file(&document);

        spawn_local(async move { controller.upload(form_data, file).await });
    });
    log::debug!("🔗 Upload handler bound");
}

fn bind_register(document: &Document, config: &ClientConfig) {
    let Some(form) = form_by_id(document, REGISTER_FORM_ID) else {
        return;
    };

    let config = config.clone();
    let target = form.clone();
    listen(&target, "submit", move |event| {
        event.prevent_default();
        let controller = controller(&config);

        let action = registration_target(form.action());

        let form_data = match FormData::new_with_form(&form) {
            Ok(data) => data,
            Err(e) => {
                log::error!("❌ Failed to read registration form: {:?}", e);
                controller
                    .page()
                    .show_alert("Registration failed", NoticeKind::Error);
                return;
            }
        };

        spawn_local(async move { controller.register(&action, form_data).await });
    });
    log::debug!("🔗 Registration handler bound");
}

fn form_by_id(document: &Document, id: &str) -> Option<HtmlFormElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn selected_file(document: &Document) -> Option<SelectedFile> {
    let input: HtmlInputElement = document.get_element_by_id(IMAGE_INPUT_ID)?.dyn_into().ok()?;
    let file = input.files()?.get(0)?;

    Some(SelectedFile {
        name: file.name(),
        content_type: file.type_(),
        size: file.size(),
    })
}

/// Rate the segmentation currently shown.
#[wasm_bindgen(js_name = sendFeedback)]
pub fn send_feedback(is_good: bool) {
    let controller = controller(&ClientConfig::from_document());
    spawn_local(async move { controller.send_feedback(is_good).await });
}

/// Show an alert; see [`NoticeKind::from_tag`] for the accepted kinds.
#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: &str, kind: Option<String>) {
    let kind = NoticeKind::from_tag(kind.as_deref());
    DomPage::new(ClientConfig::from_document()).show_alert(message, kind);
}

#[wasm_bindgen(js_name = showFeedbackMessage)]
pub fn show_feedback_message(text: &str, is_success: bool) {
    DomPage::new(ClientConfig::from_document()).show_feedback_message(text, is_success);
}
