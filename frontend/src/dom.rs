//! Browser implementation of [`Page`].
//!
//! Notices are built with Leptos' `view!` and inserted into markup the
//! server already rendered; everything else manipulates existing elements
//! by id.

use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement,
};

use crate::config::{
    ClientConfig, ACTION_BUTTONS_SELECTOR, ALERT_CONTAINER_SELECTOR, FEEDBACK_MESSAGE_ID,
    IMAGE_ID_ATTRIBUTE, IMAGE_INPUT_ID, ORIGINAL_IMAGE_ID, RESULT_CONTAINER_ID,
    SEGMENTED_IMAGE_ID,
};
use crate::controller::Page;
use crate::notice::{show_notice, NoticeHost, NoticeSurface, Scheduler};
use crate::types::{AppError, AppResult, ImageId, NoticeKind};

/// Schedules on the browser's `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }
}

/// How a notice fades out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeStyle {
    /// Inline `opacity: 0`, used by alerts.
    Opacity,
    /// The `fade-out` class, used by feedback messages.
    FadeOutClass,
}

/// Change applied to a notice element when it starts fading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeChange {
    Style(&'static str, &'static str),
    AddClass(&'static str),
}

impl FadeStyle {
    fn change(self) -> FadeChange {
        match self {
            FadeStyle::Opacity => FadeChange::Style("opacity", "0"),
            FadeStyle::FadeOutClass => FadeChange::AddClass("fade-out"),
        }
    }
}

/// A notice element in the document.
#[derive(Clone, Debug)]
pub struct DomNotice {
    element: HtmlElement,
    fade: FadeStyle,
}

impl NoticeSurface for DomNotice {
    fn fade_out(&self) {
        let result = match self.fade.change() {
            FadeChange::Style(property, value) => {
                self.element.style().set_property(property, value)
            }
            FadeChange::AddClass(class) => self.element.class_list().add_1(class),
        };
        if let Err(e) = result {
            log::warn!("Failed to fade notice: {:?}", e);
        }
    }

    fn remove(&self) {
        self.element.remove();
    }
}

/// Class list of an alert element.
fn alert_class(kind: NoticeKind) -> String {
    format!("alert alert-{}", kind.tag())
}

/// Pick where an alert goes: the auth container when the page has one.
fn alert_container<T>(auth_container: Option<T>, body: Option<T>) -> Option<T> {
    auth_container.or(body)
}

/// `div.alert`, prepended to the auth container or the body.
struct AlertHost<'a> {
    document: &'a Document,
}

impl AlertHost<'_> {
    const FADE: FadeStyle = FadeStyle::Opacity;
}

impl NoticeHost for AlertHost<'_> {
    type Surface = DomNotice;

    fn existing(&self) -> Option<DomNotice> {
        let element = self.document.query_selector(".alert").ok()??;
        let element = element.dyn_into::<HtmlElement>().ok()?;
        Some(DomNotice {
            element,
            fade: Self::FADE,
        })
    }

    fn insert(&self, text: &str, kind: NoticeKind) -> AppResult<DomNotice> {
        let alert = view! {
            <div class=alert_class(kind)>{text.to_string()}</div>
        };
        let element: HtmlElement = (*alert).clone().into();

        let auth_container = self
            .document
            .query_selector(ALERT_CONTAINER_SELECTOR)
            .ok()
            .flatten();
        let body: Option<Element> = self.document.body().map(Into::into);
        let container =
            alert_container(auth_container, body).ok_or(AppError::MissingElement("body"))?;

        container
            .prepend_with_node_1(&element)
            .map_err(|e| AppError::Dom(format!("{:?}", e)))?;

        Ok(DomNotice {
            element,
            fade: Self::FADE,
        })
    }
}

/// `div#feedback-message`, appended to the body.
struct FeedbackHost<'a> {
    document: &'a Document,
}

impl FeedbackHost<'_> {
    const FADE: FadeStyle = FadeStyle::FadeOutClass;
}

impl NoticeHost for FeedbackHost<'_> {
    type Surface = DomNotice;

    fn existing(&self) -> Option<DomNotice> {
        let element = self.document.get_element_by_id(FEEDBACK_MESSAGE_ID)?;
        let element = element.dyn_into::<HtmlElement>().ok()?;
        Some(DomNotice {
            element,
            fade: Self::FADE,
        })
    }

    fn insert(&self, text: &str, kind: NoticeKind) -> AppResult<DomNotice> {
        let message = view! {
            <div id=FEEDBACK_MESSAGE_ID class=kind.tag()>{text.to_string()}</div>
        };
        let element: HtmlElement = (*message).clone().into();

        let body = self.document.body().ok_or(AppError::MissingElement("body"))?;
        body.append_child(&element)
            .map_err(|e| AppError::Dom(format!("{:?}", e)))?;

        Ok(DomNotice {
            element,
            fade: Self::FADE,
        })
    }
}

/// The live document.
#[derive(Clone)]
pub struct DomPage {
    document: Document,
    config: ClientConfig,
    scheduler: TimeoutScheduler,
}

impl DomPage {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            document: gloo_utils::document(),
            config,
            scheduler: TimeoutScheduler,
        }
    }

    fn element<E: JsCast>(&self, id: &'static str) -> AppResult<E> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<E>().ok())
            .ok_or(AppError::MissingElement(id))
    }

    fn result_container(&self) -> AppResult<HtmlElement> {
        self.element(RESULT_CONTAINER_ID)
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) -> AppResult<()> {
        element
            .style()
            .set_property(property, value)
            .map_err(|e| AppError::Dom(format!("{:?}", e)))
    }

    fn try_reveal_result(&self) -> AppResult<()> {
        let container = self.result_container()?;
        Self::set_style(&container, "display", "block")?;
        Self::set_style(&container, "opacity", "1")
    }

    fn try_present_result(
        &self,
        image_id: &ImageId,
        original_src: &str,
        segmented_src: &str,
    ) -> AppResult<()> {
        let container = self.result_container()?;
        container
            .set_attribute(IMAGE_ID_ATTRIBUTE, image_id.as_str())
            .map_err(|e| AppError::Dom(format!("{:?}", e)))?;

        self.element::<HtmlImageElement>(ORIGINAL_IMAGE_ID)?
            .set_src(&self.config.url(original_src));
        self.element::<HtmlImageElement>(SEGMENTED_IMAGE_ID)?
            .set_src(&self.config.url(segmented_src));

        Self::set_style(&container, "display", "block")
    }

    fn try_dismiss_result(&self) -> AppResult<()> {
        let container = self.result_container()?;
        Self::set_style(&container, "opacity", "0")?;

        let input = self.element::<HtmlInputElement>(IMAGE_INPUT_ID).ok();
        self.scheduler.schedule(
            self.config.feedback_timing.fade_ms,
            Box::new(move || {
                if let Err(e) = Self::set_style(&container, "display", "none") {
                    log::warn!("Failed to hide result: {}", e);
                }
                if let Some(input) = input {
                    input.set_value("");
                }
            }),
        );
        Ok(())
    }
}

impl Page for DomPage {
    fn show_alert(&self, message: &str, kind: NoticeKind) {
        let host = AlertHost {
            document: &self.document,
        };
        let timing = self.config.alert_timing;
        if let Err(e) = show_notice(&host, &self.scheduler, timing, message, kind) {
            log::error!("Failed to show alert: {}", e);
        }
    }

    fn show_feedback_message(&self, text: &str, is_success: bool) {
        let host = FeedbackHost {
            document: &self.document,
        };
        let kind = NoticeKind::from_success(is_success);
        log::info!("{} {}", kind.emoji(), text);
        let timing = self.config.feedback_timing;
        if let Err(e) = show_notice(&host, &self.scheduler, timing, text, kind) {
            log::error!("Failed to show feedback message: {}", e);
        }
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = gloo_utils::window().location().set_href(url) {
            log::error!("Failed to navigate to {}: {:?}", url, e);
        }
    }

    fn set_action_buttons_disabled(&self, disabled: bool) {
        let buttons = match self.document.query_selector_all(ACTION_BUTTONS_SELECTOR) {
            Ok(buttons) => buttons,
            Err(e) => {
                log::warn!("Failed to query action buttons: {:?}", e);
                return;
            }
        };

        for index in 0..buttons.length() {
            if let Some(button) = buttons
                .item(index)
                .and_then(|node| node.dyn_into::<HtmlButtonElement>().ok())
            {
                button.set_disabled(disabled);
            }
        }
    }

    fn current_image_id(&self) -> Option<ImageId> {
        let container = self.result_container().ok()?;
        ImageId::from_attribute(container.get_attribute(IMAGE_ID_ATTRIBUTE))
    }

    fn reveal_result(&self) {
        if let Err(e) = self.try_reveal_result() {
            log::warn!("Failed to reveal result: {}", e);
        }
    }

    fn present_result(&self, image_id: &ImageId, original_src: &str, segmented_src: &str) {
        if let Err(e) = self.try_present_result(image_id, original_src, segmented_src) {
            log::error!("Failed to present result: {}", e);
        }
    }

    fn dismiss_result(&self) {
        if let Err(e) = self.try_dismiss_result() {
            log::warn!("Failed to dismiss result: {}", e);
        }
    }
}
