//! In-memory fakes for the page, the transport and the timer queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::{ALERT_DISPLAY_MS, FADE_OUT_MS, FEEDBACK_DISPLAY_MS};
use crate::controller::Page;
use crate::notice::{show_notice, NoticeHost, NoticeSurface, NoticeTiming, Scheduler};
use crate::services::http::{ApiRequest, ApiResponse, Transport};
use crate::types::{AppError, AppResult, ImageId, NoticeKind};

// =============================================================================
// Scheduler
// =============================================================================

struct Task {
    due: u32,
    seq: usize,
    run: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: u32,
    seq: usize,
    queue: Vec<Task>,
}

/// Timer queue advanced by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    /// Run every task due at or before `ms`, in due order.
    pub fn advance_to(&self, ms: u32) {
        loop {
            let task = {
                let mut clock = self.clock.borrow_mut();
                let next = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= ms)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(index) => {
                        let task = clock.queue.remove(index);
                        clock.now = task.due;
                        task
                    }
                    None => {
                        clock.now = ms;
                        break;
                    }
                }
            };
            (task.run)();
        }
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + delay_ms;
        let seq = clock.seq;
        clock.seq += 1;
        clock.queue.push(Task { due, seq, run: task });
    }
}

// =============================================================================
// Notices
// =============================================================================

#[derive(Debug)]
struct NodeState {
    text: String,
    kind: NoticeKind,
    faded: bool,
    attached: bool,
}

/// A notice element in a [`FakeBoard`].
#[derive(Clone, Debug)]
pub struct FakeNode(Rc<RefCell<NodeState>>);

impl FakeNode {
    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn kind(&self) -> NoticeKind {
        self.0.borrow().kind
    }

    pub fn is_faded(&self) -> bool {
        self.0.borrow().faded
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }
}

impl NoticeSurface for FakeNode {
    fn fade_out(&self) {
        self.0.borrow_mut().faded = true;
    }

    fn remove(&self) {
        self.0.borrow_mut().attached = false;
    }
}

/// Container holding one notice variant.
#[derive(Clone, Default)]
pub struct FakeBoard {
    nodes: Rc<RefCell<Vec<FakeNode>>>,
}

impl FakeBoard {
    pub fn attached(&self) -> Vec<FakeNode> {
        self.nodes
            .borrow()
            .iter()
            .filter(|n| n.is_attached())
            .cloned()
            .collect()
    }
}

impl NoticeHost for FakeBoard {
    type Surface = FakeNode;

    fn existing(&self) -> Option<FakeNode> {
        self.attached().into_iter().next()
    }

    fn insert(&self, text: &str, kind: NoticeKind) -> AppResult<FakeNode> {
        let node = FakeNode(Rc::new(RefCell::new(NodeState {
            text: text.to_string(),
            kind,
            faded: false,
            attached: true,
        })));
        self.nodes.borrow_mut().push(node.clone());
        Ok(node)
    }
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Default)]
struct Exchange {
    requests: Vec<ApiRequest<String>>,
    replies: VecDeque<AppResult<ApiResponse>>,
}

/// Records requests and answers from a queue of canned replies.
///
/// Forms are plain strings. An empty queue answers `200` with no body.
#[derive(Clone, Default)]
pub struct FakeTransport {
    exchange: Rc<RefCell<Exchange>>,
}

impl FakeTransport {
    pub fn respond(&self, status: u16, body: &str) {
        self.exchange
            .borrow_mut()
            .replies
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, reason: &str) {
        self.exchange
            .borrow_mut()
            .replies
            .push_back(Err(AppError::Network(reason.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest<String>> {
        self.exchange.borrow().requests.clone()
    }
}

impl Transport for FakeTransport {
    type Form = String;

    async fn send(&self, request: ApiRequest<String>) -> AppResult<ApiResponse> {
        let mut exchange = self.exchange.borrow_mut();
        exchange.requests.push(request);
        exchange
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, "")))
    }
}

// =============================================================================
// Page
// =============================================================================

#[derive(Debug)]
pub struct PageState {
    pub navigations: Vec<String>,
    pub buttons_disabled: Vec<bool>,
    pub button_toggles: Vec<bool>,
    pub image_id: Option<ImageId>,
    pub original_src: Option<String>,
    pub segmented_src: Option<String>,
    pub result_displayed: bool,
    pub result_opacity: f32,
    pub file_input_cleared: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            navigations: Vec::new(),
            buttons_disabled: vec![false, false],
            button_toggles: Vec::new(),
            image_id: None,
            original_src: None,
            segmented_src: None,
            result_displayed: false,
            result_opacity: 1.0,
            file_input_cleared: false,
        }
    }
}

/// Page with two action buttons, an alert area and a feedback slot.
#[derive(Clone, Default)]
pub struct FakePage {
    pub state: Rc<RefCell<PageState>>,
    pub alerts: FakeBoard,
    pub feedback: FakeBoard,
    pub scheduler: ManualScheduler,
}

impl FakePage {
    pub fn with_image(id: &str) -> Self {
        let page = Self::default();
        page.state.borrow_mut().image_id = Some(ImageId::new(id));
        page.state.borrow_mut().result_displayed = true;
        page
    }
}

impl Page for FakePage {
    fn show_alert(&self, message: &str, kind: NoticeKind) {
        let timing = NoticeTiming::new(ALERT_DISPLAY_MS, FADE_OUT_MS);
        let _ = show_notice(&self.alerts, &self.scheduler, timing, message, kind);
    }

    fn show_feedback_message(&self, text: &str, is_success: bool) {
        let timing = NoticeTiming::new(FEEDBACK_DISPLAY_MS, FADE_OUT_MS);
        let kind = NoticeKind::from_success(is_success);
        let _ = show_notice(&self.feedback, &self.scheduler, timing, text, kind);
    }

    fn navigate(&self, url: &str) {
        self.state.borrow_mut().navigations.push(url.to_string());
    }

    fn set_action_buttons_disabled(&self, disabled: bool) {
        let mut state = self.state.borrow_mut();
        state.buttons_disabled.iter_mut().for_each(|b| *b = disabled);
        state.button_toggles.push(disabled);
    }

    fn current_image_id(&self) -> Option<ImageId> {
        self.state.borrow().image_id.clone()
    }

    fn reveal_result(&self) {
        let mut state = self.state.borrow_mut();
        state.result_displayed = true;
        state.result_opacity = 1.0;
    }

    fn present_result(&self, image_id: &ImageId, original_src: &str, segmented_src: &str) {
        let mut state = self.state.borrow_mut();
        state.image_id = Some(image_id.clone());
        state.original_src = Some(original_src.to_string());
        state.segmented_src = Some(segmented_src.to_string());
        state.result_displayed = true;
    }

    fn dismiss_result(&self) {
        self.state.borrow_mut().result_opacity = 0.0;
        let state = self.state.clone();
        self.scheduler.schedule(
            FADE_OUT_MS,
            Box::new(move || {
                let mut state = state.borrow_mut();
                state.result_displayed = false;
                state.file_input_cleared = true;
            }),
        );
    }
}
