use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use futures_util::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use url::Url;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    console, window, AddEventListenerOptions, Element, Event, EventTarget, HtmlAudioElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Storage,
};

use crate::{
    avatar::SoundClip,
    context::{Clock, StopHandle, StopToken},
    error::{FetchError, SoundError, StoreError},
    physics::Viewport,
    projects::{classify_status, ApiRepo, KeyValueStore, RepoSource, GITHUB_ACCEPT},
    reveal::{RevealChange, RevealTracker, REVEAL_THRESHOLD, VISIBLE_CLASS},
    telemetry::{EventSink, LogLevel, Telemetry},
};

const REVEAL_ID_ATTRIBUTE: &str = "data-reveal-id";

pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }

    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_millis(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, level: LogLevel, payload: &serde_json::Value) {
        let line = JsValue::from_str(&payload.to_string());
        match level {
            LogLevel::Debug => console::debug_1(&line),
            LogLevel::Info => console::info_1(&line),
            LogLevel::Warn => console::warn_1(&line),
        }
    }
}

pub fn viewport_size() -> Viewport {
    let Some(win) = window() else {
        return Viewport {
            width: 1280.0,
            height: 720.0,
        };
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    Viewport { width, height }
}

pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        Self {
            storage: window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError("localStorage is not available".to_string()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StoreError(js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StoreError(js_error_message(&err)))
    }
}

pub struct GithubSource {
    endpoint: Url,
}

impl GithubSource {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl RepoSource for GithubSource {
    fn list_repos(&self) -> LocalBoxFuture<'_, Result<Vec<ApiRepo>, FetchError>> {
        async move {
            let response = Request::get(self.endpoint.as_str())
                .header("Accept", GITHUB_ACCEPT)
                .send()
                .await
                .map_err(|err| FetchError::Network(err.to_string()))?;

            classify_status(response.status())?;

            response
                .json::<Vec<ApiRepo>>()
                .await
                .map_err(|err| FetchError::Decode(err.to_string()))
        }
        .boxed_local()
    }
}

pub struct HtmlAudioClip {
    audio: HtmlAudioElement,
}

impl HtmlAudioClip {
    pub fn preload(src: &str) -> Result<Self, JsValue> {
        let audio = HtmlAudioElement::new_with_src(src)?;
        audio.set_preload("auto");
        Ok(Self { audio })
    }
}

impl SoundClip for HtmlAudioClip {
    fn rewind(&self) {
        self.audio.set_current_time(0.0);
    }

    fn play(&self) -> LocalBoxFuture<'_, Result<(), SoundError>> {
        async move {
            let promise = self
                .audio
                .play()
                .map_err(|err| SoundError::Playback(js_error_message(&err)))?;

            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| SoundError::Playback(js_error_message(&err)))
        }
        .boxed_local()
    }
}

/// An event listener that detaches itself when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);

        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        }

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

pub fn start_interval(interval_ms: u32, tick: impl FnMut() + 'static) -> Result<StopHandle, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let callback = Closure::<dyn FnMut()>::new(tick);
    let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
    let interval_id = win.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        timeout,
    )?;

    Ok(StopHandle::new(StopToken::default(), move || {
        if let Some(win) = window() {
            win.clear_interval_with_handle(interval_id);
        }
        drop(callback);
    }))
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Option<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

/// Runs `tick` once per display refresh until the returned handle is stopped.
pub fn start_animation_loop(mut tick: impl FnMut() + 'static) -> StopHandle {
    let token = StopToken::default();
    let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    let loop_token = token.clone();
    let loop_frame = frame_id.clone();
    let reschedule = slot.clone();
    *slot.borrow_mut() = Some(Closure::new(move || {
        if loop_token.is_stopped() {
            return;
        }

        tick();

        if loop_token.is_stopped() {
            return;
        }
        if let Some(callback) = reschedule.borrow().as_ref() {
            loop_frame.set(request_animation_frame(callback));
        }
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        frame_id.set(request_animation_frame(callback));
    }

    StopHandle::new(token, move || {
        if let (Some(win), Some(id)) = (window(), frame_id.get()) {
            let _ = win.cancel_animation_frame(id);
        }
        slot.borrow_mut().take();
    })
}

/// Adds the visible class to tagged elements once they are 15% in view.
pub struct RevealController {
    observer: IntersectionObserver,
    tracker: Rc<RefCell<RevealTracker<u32>>>,
    next_id: Cell<u32>,
    telemetry: Telemetry,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl RevealController {
    pub fn new(telemetry: Telemetry) -> Result<Self, JsValue> {
        let tracker = Rc::new(RefCell::new(RevealTracker::new(REVEAL_THRESHOLD)));
        let callback_tracker = tracker.clone();
        let callback_telemetry = telemetry.clone();

        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }

                    let target = entry.target();
                    let Some(id) = reveal_id(&target) else {
                        continue;
                    };

                    let change = callback_tracker
                        .borrow_mut()
                        .record(&id, entry.intersection_ratio());
                    if change == RevealChange::Revealed {
                        callback_telemetry.ok_or_warn(
                            "reveal_mark_visible",
                            target
                                .class_list()
                                .add_1(VISIBLE_CLASS)
                                .map_err(|err| js_error_message(&err)),
                        );
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            tracker,
            next_id: Cell::new(1),
            telemetry,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: Option<&Element>) {
        let Some(element) = element else {
            return;
        };

        let id = match reveal_id(element) {
            Some(id) => id,
            None => {
                let id = self.next_id.get();
                self.next_id.set(id.wrapping_add(1));
                let tagged = element
                    .set_attribute(REVEAL_ID_ATTRIBUTE, &id.to_string())
                    .map_err(|err| js_error_message(&err));
                if self.telemetry.ok_or_warn("reveal_tag_element", tagged).is_none() {
                    return;
                }
                id
            }
        };

        if self.tracker.borrow_mut().observe(id) {
            self.observer.observe(element);
        }
    }

    pub fn observe_matching(&self, root: &Element, selector: &str) {
        let Ok(nodes) = root.query_selector_all(selector) else {
            return;
        };

        for index in 0..nodes.length() {
            let element = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok());
            self.observe(element.as_ref());
        }
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
        self.tracker.borrow_mut().clear();
    }
}

fn reveal_id(element: &Element) -> Option<u32> {
    element
        .get_attribute(REVEAL_ID_ATTRIBUTE)
        .and_then(|value| value.parse().ok())
}
