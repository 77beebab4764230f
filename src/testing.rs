use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use futures_util::future::{self, FutureExt, LocalBoxFuture};

use crate::{
    avatar::SoundClip,
    config::PageConfig,
    context::{Clock, PageContext},
    error::{FetchError, SoundError, StoreError},
    projects::{ApiRepo, KeyValueStore, LoadStatus, ProjectsView, RepoSource, RepoSummary},
    telemetry::{EventSink, LogLevel, Telemetry},
};

pub fn repo(name: &str) -> RepoSummary {
    RepoSummary {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        language: Some("Rust".to_string()),
        star_count: 3,
        html_url: format!("https://github.com/octocat/{name}"),
        pushed_at: None,
    }
}

pub struct FixedClock(Cell<i64>);

impl FixedClock {
    pub fn at(millis: i64) -> Self {
        Self(Cell::new(millis))
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.get()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<serde_json::Value>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.events.borrow().clone()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| event["event"].as_str().map(ToString::to_string))
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, _level: LogLevel, payload: &serde_json::Value) {
        self.events.borrow_mut().push(payload.clone());
    }
}

pub fn test_telemetry() -> (Telemetry, Rc<RecordingSink>) {
    let sink = Rc::new(RecordingSink::default());
    let telemetry = Telemetry::new(LogLevel::Debug, Rc::new(FixedClock::at(0)), sink.clone());
    (telemetry, sink)
}

pub fn test_context() -> (PageContext, Rc<RecordingSink>) {
    let (telemetry, sink) = test_telemetry();
    let context = PageContext::new(PageConfig::default(), Rc::new(FixedClock::at(0)), telemetry);
    (context, sink)
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    reads_blocked: Rc<Cell<bool>>,
    writes_blocked: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn block_reads(&self) {
        self.reads_blocked.set(true);
    }

    pub fn block_writes(&self) {
        self.writes_blocked.set(true);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.reads_blocked.get() {
            return Err(StoreError("SecurityError".to_string()));
        }
        Ok(self.get_raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.writes_blocked.get() {
            return Err(StoreError("QuotaExceededError".to_string()));
        }
        self.put_raw(key, value);
        Ok(())
    }
}

#[derive(Clone)]
pub struct ScriptedSource {
    response: Result<Vec<ApiRepo>, FetchError>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedSource {
    pub fn ok(repos: Vec<ApiRepo>) -> Self {
        Self {
            response: Ok(repos),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            response: Err(error),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RepoSource for ScriptedSource {
    fn list_repos(&self) -> LocalBoxFuture<'_, Result<Vec<ApiRepo>, FetchError>> {
        self.calls.set(self.calls.get() + 1);
        future::ready(self.response.clone()).boxed_local()
    }
}

#[derive(Clone, Default)]
pub struct RecordingView {
    renders: Rc<RefCell<Vec<Vec<RepoSummary>>>>,
    statuses: Rc<RefCell<Vec<LoadStatus>>>,
}

impl RecordingView {
    pub fn renders(&self) -> Vec<Vec<RepoSummary>> {
        self.renders.borrow().clone()
    }

    pub fn last_render(&self) -> Option<Vec<RepoSummary>> {
        self.renders.borrow().last().cloned()
    }

    pub fn statuses(&self) -> Vec<LoadStatus> {
        self.statuses.borrow().clone()
    }

    pub fn last_status_text(&self) -> String {
        self.statuses
            .borrow()
            .last()
            .map(LoadStatus::message)
            .unwrap_or_default()
    }
}

impl ProjectsView for RecordingView {
    fn render(&self, repos: &[RepoSummary]) {
        self.renders.borrow_mut().push(repos.to_vec());
    }

    fn set_status(&self, status: &LoadStatus) {
        self.statuses.borrow_mut().push(status.clone());
    }
}

pub struct ScriptedClip {
    result: Result<(), SoundError>,
    calls: RefCell<Vec<&'static str>>,
}

impl ScriptedClip {
    pub fn new(result: Result<(), SoundError>) -> Self {
        Self {
            result,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl SoundClip for ScriptedClip {
    fn rewind(&self) {
        self.calls.borrow_mut().push("rewind");
    }

    fn play(&self) -> LocalBoxFuture<'_, Result<(), SoundError>> {
        self.calls.borrow_mut().push("play");
        future::ready(self.result.clone()).boxed_local()
    }
}
