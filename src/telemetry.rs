use std::{cmp::Ordering, rc::Rc};

use crate::context::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
                LogLevel::Warn => 2,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }
}

/// Destination for encoded events. The browser build writes to the console.
pub trait EventSink {
    fn emit(&self, level: LogLevel, payload: &serde_json::Value);
}

#[derive(Clone)]
pub struct Telemetry {
    level: LogLevel,
    clock: Rc<dyn Clock>,
    sink: Rc<dyn EventSink>,
}

impl Telemetry {
    pub fn new(level: LogLevel, clock: Rc<dyn Clock>, sink: Rc<dyn EventSink>) -> Self {
        Self { level, clock, sink }
    }

    pub fn debug(&self, event: &str, fields: serde_json::Value) {
        self.log_event(LogLevel::Debug, event, fields);
    }

    pub fn info(&self, event: &str, fields: serde_json::Value) {
        self.log_event(LogLevel::Info, event, fields);
    }

    pub fn warn(&self, event: &str, fields: serde_json::Value) {
        self.log_event(LogLevel::Warn, event, fields);
    }

    /// Unwraps `result`, reporting a failure as a `dom_call_failed` warning
    /// tagged with `operation` instead of dropping it.
    pub fn ok_or_warn<T, E: std::fmt::Display>(
        &self,
        operation: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.warn(
                    "dom_call_failed",
                    serde_json::json!({ "operation": operation, "error": err.to_string() }),
                );
                None
            }
        }
    }

    fn log_event(&self, level: LogLevel, event: &str, fields: serde_json::Value) {
        if level < self.level {
            return;
        }

        let mut payload = serde_json::Map::new();
        payload.insert(
            "ts".to_string(),
            serde_json::Value::Number(serde_json::Number::from(self.clock.now_millis())),
        );
        payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
        payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

        if let serde_json::Value::Object(extra) = fields {
            for (key, value) in extra {
                payload.insert(key, value);
            }
        }

        self.sink.emit(level, &serde_json::Value::Object(payload));
    }
}
