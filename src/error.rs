use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache entry unreadable: {0}")]
    Read(String),
    #[error("cache entry not written: {0}")]
    Write(String),
}

impl CacheError {
    pub fn event(&self) -> &'static str {
        match self {
            Self::Read(_) => "cache_read_failed",
            Self::Write(_) => "cache_write_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("provider rate limit reached")]
    RateLimited,
    #[error("provider answered with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Network(String),
    #[error("response body could not be decoded: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Status(_) => "status",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    #[error("playback rejected: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage unavailable: {0}")]
pub struct StoreError(pub String);
