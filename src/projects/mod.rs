mod cache;
mod loader;
mod model;
mod source;
mod status;

pub use cache::{cache_key, KeyValueStore, RepoCache};
pub use loader::{LoadMode, LoadOutcome, ProjectsLoader, ProjectsView};
pub use model::{ApiRepo, CacheEntry, RepoSummary};
pub use source::{classify_status, repos_endpoint, RepoSource, GITHUB_ACCEPT};
pub use status::{format_month_year, LoadStatus};

pub const GRID_SELECTOR: &str = "#projects-grid";
pub const STATUS_SELECTOR: &str = "#projects-status";
pub const REFRESH_SELECTOR: &str = "#projects-refresh";
