use std::rc::Rc;

use crate::{context::Clock, error::FetchError, telemetry::Telemetry};

use super::{
    cache::{KeyValueStore, RepoCache},
    model::{select_showcase, RepoSummary},
    source::RepoSource,
    status::LoadStatus,
};

pub trait ProjectsView {
    fn render(&self, repos: &[RepoSummary]);
    fn set_status(&self, status: &LoadStatus);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    CacheFirst,
    ForceRefresh,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    FromCache,
    Fetched { count: usize },
    FallbackToCache(FetchError),
    Failed(FetchError),
}

pub struct ProjectsLoader<S, K, V> {
    source: S,
    cache: RepoCache<K>,
    view: V,
    clock: Rc<dyn Clock>,
    telemetry: Telemetry,
    display_limit: usize,
}

impl<S, K, V> ProjectsLoader<S, K, V>
where
    S: RepoSource,
    K: KeyValueStore,
    V: ProjectsView,
{
    pub fn new(
        source: S,
        cache: RepoCache<K>,
        view: V,
        clock: Rc<dyn Clock>,
        telemetry: Telemetry,
        display_limit: usize,
    ) -> Self {
        Self {
            source,
            cache,
            view,
            clock,
            telemetry,
            display_limit,
        }
    }

    pub async fn load(&self, mode: LoadMode) -> LoadOutcome {
        if mode == LoadMode::CacheFirst && self.render_from_cache() {
            self.telemetry
                .debug("projects_rendered", serde_json::json!({ "source": "cache" }));
            return LoadOutcome::FromCache;
        }

        self.telemetry.debug(
            "projects_load_started",
            serde_json::json!({ "forced": mode == LoadMode::ForceRefresh }),
        );
        self.view.set_status(&LoadStatus::Requesting);

        match self.source.list_repos().await {
            Ok(repos) => {
                let showcase = select_showcase(repos, self.display_limit);
                let now = self.clock.now_millis();

                self.view.render(&showcase);
                self.cache.save(&showcase, now);

                let status = if showcase.is_empty() {
                    LoadStatus::UpdatedEmpty
                } else {
                    LoadStatus::Updated { at: now }
                };
                self.view.set_status(&status);

                self.telemetry.info(
                    "projects_rendered",
                    serde_json::json!({ "source": "network", "count": showcase.len() }),
                );
                LoadOutcome::Fetched {
                    count: showcase.len(),
                }
            }
            Err(err) => self.fall_back(err),
        }
    }

    fn fall_back(&self, err: FetchError) -> LoadOutcome {
        let showed_cache = self.render_from_cache();

        self.telemetry.warn(
            "projects_fetch_failed",
            serde_json::json!({
                "error_class": err.error_class(),
                "error": err.to_string(),
                "showed_cache": showed_cache,
            }),
        );

        let status = match (err.is_rate_limited(), showed_cache) {
            (true, true) => LoadStatus::RateLimitedShowingCache,
            (true, false) => LoadStatus::RateLimited,
            (false, true) => LoadStatus::UpdateFailedShowingCache,
            (false, false) => LoadStatus::Failed,
        };
        self.view.set_status(&status);

        if showed_cache {
            LoadOutcome::FallbackToCache(err)
        } else {
            LoadOutcome::Failed(err)
        }
    }

    fn render_from_cache(&self) -> bool {
        let Some(entry) = self.cache.load() else {
            return false;
        };

        self.view.render(&entry.repos);
        self.view.set_status(&LoadStatus::ShowingCache {
            saved_at: entry.timestamp,
        });
        true
    }
}
