use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlElement, MouseEvent, PageTransitionEvent,
    Window,
};
use yew::prelude::*;

use crate::{
    avatar::{play_from_start, AVATAR_SELECTOR},
    browser::{
        js_error_message, start_animation_loop, start_interval, viewport_size, BrowserClock,
        ConsoleSink, GithubSource, HtmlAudioClip, Listener, LocalStorageStore, RevealController,
    },
    config::PageConfig,
    context::{Clock, PageContext},
    physics::{transform_for, FloatingSquare, SquarePhysics, SQUARE_CLASS},
    projects::{
        repos_endpoint, LoadMode, LoadStatus, ProjectsLoader, ProjectsView, RepoCache,
        RepoSummary, GRID_SELECTOR, REFRESH_SELECTOR, STATUS_SELECTOR,
    },
    reveal::REVEAL_SELECTOR,
    rotator::{SubtitleRotator, SUBTITLE_SELECTOR},
    telemetry::Telemetry,
};

type GalleryLoader = ProjectsLoader<GithubSource, LocalStorageStore, GalleryView>;

fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

fn report_missing(context: &PageContext, selector: &str) {
    context
        .telemetry()
        .debug("element_missing", serde_json::json!({ "selector": selector }));
}

fn listen(
    telemetry: &Telemetry,
    operation: &str,
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    callback: impl FnMut(Event) + 'static,
) -> Option<Listener> {
    let listener =
        Listener::new(target, event, passive, callback).map_err(|err| js_error_message(&err));
    telemetry.ok_or_warn(operation, listener)
}

#[derive(Clone, PartialEq, Default)]
struct GalleryState {
    repos: Option<Rc<Vec<RepoSummary>>>,
}

impl Reducible for GalleryState {
    type Action = Vec<RepoSummary>;

    fn reduce(self: Rc<Self>, repos: Self::Action) -> Rc<Self> {
        Rc::new(Self {
            repos: Some(Rc::new(repos)),
        })
    }
}

struct GalleryView {
    dispatcher: UseReducerDispatcher<GalleryState>,
    status: Option<Element>,
}

impl ProjectsView for GalleryView {
    fn render(&self, repos: &[RepoSummary]) {
        self.dispatcher.dispatch(repos.to_vec());
    }

    fn set_status(&self, status: &LoadStatus) {
        if let Some(node) = self.status.as_ref() {
            node.set_text_content(Some(&status.message()));
        }
    }
}

fn build_loader(
    context: &PageContext,
    dispatcher: UseReducerDispatcher<GalleryState>,
    status: Option<Element>,
) -> Result<GalleryLoader, url::ParseError> {
    let config = context.config();
    let endpoint = repos_endpoint(&config.github_user, config.repo_request_limit)?;
    let telemetry = context.telemetry().clone();
    let cache = RepoCache::new(LocalStorageStore::new(), &config.github_user, telemetry.clone());

    Ok(ProjectsLoader::new(
        GithubSource::new(endpoint),
        cache,
        GalleryView { dispatcher, status },
        context.clock(),
        telemetry,
        config.repo_display_limit,
    ))
}

fn spawn_load(loader: &Rc<GalleryLoader>, mode: LoadMode) {
    let loader = loader.clone();
    spawn_local(async move {
        loader.load(mode).await;
    });
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    repo: RepoSummary,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let repo = &props.repo;

    html! {
        <article class="card reveal">
            <div class="project__header">
                <h3 class="m-0">{repo.name.clone()}</h3>
                if let Some(language) = repo.language.clone() {
                    <span class="pill">{language}</span>
                }
            </div>
            <p class="skill__desc">{repo.description_or_placeholder().to_string()}</p>
            <div class="project__meta">
                <span>{format!("★ {}", repo.star_count)}</span>
                <a class="link-accent" href={repo.html_url.clone()} target="_blank" rel="noreferrer">
                    {"Ver en GitHub"}
                </a>
            </div>
            <p class="muted m-0" style="margin-top: 0.4rem;">{repo.updated_label()}</p>
        </article>
    }
}

#[derive(Properties)]
struct GalleryProps {
    context: Rc<PageContext>,
    reveal: Option<Rc<RevealController>>,
    grid: Element,
    status: Option<Element>,
    refresh: Option<Element>,
}

impl PartialEq for GalleryProps {
    fn eq(&self, other: &Self) -> bool {
        let same_reveal = match (&self.reveal, &other.reveal) {
            (Some(left), Some(right)) => Rc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };

        Rc::ptr_eq(&self.context, &other.context)
            && same_reveal
            && self.grid == other.grid
            && self.status == other.status
            && self.refresh == other.refresh
    }
}

#[function_component(ProjectsGallery)]
fn projects_gallery(props: &GalleryProps) -> Html {
    let gallery = use_reducer(GalleryState::default);

    {
        let dispatcher = gallery.dispatcher();
        let context = props.context.clone();
        let status = props.status.clone();
        let refresh = props.refresh.clone();
        use_effect_with((), move |_| {
            let refresh_listener = match build_loader(&context, dispatcher, status) {
                Ok(loader) => {
                    let loader = Rc::new(loader);
                    spawn_load(&loader, LoadMode::CacheFirst);

                    refresh.and_then(|button| {
                        listen(
                            context.telemetry(),
                            "listen_refresh_click",
                            &button,
                            "click",
                            false,
                            move |_| spawn_load(&loader, LoadMode::ForceRefresh),
                        )
                    })
                }
                Err(err) => {
                    context.telemetry().warn(
                        "projects_fetch_failed",
                        serde_json::json!({ "error_class": "endpoint", "error": err.to_string() }),
                    );
                    None
                }
            };

            move || drop(refresh_listener)
        });
    }

    {
        let reveal = props.reveal.clone();
        let grid = props.grid.clone();
        use_effect_with(gallery.repos.clone(), move |_| {
            if let Some(reveal) = reveal {
                reveal.observe_matching(&grid, REVEAL_SELECTOR);
            }
            || ()
        });
    }

    let Some(repos) = gallery.repos.clone() else {
        return html! {};
    };

    if repos.is_empty() {
        return html! {
            <p class="muted">{"No hay repositorios públicos aún."}</p>
        };
    }

    html! {
        <>
            { for repos.iter().map(|repo| html! {
                <ProjectCard key={repo.html_url.clone()} repo={repo.clone()} />
            }) }
        </>
    }
}

fn mount_projects(context: &Rc<PageContext>, document: &Document, reveal: Option<Rc<RevealController>>) {
    let Some(grid) = query(document, GRID_SELECTOR) else {
        report_missing(context, GRID_SELECTOR);
        return;
    };

    grid.set_inner_html("");
    let props = GalleryProps {
        context: context.clone(),
        reveal,
        grid: grid.clone(),
        status: query(document, STATUS_SELECTOR),
        refresh: query(document, REFRESH_SELECTOR),
    };

    let handle = yew::Renderer::<ProjectsGallery>::with_root_and_props(grid, props).render();
    context.on_teardown(move || handle.destroy());
}

fn start_reveal(context: &PageContext, document: &Document) -> Option<Rc<RevealController>> {
    let controller = match RevealController::new(context.telemetry().clone()) {
        Ok(controller) => Rc::new(controller),
        Err(err) => {
            context.telemetry().warn(
                "reveal_unavailable",
                serde_json::json!({ "error": js_error_message(&err) }),
            );
            return None;
        }
    };

    if let Some(root) = document.document_element() {
        controller.observe_matching(&root, REVEAL_SELECTOR);
    }

    let disconnect = controller.clone();
    context.on_teardown(move || disconnect.disconnect());
    Some(controller)
}

fn start_subtitle(context: &PageContext, document: &Document) {
    let Some(subtitle) = query(document, SUBTITLE_SELECTOR) else {
        report_missing(context, SUBTITLE_SELECTOR);
        return;
    };

    let mut rotator = SubtitleRotator::hero();
    let started = start_interval(context.config().rotation_interval_ms, move || {
        subtitle.set_text_content(Some(rotator.tick()));
    });

    match started {
        Ok(handle) => context.track(handle),
        Err(err) => context.telemetry().warn(
            "subtitle_timer_failed",
            serde_json::json!({ "error": js_error_message(&err) }),
        ),
    }
}

fn wire_avatar(context: &PageContext, document: &Document) {
    let Some(avatar) = query(document, AVATAR_SELECTOR) else {
        report_missing(context, AVATAR_SELECTOR);
        return;
    };

    let clip = match HtmlAudioClip::preload(&context.config().avatar_sound) {
        Ok(clip) => Rc::new(clip),
        Err(err) => {
            context.telemetry().warn(
                "sound_playback_failed",
                serde_json::json!({ "error": js_error_message(&err) }),
            );
            return;
        }
    };

    let telemetry = context.telemetry().clone();
    let listener = listen(
        context.telemetry(),
        "listen_avatar_click",
        &avatar,
        "click",
        false,
        move |_| {
            let clip = clip.clone();
            let telemetry = telemetry.clone();
            spawn_local(async move {
                play_from_start(&*clip, &telemetry).await;
            });
        },
    );

    if let Some(listener) = listener {
        context.on_teardown(move || drop(listener));
    }
}

fn start_floating_square(context: &PageContext, window: &Window, document: &Document) {
    let Some(body) = document.body() else {
        report_missing(context, "body");
        return;
    };

    let created = document
        .create_element("div")
        .map_err(|err| js_error_message(&err));
    let Some(square) = context
        .telemetry()
        .ok_or_warn("create_square", created)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    square.set_class_name(SQUARE_CLASS);
    let appended = body
        .append_child(&square)
        .map_err(|err| js_error_message(&err));
    if context.telemetry().ok_or_warn("append_square", appended).is_none() {
        return;
    }

    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let state = Rc::new(std::cell::RefCell::new(FloatingSquare::spawn(
        viewport_size(),
        scroll_y,
        SquarePhysics::default(),
    )));

    let pointer_state = state.clone();
    let on_pointer = listen(
        context.telemetry(),
        "listen_pointer_move",
        window,
        "mousemove",
        false,
        move |event: Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                pointer_state
                    .borrow_mut()
                    .pointer_moved(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        },
    );

    let scroll_state = state.clone();
    let on_scroll = listen(
        context.telemetry(),
        "listen_scroll",
        window,
        "scroll",
        true,
        move |_| {
            if let Some(win) = web_sys::window() {
                scroll_state
                    .borrow_mut()
                    .scrolled(win.scroll_y().unwrap_or(0.0));
            }
        },
    );

    let clock = context.clock();
    let frame_square = square.clone();
    let handle = start_animation_loop(move || {
        let position = state
            .borrow_mut()
            .step(clock.now_millis() as f64, viewport_size());
        let _ = frame_square
            .style()
            .set_property("transform", &transform_for(position));
    });

    context.track(handle);
    context.on_teardown(move || {
        drop(on_pointer);
        drop(on_scroll);
        square.remove();
    });
}

pub fn run() {
    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let body = document.body();
    let config = PageConfig::from_lookup(|name| {
        body.as_ref()
            .and_then(|body| body.get_attribute(&format!("data-{name}")))
    });
    let clock: Rc<dyn Clock> = Rc::new(BrowserClock);
    let telemetry = Telemetry::new(config.log_level, clock.clone(), Rc::new(ConsoleSink));
    let context = Rc::new(PageContext::new(config, clock, telemetry));

    let reveal = start_reveal(&context, &document);
    start_subtitle(&context, &document);
    wire_avatar(&context, &document);
    mount_projects(&context, &document, reveal);
    start_floating_square(&context, &window, &document);

    context.telemetry().info(
        "page_booted",
        serde_json::json!({ "github_user": context.config().github_user.as_str() }),
    );

    let hide_context = context.clone();
    let on_pagehide = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .map(PageTransitionEvent::persisted)
            .unwrap_or(false);
        hide_context.page_hidden(persisted);
    });
    let registered = window
        .add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())
        .map_err(|err| js_error_message(&err));
    if context
        .telemetry()
        .ok_or_warn("listen_pagehide", registered)
        .is_some()
    {
        // Lives as long as the page.
        on_pagehide.forget();
    }
}
