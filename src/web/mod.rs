mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{debug, info};

use crate::{
    canvas::SvgCanvas,
    config::LayoutParameters,
    geometry::{Geometry, Point, Viewport},
    grazing::{GrazingRotation, RotationClock, SystemClock},
    hit::hit_test,
    interaction::{Destination, InteractionController},
    region::HoverTarget,
};

const ZOOM_TICK: Duration = Duration::from_millis(16);

/// Messages pushed to `/api/events` subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Rotation { minute: i64, active_paddock: u32 },
    Zoom { progress: f64 },
    Navigate { destination: Destination },
}

impl ServerEvent {
    fn publish(&self, tx: &broadcast::Sender<String>) {
        if let Ok(payload) = serde_json::to_string(self) {
            let _ = tx.send(payload);
        }
    }
}

struct AppState {
    controller: Mutex<InteractionController>,
    broadcaster: broadcast::Sender<String>,
    epoch: Instant,
    /// Bumped for every zoom started; a driver task only steps its own.
    zoom_generation: AtomicU64,
}

impl AppState {
    fn new(params: LayoutParameters) -> Self {
        let (tx, _) = broadcast::channel::<String>(256);
        let tx_for_nav = tx.clone();
        let controller = InteractionController::new(params, Viewport::new(800.0, 600.0))
            .on_navigate(move |destination| {
                ServerEvent::Navigate { destination }.publish(&tx_for_nav);
            });
        Self {
            controller: Mutex::new(controller),
            broadcaster: tx,
            epoch: Instant::now(),
            zoom_generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InteractionController> {
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Locks the shared controller and sizes it to the interactive view.
    fn view(&self, query: &ViewQuery) -> MutexGuard<'_, InteractionController> {
        let mut controller = self.lock();
        controller.resize(query.width, query.height);
        controller
    }

    /// Geometry for a one-off request. The shared view is left untouched.
    fn geometry_for(&self, query: &ViewQuery) -> Geometry {
        let params = self.lock().params().clone();
        Geometry::compute(&params, query.viewport())
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

pub struct ServeConfig {
    pub params: LayoutParameters,
    pub host: String,
    pub port: u16,
    /// How often the grazing rotation is re-checked for the event stream.
    pub rotation_interval: Duration,
}

pub async fn run(config: ServeConfig) -> Result<()> {
    let ServeConfig {
        params,
        host,
        port,
        rotation_interval,
    } = config;

    let rotation = GrazingRotation::from_params(&params);
    let state = Arc::new(AppState::new(params));

    if let Some(rotation) = rotation {
        let tx = state.broadcaster.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(rotation_interval);
            let mut last = None;
            loop {
                ticker.tick().await;
                let minute = SystemClock.now_minutes();
                let active_paddock = rotation.active_paddock(minute);
                if last != Some(active_paddock) {
                    last = Some(active_paddock);
                    ServerEvent::Rotation {
                        minute,
                        active_paddock,
                    }
                    .publish(&tx);
                }
            }
        });
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "cell map live (Ctrl+C to stop)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/app.js", get(script))
        .route("/api/map.svg", get(map_svg))
        .route("/api/hit", get(hit))
        .route("/api/geometry", get(geometry))
        .route("/api/click", post(click))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web UI");
}

#[derive(Debug, Clone, Deserialize)]
struct ViewQuery {
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_height")]
    height: f64,
    x: Option<f64>,
    y: Option<f64>,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

impl ViewQuery {
    fn point(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

/// Renders the shared view when the size matches it, so hover and zoom show
/// up. Any other size gets a throwaway controller.
async fn map_svg(State(state): State<Arc<AppState>>, Query(query): Query<ViewQuery>) -> Response {
    let svg = {
        let mut controller = state.lock();
        if controller.geometry().viewport == query.viewport() {
            render_view(&mut controller, &query)
        } else {
            let params = controller.params().clone();
            drop(controller);
            render_view(&mut InteractionController::new(params, query.viewport()), &query)
        }
    };
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        Body::from(Bytes::from(svg)),
    )
        .into_response()
}

fn render_view(controller: &mut InteractionController, query: &ViewQuery) -> String {
    match query.point() {
        Some(p) => {
            controller.pointer_move(p.x, p.y);
        }
        None => {
            controller.pointer_leave();
        }
    }
    let mut canvas = SvgCanvas::new(query.width, query.height);
    controller.render(&mut canvas);
    canvas.finish()
}

async fn hit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Option<HoverTarget>>, StatusCode> {
    let point = query.point().ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(hit_test(&state.geometry_for(&query), point)))
}

async fn geometry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Json<Geometry> {
    Json(state.geometry_for(&query))
}

#[derive(Debug, Serialize)]
struct ClickResponse {
    destination: Option<Destination>,
    zoom_started: bool,
}

async fn click(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ClickResponse>, StatusCode> {
    let point = query.point().ok_or(StatusCode::BAD_REQUEST)?;
    let (outcome, generation) = {
        let mut controller = state.view(&query);
        let outcome = controller.click(point.x, point.y, state.now_ms());
        let generation = outcome
            .zoom_started
            .then(|| state.zoom_generation.fetch_add(1, Ordering::SeqCst) + 1);
        (outcome, generation)
    };
    if let Some(generation) = generation {
        tokio::spawn(drive_zoom(Arc::clone(&state), generation));
    }
    Ok(Json(ClickResponse {
        destination: outcome.destination,
        zoom_started: outcome.zoom_started,
    }))
}

/// Steps zoom number `generation` until it completes, is cancelled, or a
/// newer zoom replaces it.
async fn drive_zoom(state: Arc<AppState>, generation: u64) {
    let mut ticker = tokio::time::interval(ZOOM_TICK);
    loop {
        ticker.tick().await;
        let now = state.now_ms();
        let progress = {
            let mut controller = state.lock();
            if state.zoom_generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "zoom superseded");
                return;
            }
            if controller.frame(now).is_some() {
                return;
            }
            controller.zoom().map(|zoom| zoom.progress)
        };
        match progress {
            Some(progress) => ServerEvent::Zoom { progress }.publish(&state.broadcaster),
            None => {
                debug!(generation, "zoom cancelled before completion");
                return;
            }
        }
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(LayoutParameters::default()))
    }

    fn query(x: Option<f64>, y: Option<f64>) -> ViewQuery {
        ViewQuery {
            width: 800.0,
            height: 600.0,
            x,
            y,
        }
    }

    #[test]
    fn events_are_tagged() {
        let json = serde_json::to_value(ServerEvent::Navigate {
            destination: Destination::Guild,
        })
        .unwrap();
        assert_eq!(json["type"], "navigate");
        assert_eq!(json["destination"], "guild");

        let json = serde_json::to_value(ServerEvent::Rotation {
            minute: 5,
            active_paddock: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "rotation");
        assert_eq!(json["active_paddock"], 2);
    }

    #[tokio::test]
    async fn svg_endpoint_sets_content_type() {
        let response = map_svg(State(state()), Query(query(None, None))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );
    }

    #[tokio::test]
    async fn hit_needs_a_point() {
        let result = hit(State(state()), Query(query(None, None))).await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn hit_centre_is_school() {
        let state = state();
        let centre = state.view(&query(None, None)).geometry().center;
        let Json(target) = hit(State(state), Query(query(Some(centre.x), Some(centre.y))))
            .await
            .unwrap();
        assert_eq!(target.unwrap().info.label, "Earth School");
    }

    fn sized(width: f64, height: f64, x: Option<f64>, y: Option<f64>) -> ViewQuery {
        ViewQuery {
            width,
            height,
            x,
            y,
        }
    }

    async fn click_school(state: &Arc<AppState>) -> ClickResponse {
        let centre = state.view(&query(None, None)).geometry().center;
        let Json(response) = click(
            State(Arc::clone(state)),
            Query(query(Some(centre.x), Some(centre.y))),
        )
        .await
        .unwrap();
        response
    }

    #[tokio::test]
    async fn other_sizes_leave_the_shared_view_alone() {
        let state = state();
        assert!(click_school(&state).await.zoom_started);

        let response = map_svg(
            State(Arc::clone(&state)),
            Query(sized(400.0, 300.0, Some(1.0), Some(1.0))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let centre =
            Geometry::compute(&LayoutParameters::default(), Viewport::new(1024.0, 768.0)).center;
        let Json(target) = hit(
            State(Arc::clone(&state)),
            Query(sized(1024.0, 768.0, Some(centre.x), Some(centre.y))),
        )
        .await
        .unwrap();
        assert_eq!(target.unwrap().info.label, "Earth School");
        let Json(geo) = geometry(
            State(Arc::clone(&state)),
            Query(sized(320.0, 240.0, None, None)),
        )
        .await;
        assert_eq!(geo.viewport, Viewport::new(320.0, 240.0));

        let controller = state.lock();
        assert!(controller.is_animating());
        assert_eq!(controller.geometry().viewport, Viewport::new(800.0, 600.0));
    }

    #[tokio::test]
    async fn stale_zoom_driver_steps_nothing() {
        let state = state();
        assert!(click_school(&state).await.zoom_started);
        state.lock().cancel();
        assert!(click_school(&state).await.zoom_started);
        assert_eq!(state.zoom_generation.load(Ordering::SeqCst), 2);

        // an ungated driver would run the current zoom to completion
        drive_zoom(Arc::clone(&state), 1).await;
        assert!(state.lock().is_animating());
    }

    #[tokio::test]
    async fn guild_click_publishes_navigation() {
        let state = state();
        let mut rx = state.broadcaster.subscribe();
        let inside = {
            let controller = state.view(&query(None, None));
            let geo = controller.geometry();
            geo.guild_center(0).polar(0.4, geo.to_px(40.0))
        };
        let Json(response) = click(
            State(Arc::clone(&state)),
            Query(query(Some(inside.x), Some(inside.y))),
        )
        .await
        .unwrap();
        assert_eq!(response.destination, Some(Destination::Guild));
        let payload = rx.try_recv().unwrap();
        assert!(payload.contains("\"navigate\""));
    }
}
