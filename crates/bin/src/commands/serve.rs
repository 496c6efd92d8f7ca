//! Serve command - runs the Gatehouse layout server.

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tokio::signal::unix::{SignalKind, signal};
use tower_cookies::{CookieManagerLayer, Cookies};

use gatehouse::{
    Clock, SessionResolver, SessionStore, SessionValidator, SystemClock, User, UserDirectory,
    config::SessionConfig,
    session::store::{generate_session_token, session_id_for_token},
};

use crate::cli::ServeArgs;
use crate::session::{removal_cookie, session_cookie};

/// How often expired sessions are swept from the store
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    resolver: Arc<SessionResolver<Arc<dyn SessionValidator>>>,
    sessions: SessionStore,
    session_config: Arc<SessionConfig>,
}

impl AppState {
    /// State that validates tokens against `sessions` itself.
    pub fn new(sessions: SessionStore, session_config: SessionConfig) -> Self {
        let validator: Arc<dyn SessionValidator> = Arc::new(sessions.clone());
        Self::with_validator(validator, sessions, session_config)
    }

    /// State that resolves layouts through a separate validator.
    ///
    /// `sessions` is still used for logout and health reporting.
    pub fn with_validator(
        validator: Arc<dyn SessionValidator>,
        sessions: SessionStore,
        session_config: SessionConfig,
    ) -> Self {
        let resolver =
            SessionResolver::new(validator).with_cookie_name(session_config.cookie_name.clone());
        Self {
            resolver: Arc::new(resolver),
            sessions,
            session_config: Arc::new(session_config),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/layout", get(handle_layout))
        .route("/logout", post(handle_logout))
        .route("/health", get(handle_health))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Run the Gatehouse server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session_config = args.session_config()?;

    let users = UserDirectory::new();
    let sessions = SessionStore::new(Arc::new(users.clone())).with_config(&session_config);

    if let Some(username) = &args.demo_user {
        let user = User::new(username.clone(), SystemClock.now());
        users.insert(user.clone()).await?;
        let token = generate_session_token();
        sessions.create_session(&token, &user.id).await;
        // The logged cookie is a live credential; only for local use
        tracing::info!(
            username = %user.username,
            cookie = %session_cookie(&session_config, token),
            "Demo session created"
        );
    }

    let purge_sessions = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            purge_sessions.purge_expired().await;
        }
    });

    let app = router(AppState::new(sessions, session_config));

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Gatehouse listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET  /api/layout   - Layout data for the current session");
    println!("  POST /logout       - End the current session");
    println!("  GET  /health       - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!("Failed to set up SIGTERM handler: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
        _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for GET /api/layout - Resolve the session cookie to layout data
async fn handle_layout(State(state): State<AppState>, cookies: Cookies) -> Response {
    match state.resolver.load(&cookies).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!("Session validation failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session validation failed",
            )
                .into_response()
        }
    }
}

/// Handler for POST /logout - Destroy the session and drop the cookie
async fn handle_logout(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    if let Some(token) = state.resolver.session_token(&cookies) {
        if let Err(e) = state
            .sessions
            .invalidate_session(&session_id_for_token(&token))
            .await
        {
            tracing::debug!("Logout without a live session: {e}");
        }
        cookies.remove(removal_cookie(&state.session_config));
    }
    Redirect::to("/")
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    sessions: usize,
}

/// Handler for GET /health - Health check endpoint
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        sessions: state.sessions.session_count().await,
    })
}
