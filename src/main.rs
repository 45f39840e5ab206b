use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use brandforge_api::database::DatabaseManager;
use brandforge_api::{config, handlers, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, REDIS_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting brandforge-api in {:?} mode", config.environment);

    if let Err(e) = DatabaseManager::migrate().await {
        eprintln!("migration failed: {}", e);
        std::process::exit(1);
    }

    let app = app();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("brandforge-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(industry_routes())
        .merge(subindustry_routes())
        .merge(image_routes())
        .merge(logo_routes())
        .merge(social_routes())
        .merge(layout_routes())
        .layer(CorsLayer::permissive());

    if config::config().api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use brandforge_api::handlers::public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/verify-otp", post(auth::verify_otp))
        .route("/api/auth/set-password", post(auth::set_password))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh_token))
        .route("/api/auth/send-otp", post(auth::send_otp))
        .route("/api/auth/verify-otp-reset", post(auth::verify_otp_reset))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/update-profile", post(auth::update_profile))
}

fn user_routes() -> Router {
    use brandforge_api::handlers::public::users;

    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
}

fn industry_routes() -> Router {
    use brandforge_api::handlers::public::industries;

    Router::new()
        .route(
            "/api/industries",
            get(industries::list).post(industries::create),
        )
        // Registered before /:id so the literal segment wins
        .route("/api/industries/clear-cache", get(industries::clear_cache))
        .route(
            "/api/industries/:id",
            get(industries::get)
                .put(industries::update)
                .delete(industries::delete),
        )
}

fn subindustry_routes() -> Router {
    use axum::routing::post;
    use brandforge_api::handlers::public::{content, subindustries};

    Router::new()
        .route("/api/subindustries/bulk", post(subindustries::create_bulk))
        .route("/api/subindustries", get(subindustries::list))
        .route(
            "/api/subindustries/:id",
            get(subindustries::get)
                .put(subindustries::update)
                .delete(subindustries::delete),
        )
        .route(
            "/api/subindustries/:id/content/bulk",
            post(content::create_bulk),
        )
        .route(
            "/api/subindustries/:id/content",
            get(content::list).delete(content::delete_all),
        )
}

fn image_routes() -> Router {
    use axum::routing::post;
    use brandforge_api::handlers::public::images;

    Router::new()
        .route(
            "/api/subindustries/:id/images/multiple",
            post(images::ingest),
        )
        .route("/api/subindustries/:id/images/grouped", get(images::grouped))
        .route(
            "/api/subindustries/:id/images",
            get(images::list).delete(images::delete),
        )
        .layer(DefaultBodyLimit::max(config::config().api.max_upload_bytes))
}

fn logo_routes() -> Router {
    use brandforge_api::handlers::protected::logo;

    Router::new()
        .route(
            "/api/logo",
            get(logo::get)
                .post(logo::create)
                .patch(logo::update)
                .delete(logo::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn social_routes() -> Router {
    use axum::routing::post;
    use brandforge_api::handlers::public::social;

    Router::new()
        .route("/api/social-media/meta/list", get(social::list))
        .route("/api/social-media/meta/callback", get(social::callback))
        .route("/api/social-media/meta/refresh/:id", post(social::refresh))
}

fn layout_routes() -> Router {
    use axum::routing::post;
    use brandforge_api::handlers::public::layout;

    Router::new().route("/api/imagelayout/create", post(layout::create))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Brandforge API",
            "version": version,
            "description": "Marketing-content platform backend",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/* (public - registration, OTP, login, profile)",
                "users": "/api/users[/:id] (public)",
                "industries": "/api/industries[/:id], /api/industries/clear-cache (public)",
                "subindustries": "/api/subindustries[/bulk|/:id] (public)",
                "content": "/api/subindustries/:id/content[/bulk] (public)",
                "images": "/api/subindustries/:id/images[/multiple|/grouped] (public)",
                "logo": "/api/logo (protected - JWT)",
                "social": "/api/social-media/meta/* (public - OAuth linking)",
                "imagelayout": "/api/imagelayout/create (public)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
