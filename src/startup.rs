use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{handlers, middleware::request_id_middleware, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Google authorization flow routes
    let google_routes = Router::new()
        .route("/auth", get(handlers::google_handler::get_auth_url))
        .route("/callback", get(handlers::google_handler::token_callback))
        .route("/create-event", post(handlers::google_handler::create_event));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/employees",
            get(handlers::employees_handler::get_employees)
                .post(handlers::employees_handler::replace_employees)
                .delete(handlers::employees_handler::delete_employee),
        )
        .route(
            "/api/leave-request",
            post(handlers::leave_handler::submit_leave_request),
        )
        .nest("/api/google", google_routes)
        .route(
            "/api/auth/callback/google",
            get(handlers::google_handler::event_callback),
        )
        .route(
            "/api/add-calendar-event",
            post(handlers::google_handler::add_calendar_event),
        )
        .route("/leave-request", get(result_page))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// The page the authorization flow redirects back to, rendering the
/// success / error / grant state carried in the query string.
async fn result_page() -> Html<&'static str> {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Leave Request</title>
</head>
<body>
    <h1>Leave Request</h1>
    <p id="status"></p>
    <script>
        const params = new URLSearchParams(window.location.search);
        const status = document.getElementById('status');
        if (params.get('success') === 'true') {
            const link = params.get('eventLink');
            status.textContent = 'Leave added to calendar. ';
            if (link) {
                const a = document.createElement('a');
                a.href = link;
                a.textContent = 'View event';
                status.appendChild(a);
            }
        } else if (params.has('grant')) {
            status.textContent = 'Calendar access granted.';
        } else if (params.has('error')) {
            status.textContent = 'Something went wrong: ' + params.get('error');
        } else {
            status.textContent = 'Submit a leave request to get started.';
        }
    </script>
</body>
</html>
    "#,
    )
}

async fn swagger_ui() -> Html<&'static str> {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>LeaveDesk API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
            });
        };
    </script>
</body>
</html>
    "#,
    )
}
