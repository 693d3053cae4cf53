use axum::{
    http::header,
    response::{IntoResponse, Response},
    routing, Router,
};

const LOGO_SVG: &str = include_str!("../../assets/logo.svg");
const STYLE_CSS: &str = include_str!("../../assets/style.css");

const CACHE_CONTROL: &str = "public, max-age=3600";

pub fn router() -> Router<()> {
    Router::new()
        .route("/assets/logo.svg", routing::get(logo))
        .route("/assets/style.css", routing::get(style))
}

async fn logo() -> Response {
    asset("image/svg+xml", LOGO_SVG)
}

async fn style() -> Response {
    asset("text/css; charset=utf-8", STYLE_CSS)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}
