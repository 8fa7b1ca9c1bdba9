use actix_web::{get, web, HttpResponse, Responder};
use actix_web_lab::respond::Html;

use crate::error::ApiError;

// Frontend files are compiled into the binary, there is no static directory to deploy
const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");
const STYLES_CSS: &str = include_str!("../static/styles.css");

/// Activity listing and signup page
#[get("/static/index.html")]
pub async fn index_html() -> impl Responder {
    Html(INDEX_HTML.to_string())
}

/// Must be registered after `index_html`, routes are matched in registration order
#[get("/static/{file}")]
pub async fn static_file(file: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let response = match file.as_str() {
        "app.js" => HttpResponse::Ok()
            .content_type("text/javascript; charset=utf-8")
            .body(APP_JS),
        "styles.css" => HttpResponse::Ok()
            .content_type("text/css; charset=utf-8")
            .body(STYLES_CSS),
        _ => return Err(ApiError::NotFound),
    };

    Ok(response)
}
