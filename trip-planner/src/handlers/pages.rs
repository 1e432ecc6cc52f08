use askama::Template;
use axum::response::IntoResponse;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub error: Option<String>,
}

pub async fn index() -> impl IntoResponse {
    IndexTemplate { error: None }
}
