use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /: the form page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
