use axum::extract::State;
use axum::response::Html;

const INDEX_TEMPLATE: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct PageState {
    pub poll_interval_ms: u64,
}

pub async fn index(State(state): State<PageState>) -> Html<String> {
    Html(INDEX_TEMPLATE.replace("{{POLL_INTERVAL_MS}}", &state.poll_interval_ms.to_string()))
}
