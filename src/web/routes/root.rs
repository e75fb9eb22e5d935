use axum::response::Redirect;

pub const LANDING_PAGE: &str = "/static/index.html";

pub async fn root_handler() -> Redirect {
    Redirect::temporary(LANDING_PAGE)
}
