//! Public website blueprint: the landing page and the about page.
//!
//! Pages are plain HTML rendered from the configuration; the flag data itself is served
//! by other blueprints.

use axum::extract::State;
use axum::response::Html;
use crwa_kernel::prelude::*;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const NAME: &str = "flagging";

#[api_handler(
    get,
    path = "/",
    responses((status = OK, description = "Landing page", content_type = "text/html", body = String)),
    tag = FLAGGING_TAG,
)]
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let docs = &state.config.docs;
    let docs_link = if docs.enabled {
        format!(r#"<p><a href="{}">API documentation</a></p>"#, docs.ui_path)
    } else {
        String::new()
    };

    Html(page(
        &docs.title,
        &format!(
            "<p>Water quality flags for the Charles River, published by the {}.</p>{docs_link}",
            docs.contact.organization,
        ),
    ))
}

#[api_handler(
    get,
    path = "/about",
    responses((status = OK, description = "About page", content_type = "text/html", body = String)),
    tag = FLAGGING_TAG,
)]
async fn about_handler(State(state): State<AppState>) -> Html<String> {
    let contact = &state.config.docs.contact;
    let mut body = format!(
        "<p>Maintained by the {} and built by {}.</p>",
        contact.organization, contact.developer
    );
    if let Some(url) = &contact.url {
        body.push_str(&format!(r#"<p><a href="{url}">{url}</a></p>"#));
    }

    Html(page("About", &body))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h1>{title}</h1>{body}</body></html>"
    )
}

/// Blueprint provider for the public pages. Mounted at the site root.
///
/// # Errors
/// Never fails; the signature matches [`BlueprintProvider`].
pub fn bp(_config: &AppConfig) -> Result<Blueprint, BlueprintError> {
    let router = OpenApiRouter::new().routes(routes!(index_handler)).routes(routes!(about_handler));

    tracing::debug!("Flagging blueprint built");

    Ok(Blueprint::new(NAME, router))
}
