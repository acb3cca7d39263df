//! 链接管理端点（需要会话）

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::state::AppState;
use crate::storage::Link;

use super::error_code::ErrorCode;
use super::helpers::{
    created_response, error_from_nyooom, error_response, escape_html, is_htmx_request,
    success_response,
};
use super::types::{CreateLinkParams, LinkResponse, SlugQuery};

/// POST /api/create-link
///
/// `slug` 和 `url` 可以来自表单，也可以来自查询参数（表单优先）
pub async fn create_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<CreateLinkParams>,
    form: Option<web::Form<CreateLinkParams>>,
) -> HttpResponse {
    let query = query.into_inner();
    let form = form.map(|f| f.into_inner()).unwrap_or_default();
    let slug = form.slug.or(query.slug).unwrap_or_default();
    let url = form.url.or(query.url).unwrap_or_default();

    match state.links.create_link(&slug, &url).await {
        Ok(link) => created_response(LinkResponse::from_link(link, &state.base_url(&req))),
        Err(e) => error_from_nyooom(&format!("Failed to create link \"{}\"", slug), &e),
    }
}

async fn delete_slug(state: &AppState, slug: &str) -> HttpResponse {
    if slug.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "slug is required",
        );
    }
    match state.links.delete_link(slug).await {
        Ok(()) => success_response(slug),
        Err(e) => error_from_nyooom(&format!("Failed to delete link \"{}\"", slug), &e),
    }
}

/// POST /api/delete-link?slug=...
pub async fn delete_link_by_query(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
) -> HttpResponse {
    delete_slug(&state, query.slug.trim()).await
}

/// DELETE /api/links/{slug}
pub async fn delete_link(state: web::Data<AppState>, slug: web::Path<String>) -> HttpResponse {
    delete_slug(&state, slug.trim()).await
}

/// GET /api/links/{slug}
pub async fn get_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> HttpResponse {
    match state.links.get_link(&slug).await {
        Ok(link) => success_response(LinkResponse::from_link(link, &state.base_url(&req))),
        Err(e) => error_from_nyooom(&format!("Failed to get link \"{}\"", slug), &e),
    }
}

/// GET /api/links
///
/// htmx 请求返回表格行片段，其余返回 JSON
pub async fn list_links(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let links = match state.links.list_links().await {
        Ok(links) => links,
        Err(e) => return error_from_nyooom("Failed to get links", &e),
    };

    if is_htmx_request(&req) {
        return HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_link_rows(&links));
    }

    let base = state.base_url(&req);
    let data: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &base))
        .collect();
    success_response(data)
}

pub fn render_link_rows(links: &[Link]) -> String {
    if links.is_empty() {
        return r#"<tr class="empty"><td colspan="5">No links yet</td></tr>"#.to_string();
    }

    let mut html = String::new();
    for link in links {
        let slug = escape_html(&link.slug);
        let url = escape_html(&link.url);
        let created = link
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        html.push_str(&format!(
            concat!(
                r#"<tr data-slug="{slug}">"#,
                r#"<td class="link-slug"><a href="/{slug}">/{slug}</a></td>"#,
                r#"<td class="link-url"><a href="{url}" rel="noopener noreferrer">{url}</a></td>"#,
                r#"<td class="link-clicks">{clicks}</td>"#,
                r#"<td class="link-created" data-timestamp="{created}"></td>"#,
                r#"<td class="link-actions">"#,
                r#"<button class="copy" data-slug="{slug}">Copy</button>"#,
                r#"<a class="qr" href="/qr/{slug}" target="_blank">QR</a>"#,
                r#"<button class="delete" data-slug="{slug}">Delete</button>"#,
                r#"</td></tr>"#,
            ),
            slug = slug,
            url = url,
            clicks = link.clicks,
            created = created,
        ));
    }
    html
}
