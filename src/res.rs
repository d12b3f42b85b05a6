//! Page resources: the templates under `res/`, the shared layout and the
//! error pages of the server-rendered surface.

use axum::{
    debug_handler,
    extract::{FromRequestParts, Path},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;

use crate::{appresult::FieldErrors, session, store::User, AppError};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], include_res!(str, "/style.css"))
}

/// Escapes text for HTML. Braces are encoded too, so user text can never
/// be mistaken for a template slot.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // a String sink never fails
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    encode_braces(&out)
}

fn encode_braces(html: &str) -> String {
    html.replace('{', "&#123;").replace('}', "&#125;")
}

/// Relative links and http, https and mailto targets are followed; any
/// other scheme is replaced by `#`.
fn safe_link(dest: &str) -> bool {
    match dest.find([':', '/', '?', '#']) {
        Some(i) if dest[i..].starts_with(':') => {
            matches!(dest[..i].to_ascii_lowercase().as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// Renders a message body. Raw HTML in the source is shown as text.
pub fn markdown(source: &str) -> String {
    use pulldown_cmark::{Event, Options, Parser, Tag};

    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if !safe_link(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: "#".into(), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if !safe_link(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: "#".into(), title, id })
        }
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    encode_braces(&html_output)
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

pub fn field_errors(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|(field, message)| format!("<li><b>{field}</b>: {}</li>", escape(message)))
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

/// Wraps `body` in the site layout, with navigation for `user` and any
/// queued flash messages.
pub async fn page(session: &Session, user: Option<&User>, title: &str, body: &str) -> PageResult<Html<String>> {
    let nav = match user {
        Some(user) => include_res!(str, "/pages/nav_user.html")
            .replace("{user_id}", &user.id.to_string())
            .replace("{username}", &escape(&user.username)),
        None => include_res!(str, "/pages/nav_guest.html").to_owned(),
    };

    let flashes: String = session::take_flashes(session)
        .await?
        .iter()
        .map(|message| format!(r#"<li class="flash">{}</li>"#, escape(message)))
        .collect();

    Ok(Html(
        include_res!(str, "/pages/layout.html")
            .replace("{title}", &escape(title))
            .replace("{nav}", &nav)
            .replace("{flashes}", &flashes)
            .replace("{body}", body),
    ))
}

pub fn sorry(status: StatusCode, message: &str) -> Response {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = include_res!(str, "/pages/sorry.html")
        .replace("{status}", status.as_str())
        .replace("{title}", title)
        .replace("{message}", &escape(message));
    (status, Html(body)).into_response()
}

pub type PageResult<T> = Result<T, PageError>;

/// Path parameters of a page; an id that does not parse shows the 404 page.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(PageError))]
pub struct PagePath<T>(pub T);

/// An [`AppError`] raised by a page handler, answered with HTML instead of
/// JSON.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl<E> From<E> for PageError
where
    AppError: From<E>,
{
    fn from(err: E) -> Self {
        Self(AppError::from(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.0.log();
        match self.0 {
            AppError::Unauthenticated(_) => Redirect::to("/login").into_response(),
            AppError::AccessDenied => sorry(StatusCode::FORBIDDEN, "Access Denied"),
            AppError::NotFound(what) => sorry(StatusCode::NOT_FOUND, &format!("That {what} does not exist.")),
            err => sorry(err.status_code(), &err.public_message()),
        }
    }
}
