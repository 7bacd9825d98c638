//! HTML form server: `GET /` shows the form, `/calculate` runs it and echoes
//! the submitted values back together with the result or the error.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderValue},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::app::AppError;
use crate::fuel::{self, CalcMode, CalcResult, Field, FuelCalcError, RawValues};
use crate::i18n::{self, keys, Translator};
use crate::report::{self, ReportOptions};

/// Shared, read-only state of the form server.
#[derive(Clone)]
pub struct WebState {
    tr: Arc<Translator>,
    opts: ReportOptions,
}

impl WebState {
    pub fn new(tr: Translator, opts: ReportOptions) -> Self {
        Self {
            tr: Arc::new(tr),
            opts,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    mode: Option<String>,
}

pub fn make_router(state: WebState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/calculate", get(calculate_handler).post(calculate_handler))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(index_handler)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, state: WebState, static_dir: &Path) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "listening on http://{} (static files from {})",
        listener.local_addr()?,
        static_dir.display()
    );
    axum::serve(listener, make_router(state, static_dir)).await?;
    Ok(())
}

pub async fn index_handler(
    State(state): State<WebState>,
    Query(query): Query<ModeQuery>,
) -> Html<String> {
    let mode = CalcMode::from_param(query.mode.as_deref());
    Html(render_page(&state, mode, &RawValues::new(), None))
}

pub async fn calculate_handler(
    State(state): State<WebState>,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    let mode = CalcMode::from_param(form.get("mode").map(String::as_str));
    let values: RawValues = Field::ALL
        .iter()
        .filter_map(|f| form.get(f.key()).map(|v| (f.key().to_string(), v.clone())))
        .collect();
    let outcome = fuel::compute(mode, &values);
    if let Err(e) = &outcome {
        debug!(?mode, error = %e, "calculation rejected");
    }
    Html(render_page(&state, mode, &values, Some(outcome)))
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_page(
    state: &WebState,
    mode: CalcMode,
    values: &RawValues,
    outcome: Option<Result<CalcResult, FuelCalcError>>,
) -> String {
    let tr = state.tr.as_ref();
    let title = html_escape(&tr.t(keys::APP_TITLE));
    let mut page = String::new();

    page.push_str(&format!(
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"/static/style.css\">\n</head>\n<body>\n\
         <header>\n<h1>{title}</h1>\n<nav>",
        lang = tr.language_code(),
    ));
    for m in [CalcMode::WorkingToDry, CalcMode::CombustibleToWorking] {
        let class = if m == mode { " class=\"active\"" } else { "" };
        page.push_str(&format!(
            "<a href=\"/?mode={}\"{class}>{}</a>",
            m.as_param(),
            html_escape(&report::mode_title(m, tr))
        ));
    }
    page.push_str("</nav>\n</header>\n<main>\n");

    let help = match mode {
        CalcMode::WorkingToDry => keys::HELP_WORKING_TO_DRY,
        CalcMode::CombustibleToWorking => keys::HELP_COMBUSTIBLE_TO_WORKING,
    };
    page.push_str(&format!("<p class=\"help\">{}</p>\n", html_escape(&tr.t(help))));

    page.push_str(&format!(
        "<form method=\"post\" action=\"/calculate\">\n<input type=\"hidden\" name=\"mode\" value=\"{}\">\n",
        mode.as_param()
    ));
    for field in mode.fields() {
        let value = values.get(field.key()).map(String::as_str).unwrap_or("");
        page.push_str(&format!(
            "<label>{} [{}] <input type=\"text\" inputmode=\"decimal\" name=\"{}\" value=\"{}\"></label>\n",
            html_escape(&i18n::field_label(*field, tr)),
            field.unit(),
            field.key(),
            html_escape(value)
        ));
    }
    page.push_str(&format!(
        "<button type=\"submit\">{}</button>\n</form>\n",
        html_escape(&tr.t(keys::CALCULATE))
    ));

    match outcome {
        Some(Ok(result)) => {
            let notes = fuel::advisories(values, &result);
            let report = report::build_report(&result, &notes, &state.opts, tr);
            page.push_str(&format!(
                "<section class=\"result\">\n<h2>{}</h2>\n",
                html_escape(&tr.t(keys::RESULT_HEADING))
            ));
            for section in &report.sections {
                page.push_str(&format!(
                    "<table>\n<caption>{}</caption>\n",
                    html_escape(&section.title)
                ));
                for row in &section.rows {
                    page.push_str(&format!(
                        "<tr><th>{}</th><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        row.symbol,
                        report.format_value(row.value),
                        row.unit,
                        html_escape(&row.label)
                    ));
                }
                page.push_str("</table>\n");
            }
            if !report.notes.is_empty() {
                page.push_str(&format!(
                    "<div class=\"notes\"><h3>{}</h3><ul>\n",
                    html_escape(&tr.t(keys::ADVISORY_HEADING))
                ));
                for note in &report.notes {
                    page.push_str(&format!("<li>{}</li>\n", html_escape(note)));
                }
                page.push_str("</ul></div>\n");
            }
            page.push_str("</section>\n");
        }
        Some(Err(err)) => {
            page.push_str(&format!(
                "<p class=\"error\">{}</p>\n",
                html_escape(&i18n::localize_error(&err, tr))
            ));
        }
        None => {}
    }

    page.push_str(&format!(
        "</main>\n<footer>{}: v{}</footer>\n</body>\n</html>\n",
        html_escape(&tr.t(keys::VERSION)),
        env!("CARGO_PKG_VERSION")
    ));
    page
}
