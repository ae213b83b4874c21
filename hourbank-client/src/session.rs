//! Authenticated session against the time-tracking intranet.
//!
//! Login is a one-shot heuristic exchange: fetch the login page, round-trip
//! its hidden form fields, guess the credential field names from the form
//! markup, and verify success from the response. Every deployment renders
//! the same ASP.NET login form with slightly different field names, hence
//! the discovery step.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use regex::Regex;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const LOGIN_PATH: &str = "/ControleAcesso/Seguranca/Login?ReturnUrl=%2fHoras%2fFolhaPonto%2fRelatorio";
const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Page phrases that mark a rejected login even on an HTTP 200.
const FAILURE_PHRASES: [&str; 5] = [
    "erro de login",
    "credenciais inválidas",
    "usuário ou senha",
    "senha incorreta",
    "acesso negado",
];

static USER_FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)user|usuario|login").unwrap());
static PASS_FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pass|senha").unwrap());

/// A cookie-bearing HTTP session for one intranet deployment.
///
/// `login` must succeed before any report fetch; afterwards the session is
/// shared read-only across all month fetches of an aggregation run.
pub struct ReportSession {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) backoff_unit: Duration,
    pub(crate) month_pause: Duration,
}

impl ReportSession {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backoff_unit: Duration::from_secs(1),
            month_pause: Duration::from_millis(500),
        })
    }

    /// Shrink the retry backoff unit (tests only need milliseconds).
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Tune the politeness pause between month fetches.
    pub fn with_month_pause(mut self, pause: Duration) -> Self {
        self.month_pause = pause;
        self
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Authenticate against the intranet, establishing the session cookies.
    ///
    /// Unlike the report fetches, a failed login is an error: the caller
    /// cannot meaningfully aggregate without a session.
    pub async fn login(&self, user: &str, password: &str) -> Result<()> {
        let page = self
            .http
            .get(self.login_url())
            .timeout(LOGIN_TIMEOUT)
            .send()
            .await
            .context("requesting login page")?;
        let body = page.text().await.context("reading login page")?;

        let form = build_login_form(&body, user, password)?;
        debug!(fields = form.len(), "submitting login form");

        let response = self
            .http
            .post(self.login_url())
            .timeout(LOGIN_TIMEOUT)
            .form(&form)
            .send()
            .await
            .context("submitting credentials")?;

        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.text().await.context("reading login response")?;
        check_login_response(status, &final_url, &body)
    }
}

/// Assemble the login POST body from the login page markup.
///
/// All hidden inputs are round-tripped verbatim (ASP.NET antiforgery state
/// lives there). The credential field names are discovered from the first
/// text/password inputs, falling back to name-pattern matches, and finally
/// to a shotgun set of conventional names when the form is unrecognizable.
fn build_login_form(login_page: &str, user: &str, password: &str) -> Result<Vec<(String, String)>> {
    let document = Html::parse_document(login_page);

    let form_sel = Selector::parse("form").unwrap();
    if document.select(&form_sel).next().is_none() {
        bail!("login page has no form");
    }

    let input_sel = Selector::parse("input").unwrap();
    let inputs: Vec<(String, String, String)> = document
        .select(&input_sel)
        .map(|input| {
            (
                input.attr("type").unwrap_or("text").to_lowercase(),
                input.attr("name").unwrap_or_default().to_string(),
                input.attr("value").unwrap_or_default().to_string(),
            )
        })
        .collect();

    let mut form: Vec<(String, String)> = inputs
        .iter()
        .filter(|(kind, name, value)| kind == "hidden" && !name.is_empty() && !value.is_empty())
        .map(|(_, name, value)| (name.clone(), value.clone()))
        .collect();

    let user_field = inputs
        .iter()
        .find(|(kind, _, _)| kind == "text")
        .or_else(|| inputs.iter().find(|(_, name, _)| USER_FIELD_NAME.is_match(name)));
    let pass_field = inputs
        .iter()
        .find(|(kind, _, _)| kind == "password")
        .or_else(|| inputs.iter().find(|(_, name, _)| PASS_FIELD_NAME.is_match(name)));

    match (user_field, pass_field) {
        (Some((_, user_name, _)), Some((_, pass_name, _))) => {
            let user_name = if user_name.is_empty() { "Login" } else { user_name.as_str() };
            let pass_name = if pass_name.is_empty() { "Senha" } else { pass_name.as_str() };
            form.push((user_name.to_string(), user.to_string()));
            form.push((pass_name.to_string(), password.to_string()));
        }
        _ => {
            // Unrecognizable form: submit every conventional name pair.
            for name in ["Login", "username", "user"] {
                form.push((name.to_string(), user.to_string()));
            }
            for name in ["Senha", "password", "pass"] {
                form.push((name.to_string(), password.to_string()));
            }
        }
    }

    Ok(form)
}

/// Decide whether a login response represents success.
///
/// Success means: HTTP 200, the redirect chain left the login page behind,
/// and the body carries none of the known rejection phrases.
fn check_login_response(status: StatusCode, final_url: &str, body: &str) -> Result<()> {
    if status != StatusCode::OK {
        bail!("login failed: server answered {status}");
    }
    if final_url.to_lowercase().contains("login") {
        bail!("login failed: still on the login page");
    }
    let body = body.to_lowercase();
    if let Some(phrase) = FAILURE_PHRASES.iter().find(|phrase| body.contains(*phrase)) {
        bail!("login failed: page reports \"{phrase}\"");
    }
    Ok(())
}

/// Normalize a user-supplied intranet URL down to scheme + authority.
///
/// A missing scheme defaults to `https`; paths and query strings are
/// dropped; non-HTTP schemes and loopback hosts are rejected.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("intranet URL is empty");
    }

    let with_scheme = match trimmed.split_once("://") {
        Some(("http" | "https", _)) => trimmed.to_string(),
        Some((scheme, _)) => bail!("unsupported URL scheme: {scheme}"),
        None => format!("https://{trimmed}"),
    };

    let parsed = reqwest::Url::parse(&with_scheme)
        .with_context(|| format!("invalid intranet URL: {trimmed:?}"))?;
    let host = parsed.host_str().context("intranet URL has no host")?;
    if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "[::1]" {
        bail!("loopback URLs are not allowed");
    }

    let mut base = format!("{}://{host}", parsed.scheme());
    if let Some(port) = parsed.port() {
        base.push_str(&format!(":{port}"));
    }
    Ok(base)
}
