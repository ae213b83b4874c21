//! Month-report fetching with bounded retries, progressive timeouts, and
//! exponential backoff.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, warn};

use hourbank_core::MonthKey;
use hourbank_extract::net_balance;

use crate::session::ReportSession;

const REPORT_PATH: &str = "/Horas/FolhaPonto/Relatorio";

/// Fetch attempts per month before the month is written off as zero.
const MAX_ATTEMPTS: u32 = 3;
/// First-attempt request timeout; every further attempt adds one step.
const BASE_TIMEOUT: Duration = Duration::from_secs(10);
const TIMEOUT_STEP: Duration = Duration::from_secs(5);

impl ReportSession {
    fn report_url(&self) -> String {
        format!("{}{REPORT_PATH}", self.base_url)
    }

    /// Fetch one month's report page and extract its net balance.
    ///
    /// Every failure mode resolves to 0 minutes: a month that cannot be
    /// fetched is indistinguishable from a settled one, by design. A 200
    /// response always decides the month immediately, even when extraction
    /// comes back empty. Transport errors back off 2/4/8 seconds between
    /// attempts; rejection statuses retry without sleeping.
    pub async fn fetch_month(&self, month: MonthKey) -> i64 {
        let label = month.to_string();

        for attempt in 0..MAX_ATTEMPTS {
            let timeout = BASE_TIMEOUT + TIMEOUT_STEP * attempt;
            match self.request_report(&label, timeout).await {
                Ok(Some(body)) => {
                    debug!(month = %label, attempt, bytes = body.len(), "report page fetched");
                    return net_balance(&body);
                }
                Ok(None) => {
                    // Rejection status already logged; go straight to the
                    // next attempt.
                }
                Err(err) => {
                    warn!(month = %label, attempt, error = %err, "report request failed");
                    if attempt + 1 < MAX_ATTEMPTS {
                        let backoff = self.backoff_unit * (1u32 << (attempt + 1));
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        warn!(month = %label, "fetch attempts exhausted, counting month as zero");
        0
    }

    /// One GET of the month report. `Ok(Some(body))` on a 200, `Ok(None)`
    /// on any other status, `Err` on transport failure.
    async fn request_report(&self, month_label: &str, timeout: Duration) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.report_url())
            .query(&[("mesAno", month_label)])
            .timeout(timeout)
            .send()
            .await
            .context("requesting month report")?;

        if response.status() != StatusCode::OK {
            warn!(month = month_label, status = %response.status(), "report request rejected");
            return Ok(None);
        }

        let body = response.text().await.context("reading month report")?;
        Ok(Some(body))
    }
}
