//! Sequential period aggregation with progress reporting.

use tracing::info;

use hourbank_core::{MonthKey, MonthlyBalance, PeriodSummary, month_sequence};

use crate::session::ReportSession;

/// Synchronous progress sink: `(months done, months total, month label)`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize, &str);

impl ReportSession {
    /// Walk the inclusive month range and accumulate the hour bank.
    ///
    /// Months are fetched strictly one at a time, in chronological order,
    /// with a politeness pause in between; the sequencing is a rate-limit
    /// courtesy to the report server and must not be parallelized. The
    /// progress callback fires exactly once per month, after that month's
    /// result is recorded and before the next fetch starts.
    ///
    /// An empty range (`end` before `start`) yields an empty summary and
    /// no progress calls. Cancellation is the caller's: dropping the
    /// future between awaits abandons the run without side effects.
    pub async fn aggregate(
        &self,
        start: MonthKey,
        end: MonthKey,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> PeriodSummary {
        let months = month_sequence(start, end);
        let months_total = months.len();
        let mut summary = PeriodSummary::default();

        for (index, month) in months.into_iter().enumerate() {
            let net_minutes = self.fetch_month(month).await;
            summary.push(MonthlyBalance::new(month, net_minutes));
            info!(month = %month, net_minutes, "month aggregated");

            if let Some(on_progress) = &mut on_progress {
                on_progress(index + 1, months_total, &month.to_string());
            }

            if index + 1 < months_total {
                tokio::time::sleep(self.month_pause).await;
            }
        }

        summary
    }
}
