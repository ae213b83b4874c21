//! Cascading row-location strategies for the monthly report document.
//!
//! The report's table markup varies between intranet deployments: the debt
//! rows are sometimes tagged with Bootstrap text classes, sometimes only
//! identifiable by their label text, and some layouts repeat header rows.
//! Extraction therefore runs a fixed ordered list of strategies and stops
//! at the first one that locates a non-zero pair.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use hourbank_core::DebtPair;

use crate::row_time::row_minutes;

/// Fixed credit per compensatory-day-off marker: 8 hours.
pub const TIME_OFF_CREDIT_MINUTES: i64 = 480;

static EMPLOYEE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)funcionário\s+deve").unwrap());
static COMPANY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)empresa\s+deve").unwrap());
static TIME_OFF_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)folga\s+a\s+compensar").unwrap());

/// One row-location heuristic: document + compensation in, adjusted pair out.
type Strategy = fn(&Html, i64) -> DebtPair;

/// Concatenate an element's text nodes with spaces, so values in adjacent
/// cells keep their word boundaries.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Total compensatory-day-off credit for the month: one fixed 8-hour block
/// per `<td>` cell carrying the "folga a compensar" marker.
pub fn compensation_minutes(document: &Html) -> i64 {
    let td = Selector::parse("td").unwrap();
    let markers = document
        .select(&td)
        .filter(|cell| TIME_OFF_MARKER.is_match(&element_text(*cell)))
        .count() as i64;
    markers * TIME_OFF_CREDIT_MINUTES
}

/// Strategy (a): rows tagged with the report's marker classes.
/// `tr.text-primary` carries the employee-owes total, `tr.text-danger` the
/// company-owes total.
fn by_row_class(document: &Html, compensation: i64) -> DebtPair {
    let employee_row = Selector::parse("tr.text-primary").unwrap();
    let company_row = Selector::parse("tr.text-danger").unwrap();

    let employee_owes = document
        .select(&employee_row)
        .next()
        .map(|row| row_minutes(&element_text(row)))
        .unwrap_or(0);
    let company_owes = document
        .select(&company_row)
        .next()
        .map(|row| row_minutes(&element_text(row)))
        .unwrap_or(0);

    DebtPair::new(employee_owes, company_owes).apply_compensation(compensation)
}

/// Strategy (b): the first row anywhere in the document whose text carries
/// each debt label, located independently per side.
fn by_label_text(document: &Html, compensation: i64) -> DebtPair {
    let tr = Selector::parse("tr").unwrap();

    let first_match = |label: &Regex| {
        document
            .select(&tr)
            .map(element_text)
            .find(|text| label.is_match(text))
            .map(|text| row_minutes(&text))
            .unwrap_or(0)
    };

    DebtPair::new(first_match(&EMPLOYEE_LABEL), first_match(&COMPANY_LABEL))
        .apply_compensation(compensation)
}

/// Strategy (c): walk every row in document order; the last row matching a
/// label wins for that side. Later rows deliberately override earlier
/// partial matches because some layouts repeat header rows. A row matching
/// both labels only counts for the employee side.
fn by_table_scan(document: &Html, compensation: i64) -> DebtPair {
    let tr = Selector::parse("tr").unwrap();
    let mut pair = DebtPair::default();

    for row in document.select(&tr) {
        let text = element_text(row);
        if EMPLOYEE_LABEL.is_match(&text) {
            pair.employee_owes = row_minutes(&text);
        } else if COMPANY_LABEL.is_match(&text) {
            pair.company_owes = row_minutes(&text);
        }
    }

    pair.apply_compensation(compensation)
}

const STRATEGIES: [(&str, Strategy); 3] = [
    ("row-class", by_row_class),
    ("label-text", by_label_text),
    ("table-scan", by_table_scan),
];

/// Extract the month's net balance from a report document.
///
/// Compensation markers are counted once, then each strategy runs in order
/// with that credit applied; the first strategy yielding a non-zero pair
/// decides the month. A document where every strategy comes back empty
/// yields 0 -- "no discoverable debt", indistinguishable from a genuinely
/// settled month.
pub fn net_balance(document_html: &str) -> i64 {
    let document = Html::parse_document(document_html);
    let compensation = compensation_minutes(&document);

    for (name, strategy) in STRATEGIES {
        let pair = strategy(&document, compensation);
        if !pair.is_zero() {
            debug!(
                strategy = name,
                employee_owes = pair.employee_owes,
                company_owes = pair.company_owes,
                compensation,
                "debt rows located"
            );
            return pair.net_minutes();
        }
    }

    debug!("no debt rows located in document");
    0
}
