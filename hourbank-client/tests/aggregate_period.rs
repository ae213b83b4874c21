//! End-to-end aggregation over a stub intranet.

use std::time::Duration;

use hourbank_client::ReportSession;
use hourbank_core::MonthKey;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORT_PATH: &str = "/Horas/FolhaPonto/Relatorio";

fn session(base_url: &str) -> ReportSession {
    ReportSession::new(base_url)
        .unwrap()
        .with_backoff_unit(Duration::from_millis(2))
        .with_month_pause(Duration::from_millis(1))
}

fn month(m: u32, y: i32) -> MonthKey {
    MonthKey::new(m, y).unwrap()
}

fn report_page(rows: &str) -> String {
    format!("<html><body><table>{rows}</table></body></html>")
}

/// Three months: a debt month, a dead month (every attempt rejected), and a
/// month whose only content is one compensatory-day-off marker.
#[tokio::test]
async fn test_three_month_period() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .and(query_param("mesAno", "01/2025"))
        .respond_with(ResponseTemplate::new(200).set_body_string(report_page(
            r#"<tr class="text-primary"><td>Funcionário deve</td><td>01:30</td></tr>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .and(query_param("mesAno", "02/2025"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .and(query_param("mesAno", "03/2025"))
        .respond_with(ResponseTemplate::new(200).set_body_string(report_page(
            "<tr><td>Folga a compensar</td></tr>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut progress: Vec<(usize, usize, String)> = Vec::new();
    let mut on_progress = |done: usize, total: usize, label: &str| {
        progress.push((done, total, label.to_string()));
    };

    let summary = session(&server.uri())
        .aggregate(month(1, 2025), month(3, 2025), Some(&mut on_progress))
        .await;

    assert_eq!(summary.total_minutes, 390);
    assert_eq!(summary.months.len(), 3);

    let formatted: Vec<&str> = summary.months.iter().map(|m| m.formatted.as_str()).collect();
    assert_eq!(formatted, ["-01:30", "00:00", "+08:00"]);

    let nets: Vec<i64> = summary.months.iter().map(|m| m.net_minutes).collect();
    assert_eq!(nets, [-90, 0, 480]);

    assert_eq!(
        progress,
        vec![
            (1, 3, "01/2025".to_string()),
            (2, 3, "02/2025".to_string()),
            (3, 3, "03/2025".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_months_are_fetched_in_chronological_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(report_page("")))
        .expect(4)
        .mount(&server)
        .await;

    let summary = session(&server.uri())
        .aggregate(month(11, 2024), month(2, 2025), None)
        .await;

    let labels: Vec<String> = summary.months.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(labels, ["11/2024", "12/2024", "01/2025", "02/2025"]);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(requested.len(), 4);
    // Requests went out in the same chronological order.
    assert!(requested[0].contains("11%2F2024"));
    assert!(requested[3].contains("02%2F2025"));
}

#[tokio::test]
async fn test_empty_range_makes_no_requests_and_no_progress_calls() {
    let server = MockServer::start().await;

    let mut calls = 0usize;
    let mut on_progress = |_: usize, _: usize, _: &str| calls += 1;

    let summary = session(&server.uri())
        .aggregate(month(5, 2025), month(4, 2025), Some(&mut on_progress))
        .await;

    assert_eq!(summary.total_minutes, 0);
    assert!(summary.months.is_empty());
    assert_eq!(calls, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}
