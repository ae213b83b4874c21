//! Result rendering: console table, text report, and CSV/JSON exports.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use hourbank_core::{PeriodSummary, format_minutes};

fn status_label(net_minutes: i64) -> &'static str {
    if net_minutes > 0 {
        "CRÉDITO"
    } else if net_minutes < 0 {
        "DÉBITO"
    } else {
        "NEUTRO"
    }
}

/// Print the per-month table and the summary metrics to stdout.
pub fn print_summary(summary: &PeriodSummary) {
    if summary.months.is_empty() {
        println!("Nenhum dado disponível para o período selecionado.");
        return;
    }

    println!();
    println!("{:<10} {:>10} {:>12}  {}", "Mês/Ano", "Saldo", "Acumulado", "Situação");
    for (month, running) in summary.months.iter().zip(summary.running_totals()) {
        println!(
            "{:<10} {:>10} {:>12}  {}",
            month.month.to_string(),
            month.formatted,
            format_minutes(running),
            status_label(month.net_minutes),
        );
    }

    println!();
    println!(
        "Saldo final: {} ({})",
        format_minutes(summary.total_minutes),
        status_label(summary.total_minutes)
    );
    println!(
        "Meses positivos: {} | negativos: {} | neutros: {}",
        summary.positive_months(),
        summary.negative_months(),
        summary.neutral_months()
    );
}

/// Render the downloadable plain-text report.
fn render_text_report(summary: &PeriodSummary, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str("RELATÓRIO DE BANCO DE HORAS\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!("Gerado em: {generated_at}\n\n"));

    out.push_str("DETALHES POR MÊS:\n");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    if summary.months.is_empty() {
        out.push_str("Nenhum dado disponível para o período selecionado.\n");
    } else {
        for month in &summary.months {
            out.push_str(&format!(
                "{}: {} ({})\n",
                month.month,
                month.formatted,
                status_label(month.net_minutes)
            ));
        }
    }

    out.push_str("\nRESULTADO FINAL:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    let total = format_minutes(summary.total_minutes);
    if summary.total_minutes > 0 {
        out.push_str(&format!("SALDO POSITIVO: {total}\n"));
        out.push_str("A empresa deve horas ao funcionário\n");
    } else if summary.total_minutes < 0 {
        out.push_str(&format!("SALDO NEGATIVO: {total}\n"));
        out.push_str("O funcionário deve horas à empresa\n");
    } else {
        out.push_str(&format!("SALDO ZERADO: {total}\n"));
        out.push_str("Situação equilibrada\n");
    }

    out
}

pub fn write_text_report(summary: &PeriodSummary, path: &Path) -> Result<()> {
    let generated_at = Local::now().format("%d/%m/%Y %H:%M:%S").to_string();
    let report = render_text_report(summary, &generated_at);
    fs::write(path, report).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn render_csv(summary: &PeriodSummary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["mes_ano", "saldo_minutos", "saldo_formatado", "situacao"])
        .context("writing CSV header")?;
    for month in &summary.months {
        writer
            .write_record([
                month.month.to_string(),
                month.net_minutes.to_string(),
                month.formatted.clone(),
                status_label(month.net_minutes).to_string(),
            ])
            .context("writing CSV row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV")?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_csv(summary: &PeriodSummary, path: &Path) -> Result<()> {
    let csv = render_csv(summary)?;
    fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn write_json(summary: &PeriodSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing summary")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hourbank_core::{MonthKey, MonthlyBalance};

    fn summary() -> PeriodSummary {
        let mut summary = PeriodSummary::default();
        summary.push(MonthlyBalance::new(MonthKey::new(1, 2025).unwrap(), -90));
        summary.push(MonthlyBalance::new(MonthKey::new(2, 2025).unwrap(), 0));
        summary.push(MonthlyBalance::new(MonthKey::new(3, 2025).unwrap(), 480));
        summary
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(480), "CRÉDITO");
        assert_eq!(status_label(-90), "DÉBITO");
        assert_eq!(status_label(0), "NEUTRO");
    }

    #[test]
    fn test_text_report_layout() {
        let report = render_text_report(&summary(), "01/04/2025 10:00:00");
        assert!(report.starts_with("RELATÓRIO DE BANCO DE HORAS\n"));
        assert!(report.contains("Gerado em: 01/04/2025 10:00:00"));
        assert!(report.contains("01/2025: -01:30 (DÉBITO)"));
        assert!(report.contains("02/2025: 00:00 (NEUTRO)"));
        assert!(report.contains("03/2025: +08:00 (CRÉDITO)"));
        assert!(report.contains("SALDO POSITIVO: +06:30"));
        assert!(report.contains("A empresa deve horas ao funcionário"));
    }

    #[test]
    fn test_text_report_empty_period() {
        let report = render_text_report(&PeriodSummary::default(), "01/04/2025 10:00:00");
        assert!(report.contains("Nenhum dado disponível"));
        assert!(report.contains("SALDO ZERADO: 00:00"));
        assert!(report.contains("Situação equilibrada"));
    }

    #[test]
    fn test_csv_rows() {
        let csv = render_csv(&summary()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "mes_ano,saldo_minutos,saldo_formatado,situacao");
        assert_eq!(lines[1], "01/2025,-90,-01:30,DÉBITO");
        assert_eq!(lines[2], "02/2025,0,00:00,NEUTRO");
        assert_eq!(lines[3], "03/2025,480,+08:00,CRÉDITO");
    }

    #[test]
    fn test_json_uses_canonical_month_labels() {
        let json = serde_json::to_string(&summary()).unwrap();
        assert!(json.contains("\"month\":\"01/2025\""));
        assert!(json.contains("\"total_minutes\":390"));
    }
}
