use std::fmt::Write;

use clap::Args;

use retention_core::EnrichedRecord;
use retention_simulation::{KpiSummary, PolicySimulator, SimulationReport};

use super::{Context, DataArgs, load_records, opt_number};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub source: DataArgs,

    /// Number of enriched rows to print. Overrides `[output] rows`.
    #[arg(long)]
    pub rows: Option<usize>,
}

pub fn run(ctx: &Context, args: &SimulateArgs) -> anyhow::Result<()> {
    let records = load_records(ctx, &args.source)?;
    let simulator = PolicySimulator::new(ctx.rules()?, ctx.config.scoring.clone());
    let report = simulator.run(&records);

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let rows = args.rows.unwrap_or(ctx.config.output.rows);
            print!("{}", render_text(&report, rows));
        }
    }
    Ok(())
}

fn render_text(report: &SimulationReport, rows: usize) -> String {
    let mut out = render_summary(&report.summary);
    out.push('\n');
    out.push_str(&render_table(&report.records, rows));
    out
}

fn render_summary(summary: &KpiSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rows:      {}", summary.rows);
    let _ = writeln!(out, "Budget:    ${}", summary.total_cost);
    let _ = writeln!(
        out,
        "Coverage:  {}% ({}/{} high risk)",
        summary.coverage_percent(),
        summary.covered,
        summary.high_risk
    );
    let _ = writeln!(out, "Score:     {}", summary.final_score);
    let _ = writeln!(out, "Avg cost:  ${:.2}", summary.avg_cost);
    let _ = writeln!(
        out,
        "           safety {:.1} + efficiency {:.1} - penalty {:.1}",
        summary.safety_score, summary.efficiency_score, summary.penalty
    );
    out
}

const HEADERS: [&str; 8] = [
    "customer_id",
    "segment",
    "monthly_charges",
    "tenure",
    "contract",
    "churn_score",
    "offer",
    "cost",
];

fn render_table(records: &[EnrichedRecord], rows: usize) -> String {
    let cells: Vec<[String; 8]> = records
        .iter()
        .take(rows)
        .map(|r| {
            [
                r.record.customer_id.clone().unwrap_or_default(),
                r.record.segment.map(|s| s.to_string()).unwrap_or_default(),
                opt_number(r.record.monthly_charges, 2),
                opt_number(r.record.tenure, 0),
                r.record.contract.clone().unwrap_or_default(),
                opt_number(r.record.churn_score, 2),
                r.offer.to_string(),
                format!("{}", r.cost),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    if records.len() > rows {
        let _ = writeln!(out, "... {} more rows", records.len() - rows);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<w$}", cell.as_ref()))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
