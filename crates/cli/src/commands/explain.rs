use std::fmt::Write;

use anyhow::Context as _;
use clap::Args;

use retention_core::{CustomerRecord, Segment};
use retention_rules::{RuleEngine, RuleEvaluationTrace, RuleTraceResult};

use super::{Context, DataArgs, load_records, opt_number};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Customer id to explain.
    #[arg(long)]
    pub customer: String,

    #[command(flatten)]
    pub source: DataArgs,
}

pub fn run(ctx: &Context, args: &ExplainArgs) -> anyhow::Result<()> {
    let records = load_records(ctx, &args.source)?;
    let record = records
        .iter()
        .find(|r| r.customer_id.as_deref() == Some(args.customer.as_str()))
        .with_context(|| format!("customer {} not found", args.customer))?;

    let engine = RuleEngine::new(ctx.rules()?);
    let trace = engine.trace(record);

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
        OutputFormat::Text => print!("{}", render_text(record, &trace)),
    }
    Ok(())
}

fn render_text(record: &CustomerRecord, trace: &RuleEvaluationTrace) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "customer {}: segment={} contract={} monthly_charges={} tenure={} churn_score={}",
        record.customer_id.as_deref().unwrap_or("-"),
        record.segment.as_ref().map_or("null", Segment::as_str),
        record.contract.as_deref().unwrap_or("null"),
        or_null(opt_number(record.monthly_charges, 2)),
        or_null(opt_number(record.tenure, 0)),
        or_null(opt_number(record.churn_score, 2)),
    );

    for entry in &trace.trace {
        let marker = match entry.result {
            RuleTraceResult::Matched => "=>",
            RuleTraceResult::NotMatched => "  ",
            RuleTraceResult::Skipped => " .",
            RuleTraceResult::Error => "!!",
        };
        let line = entry.line.map_or_else(|| "-".to_owned(), |l| l.to_string());
        let _ = write!(
            out,
            "{marker} line {line:>3}  {:<11} {}",
            entry.result.as_str(),
            entry.rule_display
        );
        if let Some(error) = &entry.error {
            let _ = write!(out, "  ({error})");
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "offer: {} (cost {}), {} evaluated, {} skipped, {}us",
        trace.offer,
        trace.offer.cost(),
        trace.total_rules_evaluated,
        trace.total_rules_skipped,
        trace.evaluation_duration_us
    );
    out
}

fn or_null(s: String) -> String {
    if s.is_empty() { "null".to_owned() } else { s }
}
