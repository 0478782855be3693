use std::fmt::Write;

use retention_rules::{Condition, Rule, RuleSet};

use super::Context;
use crate::OutputFormat;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let rules = ctx.rules()?;
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
        OutputFormat::Text => print!("{}", render_text(&rules)),
    }
    Ok(())
}

fn render_text(rules: &RuleSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} rules loaded:", rules.len());
    for rule in rules.iter() {
        let line = rule.line().map_or_else(|| "-".to_owned(), |l| l.to_string());
        let status = match rule {
            Rule::Conditional {
                condition: Condition::Invalid { .. },
                ..
            } => "ERR",
            _ => "OK ",
        };
        let _ = writeln!(out, "  [{status}] line {line:>3}  {}", rule.to_source());
        if let Rule::Conditional {
            condition: Condition::Invalid { reason, .. },
            ..
        } = rule
        {
            let _ = writeln!(out, "             {reason}");
        }
    }
    out
}
