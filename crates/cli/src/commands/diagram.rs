use retention_rules_policy::PolicyDocument;

use super::Context;
use crate::OutputFormat;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let diagram = PolicyDocument::new(&ctx.policy_text).diagram();
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "diagram": diagram })),
        OutputFormat::Text => println!("{diagram}"),
    }
    Ok(())
}
