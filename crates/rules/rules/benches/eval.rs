use criterion::{Criterion, black_box, criterion_group, criterion_main};

use retention_core::{CustomerRecord, Segment};
use retention_rules::ir::expr::{CompareOp, Comparison, Expr, Field, Literal};
use retention_rules::ir::rule::{Rule, RuleSet};
use retention_rules::{RuleEngine, evaluate};

fn test_record() -> CustomerRecord {
    CustomerRecord::new("VIP-001")
        .with_segment(Segment::Vip)
        .with_contract("Month-to-month")
        .with_monthly_charges(110.0)
        .with_tenure(2.0)
        .with_churn_score(0.82)
}

fn term(field: Field, op: CompareOp, literal: Literal) -> Comparison {
    Comparison::new(field, op, literal).expect("valid comparison")
}

fn simple_expression() -> Expr {
    // churn_score >= 0.7
    Expr::single(term(Field::ChurnScore, CompareOp::Ge, Literal::Number(0.7)))
}

fn complex_expression() -> Expr {
    // segment == "VIP" AND contract == "Month-to-month" AND tenure < 12 AND churn_score >= 0.7
    Expr::new(vec![
        term(Field::Segment, CompareOp::Eq, Literal::String("VIP".into())),
        term(
            Field::Contract,
            CompareOp::Eq,
            Literal::String("Month-to-month".into()),
        ),
        term(Field::Tenure, CompareOp::Lt, Literal::Number(12.0)),
        term(Field::ChurnScore, CompareOp::Ge, Literal::Number(0.7)),
    ])
    .expect("non-empty expression")
}

fn bench_simple_expression(c: &mut Criterion) {
    let record = test_record();
    let expr = simple_expression();

    c.bench_function("eval_simple_expression", |b| {
        b.iter(|| black_box(evaluate(black_box(&expr), &record)));
    });
}

fn bench_complex_expression(c: &mut Criterion) {
    let record = test_record();
    let expr = complex_expression();

    c.bench_function("eval_complex_expression", |b| {
        b.iter(|| black_box(evaluate(black_box(&expr), &record)));
    });
}

fn bench_rule_engine_decide(c: &mut Criterion) {
    let record = test_record();
    let rules = RuleSet::new(vec![
        Rule::conditional(
            Expr::single(term(Field::ChurnScore, CompareOp::Lt, Literal::Number(0.7))),
            "NO_OFFER",
        ),
        Rule::conditional(
            Expr::single(term(Field::Segment, CompareOp::Eq, Literal::String("OTHER".into()))),
            "SMALL",
        ),
        Rule::conditional(complex_expression(), "BIG"),
        Rule::fallback("NO_OFFER"),
    ]);
    let engine = RuleEngine::new(rules);

    c.bench_function("rule_engine_decide_4_rules", |b| {
        b.iter(|| black_box(engine.decide(black_box(&record))));
    });

    c.bench_function("rule_engine_trace_4_rules", |b| {
        b.iter(|| black_box(engine.trace(black_box(&record))));
    });
}

criterion_group!(
    benches,
    bench_simple_expression,
    bench_complex_expression,
    bench_rule_engine_decide,
);
criterion_main!(benches);
