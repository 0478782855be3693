use retention_core::CustomerRecord;

use crate::engine::value::Value;
use crate::ir::expr::{CompareOp, Comparison, Expr};

/// Evaluate a compiled condition against a record.
///
/// Terms are checked left to right and evaluation stops at the first term
/// that does not hold.
pub fn evaluate(expr: &Expr, record: &CustomerRecord) -> bool {
    expr.terms()
        .iter()
        .all(|term| eval_comparison(term, record))
}

/// Evaluate a single `<field> <op> <literal>` term.
pub fn eval_comparison(term: &Comparison, record: &CustomerRecord) -> bool {
    let left = Value::resolve(term.field(), record);
    let right = Value::from_literal(term.literal());
    compare(term.op(), left, right)
}

/// Compare two runtime values.
///
/// Null handling:
/// - `== null` holds only for a null left side, `!= null` only for a non-null one.
/// - Any other comparison involving null is `false`.
pub(crate) fn compare(op: CompareOp, left: Value<'_>, right: Value<'_>) -> bool {
    match (left, right) {
        (_, Value::Null) => match op {
            CompareOp::Eq => left.is_null(),
            CompareOp::Ne => !left.is_null(),
            _ => false,
        },
        (Value::Number(a), Value::Number(b)) => match op {
            CompareOp::Eq => numbers_equal(a, b),
            CompareOp::Ne => !numbers_equal(a, b),
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        },
        (Value::Text(a), Value::Text(b)) => match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            _ => false,
        },
        _ => false,
    }
}

fn numbers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use retention_core::Segment;

    use super::*;
    use crate::ir::expr::{Field, Literal};

    fn term(field: Field, op: CompareOp, literal: Literal) -> Comparison {
        Comparison::new(field, op, literal).unwrap()
    }

    fn text(s: &str) -> Literal {
        Literal::String(s.into())
    }

    fn vip_month_to_month() -> Expr {
        Expr::new(vec![
            term(Field::Segment, CompareOp::Eq, text("VIP")),
            term(Field::Contract, CompareOp::Eq, text("Month-to-month")),
        ])
        .unwrap()
    }

    #[test]
    fn and_chain_requires_every_term() {
        let expr = vip_month_to_month();
        let matching = CustomerRecord::default()
            .with_segment(Segment::Vip)
            .with_contract("Month-to-month");
        let other_contract = CustomerRecord::default()
            .with_segment(Segment::Vip)
            .with_contract("Two year");

        assert!(evaluate(&expr, &matching));
        assert!(!evaluate(&expr, &other_contract));
    }

    #[test]
    fn numeric_operators() {
        let record = CustomerRecord::default().with_churn_score(0.7);
        let check = |op, n| eval_comparison(&term(Field::ChurnScore, op, Literal::Number(n)), &record);

        assert!(check(CompareOp::Ge, 0.7));
        assert!(!check(CompareOp::Lt, 0.7));
        assert!(check(CompareOp::Le, 0.7));
        assert!(check(CompareOp::Gt, 0.5));
        assert!(check(CompareOp::Eq, 0.7));
        assert!(check(CompareOp::Ne, 0.71));
    }

    #[test]
    fn string_comparison_is_case_sensitive() {
        let record = CustomerRecord::default().with_contract("Two year");
        assert!(eval_comparison(&term(Field::Contract, CompareOp::Eq, text("Two year")), &record));
        assert!(!eval_comparison(&term(Field::Contract, CompareOp::Eq, text("two year")), &record));
        assert!(eval_comparison(&term(Field::Contract, CompareOp::Ne, text("two year")), &record));
    }

    #[test]
    fn null_literal_checks_presence() {
        let absent = CustomerRecord::default();
        let present = CustomerRecord::default().with_churn_score(0.2);
        let is_null = term(Field::ChurnScore, CompareOp::Eq, Literal::Null);
        let not_null = term(Field::ChurnScore, CompareOp::Ne, Literal::Null);

        assert!(eval_comparison(&is_null, &absent));
        assert!(!eval_comparison(&is_null, &present));
        assert!(!eval_comparison(&not_null, &absent));
        assert!(eval_comparison(&not_null, &present));
    }

    #[test]
    fn null_field_never_matches_a_value() {
        let absent = CustomerRecord::default();
        for op in [
            CompareOp::Eq,
            CompareOp::Ne,
            CompareOp::Lt,
            CompareOp::Le,
            CompareOp::Gt,
            CompareOp::Ge,
        ] {
            let t = term(Field::ChurnScore, op, Literal::Number(0.7));
            assert!(!eval_comparison(&t, &absent), "churn_score {op} 0.7 on null");
        }
        let t = term(Field::Segment, CompareOp::Ne, text("VIP"));
        assert!(!eval_comparison(&t, &absent));
    }

    #[test]
    fn short_circuits_after_first_false_term() {
        // The second term would hold; the first does not.
        let expr = Expr::new(vec![
            term(Field::Tenure, CompareOp::Gt, Literal::Number(48.0)),
            term(Field::Segment, CompareOp::Eq, text("OTHER")),
        ])
        .unwrap();
        let record = CustomerRecord::default()
            .with_tenure(5.0)
            .with_segment(Segment::Other);
        assert!(!evaluate(&expr, &record));
    }

    #[test]
    fn mismatched_runtime_kinds_are_false() {
        assert!(!compare(CompareOp::Eq, Value::Text("1"), Value::Number(1.0)));
        assert!(!compare(CompareOp::Lt, Value::Text("a"), Value::Text("b")));
    }
}
