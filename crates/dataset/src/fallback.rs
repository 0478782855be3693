use retention_core::CustomerRecord;

/// `(customer_id, monthly_charges, tenure, contract)` of the built-in sample.
const SAMPLE: [(&str, f64, f64, &str); 5] = [
    ("VIP-001", 110.0, 2.0, "Month-to-month"),
    ("VIP-002", 105.0, 60.0, "Two year"),
    ("STD-001", 65.0, 12.0, "One year"),
    ("OTH-001", 30.0, 5.0, "Month-to-month"),
    ("VIP-003", 95.0, 1.0, "Month-to-month"),
];

/// A small fixed dataset used when no customer file is available.
///
/// Segment and churn score are left unset; derive them like any other input.
pub fn fallback_records() -> Vec<CustomerRecord> {
    SAMPLE
        .iter()
        .map(|&(id, charges, tenure, contract)| {
            CustomerRecord::new(id)
                .with_monthly_charges(charges)
                .with_tenure(tenure)
                .with_contract(contract)
        })
        .collect()
}
