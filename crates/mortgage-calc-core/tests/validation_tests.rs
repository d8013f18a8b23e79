use mortgage_calc_core::calculators::affordability::validate_affordability_inputs;
use mortgage_calc_core::calculators::purchase::validate_purchase_inputs;
use mortgage_calc_core::calculators::refinance::validate_refinance_inputs;
use mortgage_calc_core::calculators::rent_vs_buy::validate_rent_vs_buy_inputs;
use mortgage_calc_core::{validate, CalculatorKind, ValidationOutcome};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

#[test]
fn test_affordability_valid_record_is_typed() {
    let raw = json!({ "annualIncome": 95000, "monthlyDebts": 0, "downPayment": 0, "interestRate": 0 });
    let input = validate_affordability_inputs(&raw).unwrap();
    assert_eq!(input.annual_income, dec!(95_000));
    assert_eq!(input.interest_rate, dec!(0));
}

#[test]
fn test_affordability_upper_bounds() {
    let raw = json!({
        "annualIncome": 10_000_001,
        "monthlyDebts": 100_001,
        "downPayment": 10_000_001,
        "interestRate": 20.01
    });
    let errors = validate_affordability_inputs(&raw).unwrap_err();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get("annualIncome"), Some("must be at most 10000000"));
    assert_eq!(errors.get("interestRate"), Some("must be at most 20"));
}

#[test]
fn test_bounds_are_inclusive() {
    let raw = json!({ "annualIncome": 10_000_000, "monthlyDebts": 100_000, "downPayment": 10_000_000, "interestRate": 20 });
    assert!(validate_affordability_inputs(&raw).is_ok());

    let raw = json!({
        "homePrice": 1000, "downPayment": 1000, "interestRate": 0, "loanTerm": 1,
        "propertyTaxRate": 0, "insurance": 0, "hoa": 0
    });
    assert!(validate_purchase_inputs(&raw).is_ok());
}

#[test]
fn test_purchase_collects_every_field() {
    let raw = json!({
        "homePrice": 999,
        "downPayment": -5,
        "interestRate": 25,
        "loanTerm": 0,
        "propertyTaxRate": -1,
        "insurance": "lots",
        "hoa": null
    });
    let errors = validate_purchase_inputs(&raw).unwrap_err();
    let fields: Vec<&str> = errors.fields().collect();
    assert_eq!(
        fields,
        vec![
            "downPayment",
            "hoa",
            "homePrice",
            "insurance",
            "interestRate",
            "loanTerm",
            "propertyTaxRate",
        ]
    );
    assert_eq!(errors.get("insurance"), Some("must be a number"));
    assert_eq!(errors.get("hoa"), Some("is required"));
}

#[test]
fn test_cross_field_only_checked_when_both_fields_valid() {
    let raw = json!({
        "homePrice": 500, "downPayment": 900, "interestRate": 5, "rentAmount": 1000,
        "yearsToStay": 5, "appreciationRate": 2
    });
    let errors = validate_rent_vs_buy_inputs(&raw).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains("homePrice"));
}

#[test]
fn test_refinance_terms_must_be_whole_years() {
    let raw = json!({
        "currentBalance": 200000, "currentRate": 6, "newRate": 5,
        "remainingTerm": 12.5, "newTerm": 15, "closingCosts": 0
    });
    let errors = validate_refinance_inputs(&raw).unwrap_err();
    assert_eq!(errors.get("remainingTerm"), Some("must be a whole number of years"));
}

#[test]
fn test_non_finite_strings_rejected() {
    let raw = json!({
        "homePrice": "Infinity", "downPayment": "nan", "interestRate": "-inf", "rentAmount": 1000,
        "yearsToStay": 5, "appreciationRate": 2
    });
    let errors = validate_rent_vs_buy_inputs(&raw).unwrap_err();
    for field in ["homePrice", "downPayment", "interestRate"] {
        assert_eq!(errors.get(field), Some("must be a finite number"), "{field}");
    }
}

#[test]
fn test_outcome_json_for_every_calculator() {
    for kind in CalculatorKind::ALL {
        let outcome = validate(kind, &json!({})).unwrap();
        assert_eq!(outcome["success"], false, "{kind}");
        assert!(outcome.get("data").is_none());
        assert!(!outcome["errors"].as_object().unwrap().is_empty());
    }
}

#[test]
fn test_outcome_success_carries_typed_data() {
    let raw = json!({ "annualIncome": "80000", "monthlyDebts": 500, "downPayment": 20000, "interestRate": 7 });
    let outcome: ValidationOutcome<_> = validate_affordability_inputs(&raw).into();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["annualIncome"], "80000");
    assert!(json.get("errors").is_none());
}

#[test]
fn test_overflow_sized_amounts_are_field_errors() {
    let raw = json!({
        "homePrice": 300000, "downPayment": 60000, "interestRate": 6.5, "loanTerm": 30,
        "propertyTaxRate": 1.2, "insurance": 1200, "hoa": "1000000000000000000000000000"
    });
    let errors = validate_purchase_inputs(&raw).unwrap_err();
    assert_eq!(errors.get("hoa"), Some("must be at most 1000000000000"));
    assert_eq!(errors.len(), 1);

    let raw = json!({
        "homePrice": 300000, "downPayment": 60000, "interestRate": 6, "rentAmount": "10000000000000000000000000000",
        "yearsToStay": 5, "appreciationRate": 2
    });
    let errors = validate_rent_vs_buy_inputs(&raw).unwrap_err();
    assert_eq!(errors.get("rentAmount"), Some("must be at most 1000000000000"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_open_ended_fields_have_ceilings() {
    let raw = json!({
        "homePrice": "1000000000001", "downPayment": 0, "interestRate": 5, "loanTerm": 30,
        "propertyTaxRate": 101, "insurance": "1e13", "hoa": 0
    });
    let errors = validate_purchase_inputs(&raw).unwrap_err();
    let fields: Vec<&str> = errors.fields().collect();
    assert_eq!(fields, vec!["homePrice", "insurance", "propertyTaxRate"]);
    assert_eq!(errors.get("propertyTaxRate"), Some("must be at most 100"));

    let raw = json!({
        "currentBalance": "2000000000000", "currentRate": 6, "newRate": 5,
        "remainingTerm": 20, "newTerm": 20, "closingCosts": "2000000000000"
    });
    let errors = validate_refinance_inputs(&raw).unwrap_err();
    assert!(errors.contains("currentBalance"));
    assert!(errors.contains("closingCosts"));
}
