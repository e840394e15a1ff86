use super::*;

#[test]
fn empty_input_is_accepted() {
    assert_eq!(validate(""), Validation::Accepted(String::new()));
}

#[test]
fn non_digit_characters_are_rejected() {
    for raw in ["abc", "12a", "-5", "+5", "1.5", " 10", "10 ", "1e3", "١٢"] {
        assert_eq!(
            validate(raw),
            Validation::Rejected(Rejection::NonNumeric),
            "raw={raw:?}"
        );
    }
}

#[test]
fn values_outside_range_are_rejected() {
    for raw in ["0", "000", "4000", "10000", "99999999999999999999999"] {
        assert_eq!(
            validate(raw),
            Validation::Rejected(Rejection::OutOfRange),
            "raw={raw:?}"
        );
    }
}

#[test]
fn every_convertible_value_is_accepted_verbatim() {
    for n in 1..=3999u32 {
        let raw = n.to_string();
        assert_eq!(validate(&raw), Validation::Accepted(raw.clone()));
    }
}

#[test]
fn leading_zeros_are_preserved() {
    assert_eq!(validate("0010"), Validation::Accepted("0010".to_string()));
    assert!(validate("03999").is_accepted());
}
