use super::*;

#[test]
fn pads_single_digit_numbers() {
    assert_eq!(pad_number(7), "07");
    assert_eq!(pad_number(23), "23");
    assert_eq!(pad_number(80), "80");
}

#[test]
fn formats_brl_with_grouping_and_cents() {
    assert_eq!(format_currency(Some(1234.5)), "R$\u{a0}1.234,50");
    assert_eq!(format_currency(Some(3_500_000.0)), "R$\u{a0}3.500.000,00");
    assert_eq!(format_currency(Some(999.999)), "R$\u{a0}1.000,00");
    assert_eq!(format_currency(Some(-12.3)), "-R$\u{a0}12,30");
}

#[test]
fn missing_amount_formats_like_zero() {
    assert_eq!(format_currency(Some(0.0)), format_currency(None));
    assert_eq!(format_currency(None), "R$\u{a0}0,00");
}

#[test]
fn dates_pass_through_or_fall_back() {
    assert_eq!(format_date(Some("01/02/2024")), "01/02/2024");
    assert_eq!(format_date(Some("")), "N/A");
    assert_eq!(format_date(None), "N/A");
    assert_eq!(format_date(Some("bad")), "bad");
    assert_eq!(format_date(Some("2024-02-01")), "2024-02-01");
}

#[test]
fn placeholder_replaces_blank_values() {
    assert_eq!(or_placeholder(Some("Rio de Janeiro")), "Rio de Janeiro");
    assert_eq!(or_placeholder(Some("   ")), "N/A");
    assert_eq!(or_placeholder::<u32>(None), "N/A");
    assert_eq!(yes_no(true), "SIM");
    assert_eq!(yes_no(false), "NÃO");
    assert_eq!(format_percent(48.57), "48.57%");
    assert_eq!(format_percent(50.0), "50%");
}
