use super::vrp::ValueRange;

const BYTE: u64 = 0xFF;
const LONG: u64 = u64::MAX;

fn r(min: u64, max: u64) -> ValueRange {
    ValueRange::new(min, max)
}

#[test]
fn add_is_commutative() {
    let a = r(3, 7);
    let b = r((-2i64) as u64, 5);
    assert_eq!(a.add(b, LONG), b.add(a, LONG));
}

#[test]
fn complement_distributes_over_add() {
    let a = r(3, 7);
    let b = r((-2i64) as u64, 5);
    let lhs = a.complement(LONG).add(b.complement(LONG), LONG);
    let rhs = a.add(b, LONG).complement(LONG);
    assert_eq!(lhs, rhs);
}

#[test]
fn sub_matches_add_of_complement() {
    let a = r(3, 7);
    let b = r(1, 2);
    assert_eq!(a.sub(b, LONG), a.add(b.complement(LONG), LONG));
}

#[test]
fn sub_antisymmetry() {
    let a = r(3, 7);
    let b = r(1, 2);
    assert_eq!(b.sub(a, LONG), a.sub(b, LONG).complement(LONG));
}

#[test]
fn repack_is_idempotent() {
    let wide = r(200, 400);
    let once = wide.repack(BYTE);
    let twice = once.repack(BYTE);
    assert_eq!(once, twice);
}

#[test]
fn literal_can_fit_iff_no_truncation() {
    assert!(ValueRange::literal(11, LONG).can_fit(BYTE));
    assert!(!ValueRange::literal(300, LONG).can_fit(BYTE));
    assert!(ValueRange::literal(255, LONG).can_fit(BYTE));
}

#[test]
fn scenario_five_plus_six_fits_byte() {
    let x = ValueRange::literal(5, LONG).add(ValueRange::literal(6, LONG), LONG);
    assert_eq!(x, r(11, 11));
    assert!(x.can_fit(BYTE));
}

#[test]
fn overflowing_radius_pessimizes_to_full_range() {
    let a = r(0, u64::MAX / 2 + 1);
    let b = r(0, u64::MAX / 2 + 1);
    let sum = a.add(b, LONG);
    assert_eq!(sum, ValueRange::full_range(LONG));
}

#[test]
fn negative_sub_scenario() {
    // sub(Range(-1), Range(1), Long) -> Range(-2)
    let neg_one = ValueRange::literal((-1i64) as u64, LONG);
    let one = ValueRange::literal(1, LONG);
    let expected = ValueRange::literal((-2i64) as u64, LONG);
    assert_eq!(neg_one.sub(one, LONG), expected);
}

#[test]
fn add_negative_and_positive_ranges_on_long() {
    // add(Range(-5, 0), Range(-1, 5), Long) -> Range(-6, 5)
    let a = r((-5i64) as u64, 0);
    let b = r((-1i64) as u64, 5);
    let expected = r((-6i64) as u64, 5);
    assert_eq!(a.add(b, LONG), expected);
}

#[test]
fn variable_reference_to_a_const_uses_its_known_value() {
    let known = ValueRange::literal(5, BYTE);
    let range = ValueRange::for_variable_reference(true, Some(known), BYTE);
    assert_eq!(range, known);
}

#[test]
fn variable_reference_to_a_mutable_variable_widens_to_the_full_range() {
    let known = ValueRange::literal(5, BYTE);
    let range = ValueRange::for_variable_reference(false, Some(known), BYTE);
    assert_eq!(range, ValueRange::full_range(BYTE));
}

#[test]
fn variable_reference_without_a_known_value_widens_to_the_full_range() {
    let range = ValueRange::for_variable_reference(true, None, BYTE);
    assert_eq!(range, ValueRange::full_range(BYTE));
}
