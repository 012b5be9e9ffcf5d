use harvest_core::calculator::{
    mass_per_area, net_mass_g, yield_at_standard_moisture, STANDARD_GRAIN_MOISTURE,
};

#[test]
fn net_mass_requires_both_measurements() {
    assert_eq!(net_mass_g(Some(1500.0), Some(100.0)), Some(1400.0));
    assert_eq!(net_mass_g(None, Some(100.0)), None);
    assert_eq!(net_mass_g(Some(1500.0), None), None);
}

#[test]
fn per_area_divides_by_the_quadrat_area() {
    assert_eq!(mass_per_area(Some(1400.0), 2.4384), Some(1400.0 / 2.4384));
    assert_eq!(mass_per_area(None, 2.4384), None);
}

#[test]
fn standard_moisture_yield_matches_the_release_formula() {
    let net = 280.0;
    let moisture = 10.0;
    let area = 2.4384;

    let expected = (net - net * (moisture / 100.0) + net * STANDARD_GRAIN_MOISTURE) / area;
    let actual = yield_at_standard_moisture(Some(net), Some(moisture), area).unwrap();
    assert!((actual - expected).abs() < 1e-12);
}

#[test]
fn grain_already_at_standard_moisture_is_unchanged() {
    // removing 12.5% water and adding 12.5% back cancels out
    let net = 200.0;
    let actual = yield_at_standard_moisture(Some(net), Some(12.5), 2.0).unwrap();
    assert!((actual - net / 2.0).abs() < 1e-12);
}

#[test]
fn standard_moisture_yield_needs_a_moisture_reading() {
    assert_eq!(yield_at_standard_moisture(Some(200.0), None, 2.0), None);
    assert_eq!(yield_at_standard_moisture(None, Some(10.0), 2.0), None);
}
