/// Trade-standard grain moisture fraction used for the normalized yield.
pub const STANDARD_GRAIN_MOISTURE: f64 = 0.125;

pub fn net_mass_g(gross_g: Option<f64>, tare_g: Option<f64>) -> Option<f64> {
    match (gross_g, tare_g) {
        (Some(gross), Some(tare)) => Some(gross - tare),
        _ => None,
    }
}

pub fn mass_per_area(mass_g: Option<f64>, area_m2: f64) -> Option<f64> {
    mass_g.map(|mass| mass / area_m2)
}

/// Grain yield per area after normalizing the grain mass to the 12.5%
/// moisture basis: the measured water fraction is removed and the standard
/// fraction of the as-measured mass is added back.
pub fn yield_at_standard_moisture(
    net_grain_g: Option<f64>,
    moisture_pct: Option<f64>,
    area_m2: f64,
) -> Option<f64> {
    let (net, moisture) = match (net_grain_g, moisture_pct) {
        (Some(net), Some(moisture)) => (net, moisture),
        _ => return None,
    };

    let standardized = net - net * (moisture / 100.0) + net * STANDARD_GRAIN_MOISTURE;
    Some(standardized / area_m2)
}
