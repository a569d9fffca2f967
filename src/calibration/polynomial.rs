/// Evaluates the ionospheric polynomial basis, for a pierce point located at
/// (`delta_modip`, `delta_lon`) from the receiver.
/// Returns `max_degree + 2` terms: the normalization factor
/// `w = 1 / (1 + |Δmodip|^(max_degree + 1))`, `Δlon w`, then `Δmodip^j w` for j in 1..=max_degree.
pub fn polynomial_terms(delta_modip: f64, delta_lon: f64, max_degree: usize) -> Vec<f64> {
    let w = 1.0 / (1.0 + delta_modip.abs().powi(max_degree as i32 + 1));
    let mut terms = Vec::with_capacity(max_degree + 2);
    terms.push(w);
    terms.push(delta_lon * w);
    for j in 1..=max_degree {
        terms.push(delta_modip.powi(j as i32) * w);
    }
    terms
}
