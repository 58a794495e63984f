/// What is left of a stock line once the weight committed to cargo orders is taken out. Never negative.
pub fn available_quantity(initial: f64, committed: f64) -> f64 {
    (initial - committed).max(0.0)
}
