/// Online scalar estimate over weighted values.
pub trait Estimator {
    /// NaN values are ignored.
    fn add(&mut self, value: f64, weight: f64);

    /// NaN until something was added.
    fn estimation(&self) -> f64;
}
