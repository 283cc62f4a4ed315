use std::f64::consts::PI;

/// Class boundaries of the SINE generator. Reversed variants swap the labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SineFunction {
    Sine1,
    ReversedSine1,
    Sine2,
    ReversedSine2,
}

impl SineFunction {
    /// Class of the point `(a1, a2)`.
    pub fn classify(self, a1: f64, a2: f64) -> u8 {
        let below = match self {
            SineFunction::Sine1 | SineFunction::ReversedSine1 => a1 < a2.sin(),
            SineFunction::Sine2 | SineFunction::ReversedSine2 => {
                a1 < 0.5 + 0.3 * (3.0 * PI * a2).sin()
            }
        };
        let reversed = matches!(self, SineFunction::ReversedSine1 | SineFunction::ReversedSine2);
        (below != reversed) as u8
    }
}
