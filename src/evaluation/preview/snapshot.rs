use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

/// One point of a learning curve. Metrics other than accuracy and kappa,
/// e.g. `mae` for regressors, go to `extras`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub model_bytes: usize,
    pub seconds: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "seen={}, acc={:.6}, kappa={:.6}, bytes={}, t={:.3}s",
            self.instances_seen, self.accuracy, self.kappa, self.model_bytes, self.seconds
        )?;
        for (name, value) in &self.extras {
            write!(f, ", {name}={value:.6}")?;
        }
        Ok(())
    }
}
