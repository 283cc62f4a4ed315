use crate::evaluation::Snapshot;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

#[derive(Debug, Default)]
pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        match fmt {
            CurveFormat::Csv => self.write_delimited(&mut w, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut w, '\t')?,
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut w, &self.entries)?;
                writeln!(w)?;
            }
        }
        w.flush()
    }

    /// Fixed columns first, then every extra metric seen in any snapshot,
    /// left empty where a snapshot lacks it.
    fn write_delimited<W: Write>(&self, w: &mut W, d: char) -> Result<(), Error> {
        let extras: BTreeSet<&str> = self
            .entries
            .iter()
            .flat_map(|s| s.extras.keys().map(String::as_str))
            .collect();

        write!(w, "instances_seen{d}accuracy{d}kappa{d}model_bytes{d}seconds")?;
        for name in &extras {
            write!(w, "{d}{name}")?;
        }
        writeln!(w)?;

        for s in &self.entries {
            write!(
                w,
                "{}{d}{:.12}{d}{:.12}{d}{}{d}{:.6}",
                s.instances_seen, s.accuracy, s.kappa, s.model_bytes, s.seconds
            )?;
            for name in &extras {
                match s.extras.get(*name) {
                    Some(v) => write!(w, "{d}{v:.12}")?,
                    None => write!(w, "{d}")?,
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
