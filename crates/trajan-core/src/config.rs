//! Typed simulation parameters.
//!
//! The parameter source is an opaque nested key-value tree produced by the
//! simulation driver; the core only reads the fields below. Dynamic
//! attribute dictionaries are deliberately replaced by this explicit struct
//! so required keys are validated at load time, with [`ConfigError`]
//! naming whatever is absent.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default anchor id offset (1-based producer numbering).
const fn default_id_offset() -> i32 {
    1
}

/// Parameters of one rigid filament species.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FilamentParams {
    /// Species name (used in data file names).
    pub name: String,
    /// Filament length.
    pub length: f64,
    /// Filament diameter.
    #[serde(default)]
    pub diameter: Option<f64>,
    /// Whether filaments are held stationary.
    #[serde(default)]
    pub stationary_flag: Option<bool>,
}

/// Parameters of one crosslinker species.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct XlinkParams {
    /// Species name (used in data file names).
    pub name: String,
    /// Bulk concentration.
    #[serde(default)]
    pub concentration: Option<f64>,
    /// Linear spring constant of the crosslinker.
    pub k_spring: f64,
    /// Number of crosslinker objects of this species.
    #[serde(default)]
    pub n_spec: Option<u64>,
}

/// Parameters of one optical-trap species.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrapParams {
    /// Species name (used in data file names).
    pub name: String,
    /// Trap spring constant.
    pub k_spring: f64,
}

/// Snapshot of one run's parameter file.
///
/// Seeds of the same scan share this snapshot; the aggregator compares it
/// for equality to validate provenance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SimParams {
    /// Run name; all per-seed data files derive from it.
    pub run_name: String,
    /// Stochastic seed identifier of this run.
    pub seed: u64,
    /// Anchor `attached_id` offset used by the classifier (historically 1
    /// or 2 depending on producer revision; never hard-code it).
    #[serde(default = "default_id_offset")]
    pub anchor_id_offset: i32,
    /// Rigid-filament species, in producer order.
    #[serde(default)]
    pub rigid_filament: Vec<FilamentParams>,
    /// Crosslinker species, in producer order.
    #[serde(default)]
    pub crosslink: Vec<XlinkParams>,
    /// Optical-trap species, if the assay uses one.
    #[serde(default)]
    pub optical_trap: Vec<TrapParams>,
}

impl SimParams {
    /// Whether two snapshots came from the same scan configuration.
    ///
    /// Sibling seeds share everything except the seed identifier, so that
    /// field is ignored here.
    #[must_use]
    pub fn same_provenance(&self, other: &Self) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.seed = 0;
        b.seed = 0;
        a == b
    }

    /// First rigid-filament species (the assay geometry reference).
    pub fn filament(&self) -> Result<&FilamentParams, ConfigError> {
        self.rigid_filament
            .first()
            .ok_or_else(|| ConfigError::MissingKey { key: "rigid_filament[0]".into() })
    }

    /// First crosslinker species.
    pub fn crosslink(&self) -> Result<&XlinkParams, ConfigError> {
        self.crosslink
            .first()
            .ok_or_else(|| ConfigError::MissingKey { key: "crosslink[0]".into() })
    }

    /// First optical-trap species, when present.
    #[must_use]
    pub fn trap(&self) -> Option<&TrapParams> {
        self.optical_trap.first()
    }

    /// Half the nominal filament length; the decoder re-centers lambda
    /// offsets by this so 0 is the filament midpoint.
    pub fn half_length(&self) -> Result<f64, ConfigError> {
        Ok(self.filament()?.length * 0.5)
    }

    /// Crosslinker species count used to scale time-averaged densities.
    pub fn n_spec(&self) -> Result<u64, ConfigError> {
        self.crosslink()?
            .n_spec
            .ok_or_else(|| ConfigError::MissingKey { key: "crosslink[0].n_spec".into() })
    }

    /* ---------- conventional per-seed file names ---------- */

    /// `<run>_params.json`
    #[must_use]
    pub fn params_file(&self) -> PathBuf {
        PathBuf::from(format!("{}_params.json", self.run_name))
    }

    /// `<run>_crosslink_<name>.spec`
    pub fn crosslink_file(&self) -> Result<PathBuf, ConfigError> {
        let name = &self.crosslink()?.name;
        Ok(PathBuf::from(format!("{}_crosslink_{}.spec", self.run_name, name)))
    }

    /// `<run>_rigid_filament_<name>.posit`
    pub fn filament_file(&self) -> Result<PathBuf, ConfigError> {
        let name = &self.filament()?.name;
        Ok(PathBuf::from(format!("{}_rigid_filament_{}.posit", self.run_name, name)))
    }

    /// `<run>_optical_trap_<name>.posit`, when a trap species exists.
    #[must_use]
    pub fn trap_file(&self) -> Option<PathBuf> {
        self.trap()
            .map(|t| PathBuf::from(format!("{}_optical_trap_{}.posit", self.run_name, t.name)))
    }

    /// `<run>_result.json`, the per-seed analysis output.
    #[must_use]
    pub fn result_file(&self) -> PathBuf {
        PathBuf::from(format!("{}_result.json", self.run_name))
    }
}

/// Read a [`SimParams`] snapshot from a JSON parameter file.
pub fn read_params<P: AsRef<Path>>(path: P) -> Result<SimParams> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;
    let rdr = BufReader::new(f);
    let v: SimParams =
        serde_json::from_reader(rdr).with_context(|| "deserialize JSON parameter file")?;
    Ok(v)
}

/// Write a [`SimParams`] snapshot to a JSON parameter file (pretty).
pub fn write_params<P: AsRef<Path>>(path: P, params: &SimParams) -> Result<()> {
    let path_ref = path.as_ref();
    let f = File::create(path_ref).with_context(|| format!("create {}", path_ref.display()))?;
    serde_json::to_writer_pretty(f, params).with_context(|| "serialize JSON parameter file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SimParams {
        SimParams {
            run_name: "ot_test".into(),
            seed: 7,
            anchor_id_offset: 1,
            rigid_filament: vec![FilamentParams {
                name: "fil".into(),
                length: 10.0,
                diameter: Some(1.0),
                stationary_flag: Some(true),
            }],
            crosslink: vec![XlinkParams {
                name: "xl".into(),
                concentration: Some(0.1),
                k_spring: 2.0,
                n_spec: Some(100),
            }],
            optical_trap: vec![],
        }
    }

    #[test]
    fn half_length_and_file_names() {
        let p = minimal();
        assert_eq!(p.half_length().unwrap(), 5.0);
        assert_eq!(
            p.crosslink_file().unwrap().to_string_lossy(),
            "ot_test_crosslink_xl.spec"
        );
        assert_eq!(
            p.filament_file().unwrap().to_string_lossy(),
            "ot_test_rigid_filament_fil.posit"
        );
        assert!(p.trap_file().is_none());
    }

    #[test]
    fn missing_species_names_the_key() {
        let mut p = minimal();
        p.rigid_filament.clear();
        let err = p.half_length().unwrap_err();
        assert!(err.to_string().contains("rigid_filament[0]"));
    }

    #[test]
    fn id_offset_defaults_to_one() {
        let json = r#"{"run_name":"r","seed":0}"#;
        let p: SimParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.anchor_id_offset, 1);
    }
}
