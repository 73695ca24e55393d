//! Minimal connection-table chemistry for the widget layer.
//!
//! This module covers exactly what the server side of the widgets needs:
//! parse and write MDL Molfile V2000/V3000 text, count atoms and bonds,
//! and derive a molecular formula. It deliberately stops there; anything
//! deeper (aromaticity, stereochemistry, queries) belongs to the browser
//! plugins and is out of scope.

mod convert;
mod validate;

pub mod v2000;
pub mod v3000;

use std::fmt;

pub use convert::MolfileConverter;
pub use validate::{ConstraintViolation, MolfileValidator, DEFAULT_MESSAGE};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ChembedError;

/// Chemical file format selector for the `value` exchanged with a widget.
///
/// Routing is explicit: a V2000 converter never tries to read V3000 text
/// and vice versa. Selecting the wrong format is a caller error.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
pub enum MolFormat {
    /// MDL Molfile V2000.
    #[default]
    #[serde(rename = "MDLV2000")]
    V2000,
    /// MDL Molfile V3000.
    #[serde(rename = "MDLV3000")]
    V3000,
}

impl fmt::Display for MolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2000 => f.write_str("MDLV2000"),
            Self::V3000 => f.write_str("MDLV3000"),
        }
    }
}

impl std::str::FromStr for MolFormat {
    type Err = ChembedError;

    /// Any value other than `MDLV2000`/`MDLV3000` is a configuration
    /// error and fails fast.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MDLV2000" => Ok(Self::V2000),
            "MDLV3000" => Ok(Self::V3000),
            other => Err(ChembedError::UnknownFormat(other.to_owned())),
        }
    }
}

/// How tolerant a Molfile reader is of format deviations.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Tolerate minor deviations (short lines, missing version tag,
    /// missing `M  END`).
    #[default]
    Relaxed,
    /// Reject any deviation from the format.
    Strict,
}

/// Molfile reading/writing failure with the parser's diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolError {
    /// One-based line number the diagnostic refers to (0 when the input as
    /// a whole is at fault, e.g. truncated before the counts line).
    pub line: usize,
    /// Parser diagnostic text.
    pub message: String,
}

impl MolError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for MolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

impl std::error::Error for MolError {}

/// One atom of a connection table.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol as written in the Molfile (e.g. `C`, `Cl`).
    pub element: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Formal charge.
    pub charge: i8,
}

/// One bond of a connection table, referencing atoms by zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First atom index.
    pub from: usize,
    /// Second atom index.
    pub to: usize,
    /// Bond order (1-3; 4 denotes aromatic in Molfile conventions).
    pub order: u8,
}

/// An in-memory molecule: title plus connection table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    /// Title from the Molfile header (first line).
    pub title: String,
    /// Atom block.
    pub atoms: Vec<Atom>,
    /// Bond block.
    pub bonds: Vec<Bond>,
}

impl Molecule {
    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Molecular formula in Hill order (C first, then H, then the rest
    /// alphabetically), including implicit hydrogens derived from standard
    /// valences.
    #[must_use]
    pub fn formula(&self) -> String {
        let mut counts: std::collections::BTreeMap<String, usize> =
            std::collections::BTreeMap::new();
        for (i, atom) in self.atoms.iter().enumerate() {
            *counts.entry(atom.element.clone()).or_insert(0) += 1;
            let implicit = self.implicit_hydrogens(i);
            if implicit > 0 {
                *counts.entry("H".to_owned()).or_insert(0) += implicit;
            }
        }

        let mut out = String::new();
        let has_carbon = counts.contains_key("C");
        if has_carbon {
            if let Some(n) = counts.remove("C") {
                push_element(&mut out, "C", n);
            }
            if let Some(n) = counts.remove("H") {
                push_element(&mut out, "H", n);
            }
        }
        for (element, n) in &counts {
            push_element(&mut out, element, *n);
        }
        out
    }

    /// Implicit hydrogen count for the atom at `index`, from standard
    /// valences adjusted by formal charge. Elements without a standard
    /// valence contribute none.
    #[must_use]
    pub fn implicit_hydrogens(&self, index: usize) -> usize {
        let Some(atom) = self.atoms.get(index) else {
            return 0;
        };
        let Some(valence) = default_valence(&atom.element) else {
            return 0;
        };

        let charge = i32::from(atom.charge);
        let effective = match atom.element.as_str() {
            // Carbon loses a bonding slot either way.
            "C" => valence - charge.abs(),
            // Heteroatoms gain/lose slots with charge (N+ binds 4, O- binds 1).
            "N" | "P" | "O" | "S" => valence + charge,
            _ => valence,
        };

        let bonded: i32 = self
            .bonds
            .iter()
            .filter(|b| b.from == index || b.to == index)
            .map(|b| i32::from(bond_valence(b.order)))
            .sum();

        usize::try_from(effective - bonded).unwrap_or(0)
    }
}

fn push_element(out: &mut String, element: &str, count: usize) {
    out.push_str(element);
    if count > 1 {
        out.push_str(&count.to_string());
    }
}

/// Standard valence for the elements that commonly carry implicit
/// hydrogens in Molfiles.
fn default_valence(element: &str) -> Option<i32> {
    match element {
        "H" | "F" | "Cl" | "Br" | "I" => Some(1),
        "O" | "S" => Some(2),
        "B" | "N" | "P" => Some(3),
        "C" | "Si" => Some(4),
        _ => None,
    }
}

/// Valence contribution of a bond order; the aromatic order (4) counts as
/// a single bond for hydrogen-filling purposes.
const fn bond_valence(order: u8) -> u8 {
    match order {
        2 => 2,
        3 => 3,
        _ => 1,
    }
}
