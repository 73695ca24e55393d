//! MDL Molfile V3000 reading and writing.
//!
//! V3000 keeps the three header lines and a counts line tagged `V3000`,
//! then moves the connection table into `M  V30` prefixed blocks:
//! `BEGIN CTAB`, a `COUNTS` line, `ATOM` and `BOND` blocks, `END CTAB`,
//! and the shared `M  END` terminator.

use std::fmt::Write as _;

use crate::mol::{Atom, Bond, MolError, Molecule, ReadMode};

const PREFIX: &str = "M  V30 ";

/// Parse V3000 text into a [`Molecule`].
pub fn read(text: &str, mode: ReadMode) -> Result<Molecule, MolError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(MolError::new(
            0,
            format!("truncated molfile: {} line(s), header needs 4", lines.len()),
        ));
    }

    if mode == ReadMode::Strict && !lines[3].contains("V3000") {
        return Err(MolError::new(4, "counts line is not tagged V3000"));
    }

    let mut molecule = Molecule {
        title: lines[0].trim().to_owned(),
        ..Molecule::default()
    };

    let mut expected_atoms = 0usize;
    let mut expected_bonds = 0usize;
    let mut in_atoms = false;
    let mut in_bonds = false;
    let mut terminated = false;

    for (i, raw) in lines.iter().enumerate().skip(4) {
        let line_no = i + 1;
        if raw.starts_with("M  END") {
            terminated = true;
            break;
        }
        let Some(body) = raw.strip_prefix(PREFIX) else {
            continue;
        };

        if let Some(counts) = body.strip_prefix("COUNTS ") {
            let mut tokens = counts.split_whitespace();
            let parsed = (
                tokens.next().and_then(|t| t.parse().ok()),
                tokens.next().and_then(|t| t.parse().ok()),
            );
            (expected_atoms, expected_bonds) = match parsed {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(MolError::new(line_no, "malformed COUNTS line"))
                }
            };
        } else if body.starts_with("BEGIN ATOM") {
            in_atoms = true;
        } else if body.starts_with("END ATOM") {
            in_atoms = false;
        } else if body.starts_with("BEGIN BOND") {
            in_bonds = true;
        } else if body.starts_with("END BOND") {
            in_bonds = false;
        } else if in_atoms {
            molecule.atoms.push(read_atom(body, line_no)?);
        } else if in_bonds {
            molecule
                .bonds
                .push(read_bond(body, line_no, molecule.atoms.len())?);
        }
    }

    if !terminated && mode == ReadMode::Strict {
        return Err(MolError::new(0, "missing M  END terminator"));
    }
    if mode == ReadMode::Strict
        && (molecule.atoms.len() != expected_atoms
            || molecule.bonds.len() != expected_bonds)
    {
        return Err(MolError::new(
            0,
            format!(
                "COUNTS declares {expected_atoms} atom(s)/{expected_bonds} bond(s), \
                 found {}/{}",
                molecule.atoms.len(),
                molecule.bonds.len()
            ),
        ));
    }

    Ok(molecule)
}

/// Write a [`Molecule`] as V3000 text.
#[must_use]
pub fn write(molecule: &Molecule) -> String {
    let mut out = String::with_capacity(
        160 + molecule.atoms.len() * 48 + molecule.bonds.len() * 24,
    );
    out.push_str(&molecule.title);
    out.push_str("\n  chembed\n\n");
    out.push_str("  0  0  0     0  0            999 V3000\n");
    out.push_str("M  V30 BEGIN CTAB\n");
    let _ = writeln!(
        out,
        "M  V30 COUNTS {} {} 0 0 0",
        molecule.atoms.len(),
        molecule.bonds.len()
    );
    out.push_str("M  V30 BEGIN ATOM\n");
    for (i, atom) in molecule.atoms.iter().enumerate() {
        let _ = write!(
            out,
            "M  V30 {} {} {} {} {} 0",
            i + 1,
            atom.element,
            atom.x,
            atom.y,
            atom.z
        );
        if atom.charge != 0 {
            let _ = write!(out, " CHG={}", atom.charge);
        }
        out.push('\n');
    }
    out.push_str("M  V30 END ATOM\n");
    out.push_str("M  V30 BEGIN BOND\n");
    for (i, bond) in molecule.bonds.iter().enumerate() {
        let _ = writeln!(
            out,
            "M  V30 {} {} {} {}",
            i + 1,
            bond.order,
            bond.from + 1,
            bond.to + 1
        );
    }
    out.push_str("M  V30 END BOND\n");
    out.push_str("M  V30 END CTAB\n");
    out.push_str("M  END\n");
    out
}

/// Atom line body: `index element x y z aamap [KEY=value...]`.
fn read_atom(body: &str, line_no: usize) -> Result<Atom, MolError> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(MolError::new(line_no, "malformed atom line"));
    }
    let coords = (
        tokens[2].parse::<f64>(),
        tokens[3].parse::<f64>(),
        tokens[4].parse::<f64>(),
    );
    let (Ok(x), Ok(y), Ok(z)) = coords else {
        return Err(MolError::new(line_no, "unreadable atom coordinates"));
    };

    let mut charge = 0i8;
    for token in &tokens[5..] {
        if let Some(value) = token.strip_prefix("CHG=") {
            charge = value.parse().map_err(|_| {
                MolError::new(line_no, "unreadable CHG value")
            })?;
        }
    }

    Ok(Atom {
        element: tokens[1].to_owned(),
        x,
        y,
        z,
        charge,
    })
}

/// Bond line body: `index order from to`.
fn read_bond(
    body: &str,
    line_no: usize,
    atom_count: usize,
) -> Result<Bond, MolError> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(MolError::new(line_no, "malformed bond line"));
    }
    let parsed = (
        tokens[1].parse::<u8>(),
        tokens[2].parse::<usize>(),
        tokens[3].parse::<usize>(),
    );
    let (Ok(order), Ok(from), Ok(to)) = parsed else {
        return Err(MolError::new(line_no, "malformed bond line"));
    };
    if from == 0 || to == 0 || from > atom_count || to > atom_count {
        return Err(MolError::new(
            line_no,
            format!("bond references atom out of range: {from}-{to}"),
        ));
    }
    Ok(Bond {
        from: from - 1,
        to: to - 1,
        order,
    })
}
