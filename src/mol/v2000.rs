//! MDL Molfile V2000 reading and writing.
//!
//! Fixed-column format: three header lines, a counts line tagged `V2000`,
//! the atom block, the bond block, then property lines up to `M  END`.
//! The strict reader insists on the fixed columns; the relaxed reader
//! falls back to whitespace splitting for short lines and tolerates a
//! missing version tag or terminator.

use std::fmt::Write as _;

use crate::mol::{Atom, Bond, MolError, Molecule, ReadMode};

/// Parse V2000 text into a [`Molecule`].
pub fn read(text: &str, mode: ReadMode) -> Result<Molecule, MolError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(MolError::new(
            0,
            format!("truncated molfile: {} line(s), header needs 4", lines.len()),
        ));
    }

    let title = lines[0].trim().to_owned();
    let counts = lines[3];
    let (atom_count, bond_count) = read_counts(counts, mode)?;

    let mut molecule = Molecule {
        title,
        ..Molecule::default()
    };

    let atom_block = 4;
    for i in 0..atom_count {
        let line_no = atom_block + i;
        let line = lines.get(line_no).ok_or_else(|| {
            MolError::new(line_no + 1, "missing atom line")
        })?;
        molecule.atoms.push(read_atom(line, line_no + 1, mode)?);
    }

    let bond_block = atom_block + atom_count;
    for i in 0..bond_count {
        let line_no = bond_block + i;
        let line = lines.get(line_no).ok_or_else(|| {
            MolError::new(line_no + 1, "missing bond line")
        })?;
        molecule
            .bonds
            .push(read_bond(line, line_no + 1, atom_count, mode)?);
    }

    read_properties(&lines[bond_block + bond_count..], bond_block + bond_count, mode, &mut molecule)?;

    Ok(molecule)
}

/// Write a [`Molecule`] as V2000 text.
#[must_use]
pub fn write(molecule: &Molecule) -> String {
    let mut out = String::with_capacity(
        128 + molecule.atoms.len() * 70 + molecule.bonds.len() * 13,
    );
    out.push_str(&molecule.title);
    out.push_str("\n  chembed\n\n");
    let _ = writeln!(
        out,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        molecule.atoms.len(),
        molecule.bonds.len()
    );
    for atom in &molecule.atoms {
        let _ = writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.x, atom.y, atom.z, atom.element
        );
    }
    for bond in &molecule.bonds {
        let _ = writeln!(
            out,
            "{:>3}{:>3}{:>3}  0",
            bond.from + 1,
            bond.to + 1,
            bond.order
        );
    }
    for (i, atom) in molecule.atoms.iter().enumerate() {
        if atom.charge != 0 {
            let _ = writeln!(out, "M  CHG  1 {:>3} {:>3}", i + 1, atom.charge);
        }
    }
    out.push_str("M  END\n");
    out
}

fn read_counts(line: &str, mode: ReadMode) -> Result<(usize, usize), MolError> {
    if mode == ReadMode::Strict {
        let version = field(line, 33, 39).map(str::trim);
        if version != Some("V2000") {
            return Err(MolError::new(4, "counts line is not tagged V2000"));
        }
    }

    let atoms = parse_count(line, 0, 3, mode)
        .ok_or_else(|| MolError::new(4, "unreadable atom count"))?;
    let bonds = parse_count(line, 3, 6, mode)
        .ok_or_else(|| MolError::new(4, "unreadable bond count"))?;
    Ok((atoms, bonds))
}

fn read_atom(line: &str, line_no: usize, mode: ReadMode) -> Result<Atom, MolError> {
    let fixed = (
        field(line, 0, 10).and_then(parse_f64),
        field(line, 10, 20).and_then(parse_f64),
        field(line, 20, 30).and_then(parse_f64),
        field(line, 31, 34).map(str::trim),
    );
    if let (Some(x), Some(y), Some(z), Some(element)) = fixed {
        if !element.is_empty() {
            return Ok(Atom {
                element: element.to_owned(),
                x,
                y,
                z,
                charge: 0,
            });
        }
    }

    if mode == ReadMode::Relaxed {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() >= 4 {
            let coords = (
                tokens[0].parse::<f64>(),
                tokens[1].parse::<f64>(),
                tokens[2].parse::<f64>(),
            );
            if let (Ok(x), Ok(y), Ok(z)) = coords {
                return Ok(Atom {
                    element: tokens[3].to_owned(),
                    x,
                    y,
                    z,
                    charge: 0,
                });
            }
        }
    }

    Err(MolError::new(line_no, "malformed atom line"))
}

fn read_bond(
    line: &str,
    line_no: usize,
    atom_count: usize,
    mode: ReadMode,
) -> Result<Bond, MolError> {
    let fields = (
        parse_count(line, 0, 3, mode),
        parse_count(line, 3, 6, mode),
        parse_count(line, 6, 9, mode),
    );
    let (from, to, order) = match fields {
        (Some(a), Some(b), Some(o)) => (a, b, o),
        _ if mode == ReadMode::Relaxed => {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let parsed = (
                tokens.first().and_then(|t| t.parse().ok()),
                tokens.get(1).and_then(|t| t.parse().ok()),
                tokens.get(2).and_then(|t| t.parse().ok()),
            );
            match parsed {
                (Some(a), Some(b), Some(o)) => (a, b, o),
                _ => return Err(MolError::new(line_no, "malformed bond line")),
            }
        }
        _ => return Err(MolError::new(line_no, "malformed bond line")),
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
        order: u8::try_from(order).unwrap_or(1),
    })
}

fn read_properties(
    lines: &[&str],
    offset: usize,
    mode: ReadMode,
    molecule: &mut Molecule,
) -> Result<(), MolError> {
    let mut terminated = false;
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("M  END") {
            terminated = true;
            break;
        }
        if line.starts_with("M  CHG") {
            apply_charges(line, offset + i + 1, molecule)?;
        }
    }
    if !terminated && mode == ReadMode::Strict {
        return Err(MolError::new(0, "missing M  END terminator"));
    }
    Ok(())
}

/// Apply an `M  CHG` property line. The entry count is followed by
/// (atom, charge) pairs; charges given here supersede the atom block.
fn apply_charges(
    line: &str,
    line_no: usize,
    molecule: &mut Molecule,
) -> Result<(), MolError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    // tokens: "M" "CHG" n a1 v1 a2 v2 ...
    for pair in tokens.get(3..).unwrap_or(&[]).chunks(2) {
        let parsed = (
            pair.first().and_then(|t| t.parse::<usize>().ok()),
            pair.get(1).and_then(|t| t.parse::<i8>().ok()),
        );
        let (index, charge) = match parsed {
            (Some(i), Some(c)) => (i, c),
            _ => return Err(MolError::new(line_no, "malformed M  CHG line")),
        };
        match molecule.atoms.get_mut(index.wrapping_sub(1)) {
            Some(atom) => atom.charge = charge,
            None => {
                return Err(MolError::new(
                    line_no,
                    format!("M  CHG references atom out of range: {index}"),
                ))
            }
        }
    }
    Ok(())
}

fn field(line: &str, start: usize, end: usize) -> Option<&str> {
    line.get(start..end.min(line.len())).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

/// Parse a fixed-width numeric field; in relaxed mode a field that runs
/// past the line end is read to the end of the line instead.
fn parse_count(
    line: &str,
    start: usize,
    end: usize,
    mode: ReadMode,
) -> Option<usize> {
    if line.len() < end && mode == ReadMode::Strict {
        return None;
    }
    field(line, start, end).and_then(|s| s.trim().parse().ok())
}
