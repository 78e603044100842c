// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading what the user types: polynomial roots at an interactive
//! prompt, and the `800x600` / `-2,-2` style values of the command
//! line.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::complex::Complex;
use crate::errors::FractalError;

/// Fewer roots than this make a boring picture.
pub const MIN_ROOTS: usize = 2;

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// two finite floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex> {
    parse_pair(s, ',').and_then(|(re, im)| Complex::new(re, im).ok())
}

/// Prompts for roots on `output` and reads them, one per line, from
/// `input` until the user types `done` (or the input ends).  Lines
/// that do not parse are reported and skipped; `done` is refused until
/// there are at least `MIN_ROOTS` roots.
pub fn read_roots<R, W>(input: R, output: &mut W) -> Result<Vec<Complex>, FractalError>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "Please enter at least {} roots, one root per line. Enter 'done' when done.",
        MIN_ROOTS
    )?;

    let mut roots = vec![];
    let mut lines = input.lines();
    loop {
        write!(output, "Root {}> ", roots.len() + 1)?;
        output.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("done") {
            if roots.len() >= MIN_ROOTS {
                break;
            }
            writeln!(
                output,
                "At least {} roots are needed, {} entered so far.",
                MIN_ROOTS,
                roots.len()
            )?;
            continue;
        }
        match line.parse::<Complex>() {
            Ok(root) => roots.push(root),
            Err(e) => writeln!(output, "{}", e)?,
        }
    }

    if roots.len() < MIN_ROOTS {
        return Err(FractalError::NotEnoughRoots {
            needed: MIN_ROOTS,
            got: roots.len(),
        });
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im).unwrap()
    }

    fn read(text: &str) -> (Result<Vec<Complex>, FractalError>, String) {
        let mut out = vec![];
        let roots = read_roots(Cursor::new(text), &mut out);
        (roots, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_pair_splits_on_separator() {
        assert_eq!(parse_pair::<usize>("800x600", 'x'), Some((800, 600)));
        assert_eq!(parse_pair::<f64>("-2.5,1", ','), Some((-2.5, 1.0)));
        assert_eq!(parse_pair::<usize>("800", 'x'), None);
        assert_eq!(parse_pair::<usize>("800xabc", 'x'), None);
    }

    #[test]
    fn parse_complex_wants_finite_parts() {
        assert_eq!(parse_complex("-2,2"), Some(c(-2.0, 2.0)));
        assert_eq!(parse_complex("inf,2"), None);
        assert_eq!(parse_complex("1;2"), None);
    }

    #[test]
    fn reads_until_done() {
        let (roots, out) = read("1\n-1 + i0\ni\n0 - i1\ndone\nignored\n");
        assert_eq!(
            roots.unwrap(),
            vec![c(1.0, 0.0), c(-1.0, 0.0), c(0.0, 1.0), c(0.0, -1.0)]
        );
        assert!(out.contains("Root 1> "));
        assert!(out.contains("Root 5> "));
        assert!(!out.contains("Root 6> "));
    }

    #[test]
    fn skips_bad_lines_and_early_done() {
        let (roots, out) = read("1\ndone\nnonsense\n\n-1\ndone\n");
        assert_eq!(roots.unwrap(), vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        assert!(out.contains("At least 2 roots are needed, 1 entered so far."));
        assert!(out.contains("could not parse 'nonsense'"));
    }

    #[test]
    fn end_of_input_is_enough_once_there_are_two() {
        let (roots, _) = read("2\n-2");
        assert_eq!(roots.unwrap().len(), 2);
    }

    #[test]
    fn too_few_roots_is_an_error() {
        let (roots, _) = read("1\n");
        assert_eq!(
            roots.unwrap_err(),
            FractalError::NotEnoughRoots { needed: 2, got: 1 }
        );
    }
}
