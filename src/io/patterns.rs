//! IO for test pattern files, in the Atalanta format

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, Result};

/// Read combinatorial patterns in Atalanta format
///
/// Each pattern is a line `index: bits`, optionally followed by the expected output bits,
/// which are ignored. Lines starting with `*` or `#` are comments.
pub fn read_patterns<R: Read>(r: R) -> Result<Vec<Vec<bool>>> {
    let mut ret = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let line = i + 1;
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('*') || t.starts_with('#') {
            continue;
        }
        let bits = t
            .split_once(':')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .ok_or_else(|| Error::Parse {
                line,
                message: format!("Malformed pattern {t}"),
            })?;
        let pattern = bits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::Parse {
                    line,
                    message: format!("Invalid pattern value {c}"),
                }),
            })
            .collect::<Result<Vec<bool>>>()?;
        ret.push(pattern);
    }
    Ok(ret)
}

/// Write combinatorial patterns in Atalanta format
pub fn write_patterns<W: Write>(w: &mut W, patterns: &[Vec<bool>]) -> Result<()> {
    writeln!(w, "* Test pattern file")?;
    writeln!(w, "* generated by dalgo")?;
    for (i, p) in patterns.iter().enumerate() {
        let bits: String = p.iter().map(|b| if *b { '1' } else { '0' }).collect();
        writeln!(w, "{}: {}", i + 1, bits)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_patterns, write_patterns};
    use crate::error::Error;

    #[test]
    fn test_write() {
        let mut buf = Vec::new();
        write_patterns(&mut buf, &[vec![false, true, true, false], vec![true]]).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("\n1: 0110\n"));
        assert!(s.ends_with("2: 1\n"));
        assert_eq!(read_patterns(s.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_read() {
        let example = "* Atalanta output
   1: 01101 10
   2: 11111 01
";
        let p = read_patterns(example.as_bytes()).unwrap();
        assert_eq!(p[0], vec![false, true, true, false, true]);
        assert_eq!(p[1], vec![true; 5]);

        let e = read_patterns("1: 01x\n".as_bytes()).unwrap_err();
        assert!(matches!(e, Error::Parse { line: 1, .. }));
        assert!(read_patterns("0110\n".as_bytes()).is_err());
    }
}
