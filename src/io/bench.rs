//! IO for .bench (ISCAS) files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::FxHashSet;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::network::{Circuit, CircuitDescription, GateKind, NodeKind};

/// Name of the primary output node created for an `OUTPUT(x)` statement
pub fn output_name(driver: &str) -> String {
    format!("OUTPUT({driver})")
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Parse a `KEYWORD(name)` declaration
fn parse_declaration(t: &str, line: usize) -> Result<(String, String)> {
    let parts: Vec<_> = t
        .split(&['(', ')'][..])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 2 || !t.trim_end().ends_with(')') {
        return Err(parse_error(line, format!("Malformed declaration {t}")));
    }
    Ok((parts[0].to_uppercase(), parts[1].to_string()))
}

/// Parse a `name = KIND(a, b, ...)` statement
fn parse_statement(t: &str, line: usize) -> Result<(String, String, Vec<String>)> {
    let (lhs, rhs) = t
        .split_once('=')
        .ok_or_else(|| parse_error(line, format!("Malformed statement {t}")))?;
    let name = lhs.trim();
    let (kind, args) = rhs
        .trim()
        .strip_suffix(')')
        .and_then(|r| r.split_once('('))
        .ok_or_else(|| parse_error(line, format!("Malformed gate {}", rhs.trim())))?;
    if name.is_empty() || kind.trim().is_empty() {
        return Err(parse_error(line, format!("Malformed statement {t}")));
    }
    let deps = args
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok((name.to_string(), kind.trim().to_string(), deps))
}

/// Read a circuit description in .bench format, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = BUFF(x4)
///     x6 = NOT(x5)
///     OUTPUT(x6)
/// ```
///
/// Each `OUTPUT(x)` becomes a primary output node named `OUTPUT(x)`, driven by `x`.
/// Nodes are defined in file order for inputs and gates, followed by the outputs.
pub fn read_bench<R: Read>(r: R) -> Result<CircuitDescription> {
    let mut desc = CircuitDescription::new();
    let mut outputs = Vec::new();
    let mut seen_outputs = FxHashSet::default();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let line = i + 1;
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        if !t.contains('=') {
            let (keyword, name) = parse_declaration(t, line)?;
            match keyword.as_str() {
                "INPUT" | "PINPUT" => {
                    desc.node(&name, NodeKind::PrimaryInput);
                }
                "OUTPUT" | "POUTPUT" => {
                    if seen_outputs.insert(name.clone()) {
                        outputs.push(name);
                    }
                }
                _ => return Err(parse_error(line, format!("Unknown keyword {keyword}"))),
            }
        } else {
            let (name, kind, deps) = parse_statement(t, line)?;
            let kind: GateKind = kind.parse()?;
            desc.node(&name, NodeKind::Gate(kind));
            for d in deps {
                desc.edge(&d, &name);
            }
        }
    }
    for o in outputs {
        let name = output_name(&o);
        desc.node(&name, NodeKind::PrimaryOutput).edge(&o, &name);
    }
    Ok(desc)
}

/// Write a circuit in .bench format
///
/// Primary outputs are written as `OUTPUT(x)` statements on their driver.
pub fn write_bench<W: Write>(w: &mut W, circuit: &Circuit) -> Result<()> {
    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by dalgo")?;
    for &i in circuit.inputs() {
        writeln!(w, "INPUT({})", circuit.name(i))?;
    }
    writeln!(w)?;
    for &o in circuit.outputs() {
        writeln!(w, "OUTPUT({})", circuit.name(circuit.fanin(o)[0]))?;
    }
    writeln!(w)?;
    for &n in circuit.topo_order() {
        if let NodeKind::Gate(k) = circuit.kind(n) {
            let deps = circuit.fanin(n).iter().map(|d| circuit.name(*d)).join(", ");
            writeln!(w, "{} = {}({})", circuit.name(n), k, deps)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::BufWriter;

    use super::{read_bench, write_bench};
    use crate::error::{Error, Malformation};
    use crate::network::{GateKind, NodeKind};

    const C17: &str = "# c17
INPUT(1)
INPUT(2)
INPUT(3)
INPUT(6)
INPUT(7)

OUTPUT(22)
OUTPUT(23)

10 = NAND(1, 3)
11 = NAND(3, 6)
16 = NAND(2, 11)
19 = NAND(11, 7)
22 = NAND(10, 16)
23 = NAND(16, 19)
";

    #[test]
    fn test_basic_readwrite() {
        let example = "# .bench file
INPUT(i0)
INPUT(i1)
OUTPUT(x3)
OUTPUT(x6)
x0 = AND(i0, i1)
x1 = nand(x0, i1)
x2 = OR(x0, i0, i1)
x3 = NOR(i0, x1)
x4 = XOR(x3, x2)
x5 = BUFF(x4)
x6 =   NOT( x5 )
x7 = XNOR(x6, x0)
";
        let c = read_bench(example.as_bytes()).unwrap().build().unwrap();
        assert_eq!(c.nb_inputs(), 2);
        assert_eq!(c.nb_outputs(), 2);
        assert_eq!(c.nb_nodes(), 12);
        let x1 = c.find("x1").unwrap();
        assert_eq!(c.kind(x1), NodeKind::Gate(GateKind::Nand));
        assert_eq!(c.fanin(x1), &[c.find("x0").unwrap(), c.find("i1").unwrap()]);
        assert_eq!(c.fanin(c.find("x2").unwrap()).len(), 3);
        let o = c.find("OUTPUT(x6)").unwrap();
        assert_eq!(c.kind(o), NodeKind::PrimaryOutput);
        assert_eq!(c.outputs()[1], o);

        let mut buf = BufWriter::new(Vec::new());
        write_bench(&mut buf, &c).unwrap();
        let s = String::from_utf8(buf.into_inner().unwrap()).unwrap();
        let c2 = read_bench(s.as_bytes()).unwrap().build().unwrap();
        assert_eq!(c2.nb_nodes(), c.nb_nodes());
        assert_eq!(c2.nb_outputs(), 2);
    }

    #[test]
    fn test_c17() {
        let c = read_bench(C17.as_bytes()).unwrap().build().unwrap();
        assert_eq!(c.nb_inputs(), 5);
        assert_eq!(c.nb_outputs(), 2);
        assert_eq!(c.nb_nodes(), 13);
        assert!(c.find("OUTPUT(23)").is_some());
    }

    #[test]
    fn test_errors() {
        let e = read_bench("INPUT(a)\nb = AND(a\n".as_bytes()).unwrap_err();
        assert!(matches!(e, Error::Parse { line: 2, .. }));

        let e = read_bench("INPUT(a)\nWIRE(b)\n".as_bytes()).unwrap_err();
        assert!(matches!(e, Error::Parse { line: 2, .. }));

        let e = read_bench("INPUT(a)\nb = DFF(a)\n".as_bytes()).unwrap_err();
        assert!(matches!(
            e,
            Error::MalformedCircuit(Malformation::UnknownGateKind(_))
        ));

        let desc = read_bench("INPUT(a)\nOUTPUT(b)\nb = AND(a, c)\n".as_bytes()).unwrap();
        assert!(matches!(
            desc.build(),
            Err(Error::MalformedCircuit(Malformation::DanglingEdge { .. }))
        ));
    }
}
