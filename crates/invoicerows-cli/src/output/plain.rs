use std::io::{self, BufWriter, Write};

/// Write rows one per line, newline-terminated, with no other formatting.
pub fn write_rows<W: Write>(out: &mut W, rows: &[&str]) -> io::Result<()> {
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

pub fn print_rows(rows: &[&str]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_rows(&mut out, rows)?;
    out.flush()
}
