/// Plain-text rendering of search results.
///
/// The count always comes first on its own line. Paths follow, one per line in
/// result order, only when the count is below the threshold, which keeps huge
/// result sets from flooding the terminal.
use std::io::{self, Write};

use crate::store::FileRecord;

pub fn write_report<W: Write>(
    out: &mut W,
    matches: &[FileRecord],
    print_threshold: usize,
) -> io::Result<()> {
    writeln!(out, "{}", matches.len())?;
    if matches.len() < print_threshold {
        for record in matches {
            writeln!(out, "{}", record.path())?;
        }
    }
    out.flush()
}
