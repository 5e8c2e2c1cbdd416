use alloc::string::String;
use core::fmt::{self, Write};

use crate::plant::PlantData;

/// Write one `key: value` line per reading, then a blank line.
///
/// Values use two decimals and a leading space in place of a `+` sign, so
/// positive and negative values line up.
pub fn write_report<W: Write>(data: &PlantData, out: &mut W) -> fmt::Result {
    for (_, reading) in data.iter() {
        for (key, value) in reading.iter() {
            let sign_pad = if value.is_sign_negative() { "" } else { " " };
            writeln!(out, "{key}: {sign_pad}{value:.2}")?;
        }
    }
    writeln!(out)
}

pub fn format_report(data: &PlantData) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(data, &mut out);
    out
}
