//! Generates the scancode→qnum lookup table from a plain data file instead
//! of hand-writing a 512-arm `match`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const DATA_FILE: &str = "keyboard-data/scancode_to_qnum.txt";
const TABLE_SIZE: usize = 512;

fn main() {
    println!("cargo:rerun-if-changed={}", DATA_FILE);

    let data = fs::read_to_string(DATA_FILE)
        .unwrap_or_else(|e| panic!("reading {}: {}", DATA_FILE, e));

    let values: Vec<u32> = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            u32::from_str_radix(line, 16)
                .unwrap_or_else(|e| panic!("bad hex entry {:?} in {}: {}", line, DATA_FILE, e))
        })
        .collect();

    assert_eq!(
        values.len(),
        TABLE_SIZE,
        "{} must contain exactly {} entries, found {}",
        DATA_FILE,
        TABLE_SIZE,
        values.len()
    );

    let mut out = String::new();
    writeln!(out, "pub static SCANCODE_TO_QNUM: [u32; {}] = [", TABLE_SIZE).unwrap();
    for chunk in values.chunks(8) {
        let row: Vec<String> = chunk.iter().map(|v| format!("0x{:04x}", v)).collect();
        writeln!(out, "    {},", row.join(", ")).unwrap();
    }
    writeln!(out, "];").unwrap();

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("scancode_to_qnum.rs");
    fs::write(&dest, out).unwrap_or_else(|e| panic!("writing {:?}: {}", dest, e));
}
