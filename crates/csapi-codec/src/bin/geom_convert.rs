//! `geom-convert` — read a geometry (stdin) in any supported encoding and
//! write it (stdout) in the requested form.
//!
//! Usage:
//!   geom-convert [--to geojson|wkt|wkb|ewkb|hex] [--hint column|document]
//!
//! `wkb` and `ewkb` write raw bytes; every other form writes one line of text.

use csapi_codec::cli::{convert_geometry, parse_hint, CliError, Target};
use csapi_geometry::Form;
use std::io::{self, Read, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut to = "geojson".to_string();
    let mut hint = "unknown".to_string();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--to" => {
                i += 1;
                if let Some(t) = args.get(i) {
                    to = t.clone();
                }
            }
            "--hint" => {
                i += 1;
                if let Some(h) = args.get(i) {
                    hint = h.clone();
                }
            }
            _ => {}
        }
        i += 1;
    }

    if let Err(e) = run(&to, &hint) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(to: &str, hint: &str) -> Result<(), CliError> {
    let target = Target::parse(to)?;
    let hint = parse_hint(hint)?;

    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    let mut out = convert_geometry(&buf, target, hint)?;
    if !matches!(target, Target::Form(Form::Wkb | Form::Ewkb)) {
        out.push(b'\n');
    }
    io::stdout().write_all(&out)?;
    Ok(())
}
