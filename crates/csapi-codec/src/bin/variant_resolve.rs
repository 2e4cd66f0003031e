//! `variant-resolve` — resolve JSON (stdin) against a oneOf family and print
//! how it resolved, followed by the JSON it re-emits.
//!
//! Usage:
//!   variant-resolve <constraint|component|contact|io|time>

use csapi_codec::cli::{resolve_variant, FAMILIES};
use std::io::{self, Read};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let Some(family) = args.get(1) else {
        eprintln!("usage: variant-resolve <{}>", FAMILIES.join("|"));
        std::process::exit(2);
    };

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match resolve_variant(&buf, family) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
