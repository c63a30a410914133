use std::{env, fs, process};

use usfm_merge::{MergeOptions, merge};

/// Merges three versions of a USFM chapter: the common ancestor and two
/// divergent edits of it.
///
/// Run it with:
/// `cargo run --example merge-chapter base.usfm user.usfm server.usfm [output.usfm]`
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 || args.len() > 5 {
        eprintln!("Usage: merge-chapter <base> <user> <server> [output]");
        process::exit(1);
    }

    let read = |path: &str| {
        fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        })
    };

    let base = read(&args[1]);
    let user = read(&args[2]);
    let server = read(&args[3]);

    let merged = merge(&base, &user, &server, &MergeOptions::default());

    for conflict in &merged.conflicts {
        eprintln!("conflict resolved in the server's favor:");
        eprintln!("  base:   {}", conflict.base);
        eprintln!("  user:   {}", conflict.user);
        eprintln!("  server: {}", conflict.server);
    }

    if let Some(output_path) = args.get(4) {
        if let Err(e) = fs::write(output_path, &merged.text) {
            eprintln!("Error writing to {output_path}: {e}");
            process::exit(1);
        }
    } else {
        print!("{}", merged.text);
    }
}
