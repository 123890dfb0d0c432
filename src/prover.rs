//! Minimal CLI prover
//!
//! Usage (defaults in parentheses):
//!   cargo run --bin plookup-prove -- \
//!     --table table.txt --vector vector.txt \
//!     [--srs srs.bin] [--out proof.bin] [--strict false]
//!
//! Flags:
//!   --table <PATH>   : table entries, integers separated by commas/whitespace
//!   --vector <PATH>  : vector entries, same format
//!   --srs <PATH>     : compressed `Srs` (required in non-dev builds)
//!   --out <PATH>     : where to write the proof (proof.bin)
//!   --strict <bool>  : fail before committing if the vector has a non-member (false)
//!
//! Notes:
//! - With `--features dev-srs` and no `--srs`, a deterministic SRS large
//!   enough for the inputs is synthesized. The verifier rebuilds the same one.
//! - Set `RUST_LOG=plookup=debug` for phase-level tracing.

#![forbid(unsafe_code)]

use std::{env, fs, path::Path, sync::Arc};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use plookup::{pcs::Srs, scheduler::Prover, table::small_domain_size, ProveParams, F};
use tracing_subscriber::EnvFilter;

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "True" | "TRUE" | "yes" | "y")
}

/// Splits on commas/whitespace; every token is one field element.
fn load_elements(path: &Path) -> anyhow::Result<Vec<F>> {
    let text = fs::read_to_string(path)?;
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        for tok in line.split(|c: char| c == ',' || c.is_whitespace()) {
            if tok.is_empty() {
                continue;
            }
            let v = tok.parse::<u64>().map_err(|e| {
                anyhow::anyhow!("{}: parse error at line {}: {} ({})", path.display(), lineno + 1, tok, e)
            })?;
            out.push(F::from(v));
        }
    }
    Ok(out)
}

fn load_srs(path: &Path) -> anyhow::Result<Srs> {
    let bytes = fs::read(path)?;
    let mut slice = bytes.as_slice();
    Srs::deserialize_compressed(&mut slice).map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let table_path = parse_flag(&args, "--table").ok_or_else(|| anyhow::anyhow!("--table is required"))?;
    let vector_path = parse_flag(&args, "--vector").ok_or_else(|| anyhow::anyhow!("--vector is required"))?;
    let out_path = parse_flag(&args, "--out").unwrap_or_else(|| "proof.bin".to_string());
    let strict = parse_flag(&args, "--strict").map(|s| parse_bool(&s)).unwrap_or(false);

    let t = load_elements(Path::new(&table_path))?;
    let f = load_elements(Path::new(&vector_path))?;
    println!("Loaded table ({} entries) and vector ({} entries)", t.len(), f.len());

    // ---------------- SRS loading (required in non-dev) ----------------
    let srs_path = parse_flag(&args, "--srs");

    #[cfg(feature = "dev-srs")]
    let srs = match srs_path {
        Some(p) => load_srs(Path::new(&p))?,
        None => {
            let s = small_domain_size(f.len(), t.len()).next_power_of_two();
            eprintln!("(dev-srs) Using deterministic in-crate SRS. For production, pass --srs.");
            Srs::dev(2 * s)
        }
    };

    #[cfg(not(feature = "dev-srs"))]
    let srs = match srs_path {
        Some(p) => load_srs(Path::new(&p))?,
        None => return Err(anyhow::anyhow!("Non-dev build: --srs is REQUIRED.")),
    };

    let needed = 2 * small_domain_size(f.len(), t.len()).next_power_of_two();
    if srs.max_degree() + 2 < needed {
        println!(
            "(note) SRS supports degree {}, inputs need up to {}; proving will likely fail.",
            srs.max_degree(),
            needed - 2
        );
    }

    let params = ProveParams { srs: Arc::new(srs), reject_non_members: strict };
    let prover = Prover { params: &params };
    let proof = prover.prove(&f, &t)?;

    println!("Prover completed: domain size s={}, strict={}", proof.size, strict);

    let mut bytes = Vec::new();
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    fs::write(&out_path, &bytes)?;
    println!("Wrote proof to {} ({} bytes)", out_path, bytes.len());

    Ok(())
}
