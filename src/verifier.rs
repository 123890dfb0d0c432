//! Minimal CLI verifier
//!
//! Examples:
//!   cargo run --features dev-srs --bin plookup-verify
//!   cargo run --bin plookup-verify -- --proof proof.bin --srs srs.bin
//!
//! Notes:
//! - `proof.bin` is produced by the prover (Arkworks canonical bytes).
//! - In non-dev builds you must pass the SRS the proof was made with.

#![forbid(unsafe_code)]

use std::{env, fs, path::Path};

use ark_serialize::CanonicalDeserialize;
use plookup::{pcs::Srs, scheduler::Verifier, Proof, VerifyParams};
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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let proof_path = parse_flag(&args, "--proof").unwrap_or_else(|| "proof.bin".to_string());

    let bytes = fs::read(Path::new(&proof_path))?;
    let mut slice = bytes.as_slice();
    let proof = Proof::deserialize_compressed(&mut slice).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    println!("Loaded proof from {} (domain size s={})", proof_path, proof.size);

    let srs = match parse_flag(&args, "--srs") {
        Some(p) => {
            let bytes = fs::read(Path::new(&p))?;
            let mut slice = bytes.as_slice();
            let srs = Srs::deserialize_compressed(&mut slice).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            println!("Loaded SRS ({} G1 powers) from {}", srs.g1_powers.len(), p);
            srs
        }
        #[cfg(feature = "dev-srs")]
        None => {
            println!("(note) No --srs provided; using dev SRS (dev build only).");
            // Only [1]G1 and the G2 part are read; τ does not depend on the degree.
            Srs::dev(0)
        }
        #[cfg(not(feature = "dev-srs"))]
        None => return Err(anyhow::anyhow!("Non-dev build: --srs is REQUIRED.")),
    };

    let verify_params = VerifyParams { vk: srs.verifier_key()? };
    let verifier = Verifier { params: &verify_params };

    match verifier.verify(&proof) {
        Ok(()) => {
            println!("Verifier result: true");
            Ok(())
        }
        Err(e) => {
            println!("Verifier result: false ({e})");
            std::process::exit(1)
        }
    }
}
