//! Generates Groth16 key pairs for all five pool circuits and writes them
//! as hex files into an output directory (default `keys/`).
//!
//! The TransferInput circuit bakes the configured `H` generator into its
//! parameters; pass its affine coordinates as two hex field elements to use
//! a generator other than the built-in default.

use std::{env, fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, bail};
use log::info;

use mixpool_privacy::commitment::{default_h_point, point_from_coords};
use mixpool_privacy::hash::Hash;
use mixpool_prover::circuit::{
    AuthorizeCircuit, DepositCircuit, TransferInputCircuit, TransferOutputCircuit, WithdrawCircuit,
};
use mixpool_prover::snark::{self, KeyPairBytes};

fn write_pair(dir: &Path, name: &str, keys: KeyPairBytes) -> Result<()> {
    fs::write(dir.join(format!("{name}.pk.hex")), hex::encode(&keys.proving_key))
        .with_context(|| format!("write {name} proving key"))?;
    fs::write(dir.join(format!("{name}.vk.hex")), hex::encode(&keys.verifying_key))
        .with_context(|| format!("write {name} verify key"))?;
    info!("wrote {name} key pair");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let out_dir = PathBuf::from(args.first().map_or("keys", String::as_str));
    let h = match args.get(1..3) {
        Some([hx, hy]) => {
            let x = Hash::from_hex(hx).context("parse h x coordinate")?;
            let y = Hash::from_hex(hy).context("parse h y coordinate")?;
            match point_from_coords(&x.to_field(), &y.to_field()) {
                Ok(p) => p,
                Err(e) => bail!("configured h point rejected: {e}"),
            }
        }
        _ => default_h_point(),
    };

    fs::create_dir_all(&out_dir).context("create output dir")?;
    let mut rng = rand::thread_rng();

    write_pair(&out_dir, "deposit", snark::setup(DepositCircuit::blank(), &mut rng)?)?;
    write_pair(&out_dir, "withdraw", snark::setup(WithdrawCircuit::blank(), &mut rng)?)?;
    write_pair(
        &out_dir,
        "transfer-input",
        snark::setup(TransferInputCircuit::blank(h), &mut rng)?,
    )?;
    write_pair(
        &out_dir,
        "transfer-output",
        snark::setup(TransferOutputCircuit::blank(), &mut rng)?,
    )?;
    write_pair(&out_dir, "authorize", snark::setup(AuthorizeCircuit::blank(), &mut rng)?)?;

    info!("all key pairs written to {}", out_dir.display());
    Ok(())
}
