//! Groth16 plumbing.
//!
//! Keys, proofs and public inputs cross this boundary as opaque blobs:
//! compressed ark-serialize bytes, carried as hex where they travel inside
//! transactions. The chain side consumes verification through the
//! [`SnarkVerifier`] trait so its tests can substitute a stub.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, SynthesisError};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::public_inputs::{PublicInputError, decode_raw};

#[derive(Debug, Error)]
pub enum SnarkError {
    #[error("hex decode failed: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("key or proof deserialization failed: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),
    #[error("groth16 backend: {0}")]
    Backend(String),
    #[error(transparent)]
    PublicInput(#[from] PublicInputError),
}

impl From<SynthesisError> for SnarkError {
    fn from(e: SynthesisError) -> Self {
        SnarkError::Backend(e.to_string())
    }
}

/// Serialized key pair for one circuit.
pub struct KeyPairBytes {
    pub proving_key: Vec<u8>,
    pub verifying_key: Vec<u8>,
}

/// Circuit-specific trusted setup.
pub fn setup<C, R>(circuit: C, rng: &mut R) -> Result<KeyPairBytes, SnarkError>
where
    C: ConstraintSynthesizer<Fr>,
    R: RngCore + CryptoRng,
{
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)?;
    let mut proving_key = Vec::new();
    pk.serialize_compressed(&mut proving_key)?;
    let mut verifying_key = Vec::new();
    vk.serialize_compressed(&mut verifying_key)?;
    Ok(KeyPairBytes {
        proving_key,
        verifying_key,
    })
}

/// Prove a fully assigned circuit; returns the proof as hex.
pub fn prove<C, R>(proving_key: &[u8], circuit: C, rng: &mut R) -> Result<String, SnarkError>
where
    C: ConstraintSynthesizer<Fr>,
    R: RngCore + CryptoRng,
{
    let pk = ProvingKey::<Bn254>::deserialize_compressed(proving_key)?;
    let proof = Groth16::<Bn254>::prove(&pk, circuit, rng)?;
    let mut bytes = Vec::new();
    proof.serialize_compressed(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Verify an opaque proof blob against an opaque public-input blob.
pub fn verify(
    verifying_key: &[u8],
    proof_hex: &str,
    public_input_hex: &str,
) -> Result<bool, SnarkError> {
    let vk = VerifyingKey::<Bn254>::deserialize_compressed(verifying_key)?;
    let proof_bytes = hex::decode(proof_hex)?;
    let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes.as_slice())?;
    let inputs = decode_raw(public_input_hex)?;
    Ok(Groth16::<Bn254>::verify(&vk, &inputs, &proof)?)
}

/// Verification seam the chain-side state machine consumes.
pub trait SnarkVerifier: Send + Sync {
    fn verify(
        &self,
        verifying_key: &[u8],
        proof_hex: &str,
        public_input_hex: &str,
    ) -> Result<bool, SnarkError>;
}

/// The real backend.
pub struct Groth16Verifier;

impl SnarkVerifier for Groth16Verifier {
    fn verify(
        &self,
        verifying_key: &[u8],
        proof_hex: &str,
        public_input_hex: &str,
    ) -> Result<bool, SnarkError> {
        verify(verifying_key, proof_hex, public_input_hex)
    }
}
