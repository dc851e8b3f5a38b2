//! Groth16 circuits for the shielded pool.
//!
//! Five circuits share one gadget set: the MiMC sponge, a padded
//! fixed-depth Merkle path check, and the Baby Jubjub value-commitment
//! check. Proofs, keys and public inputs cross the crate boundary as
//! opaque hex blobs so the chain side never links against circuit types.

pub mod circuit;
pub mod gadgets;
pub mod public_inputs;
pub mod snark;
pub mod witness;

pub use circuit::CircuitKind;
pub use snark::{Groth16Verifier, SnarkError, SnarkVerifier};
