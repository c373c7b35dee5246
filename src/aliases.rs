//! # Secure-Gate Type Aliases
//!
//! Type aliases for secure key material handling using
//! [`secure-gate`](https://github.com/Slurp9187/secure-gate).
//! All types here zeroize on drop and require explicit `.expose_secret()` /
//! `.expose_secret_mut()` access, so key bytes never leak through `Debug`,
//! logs or accidental copies.
//!
//! Only the bundled AES/CBC transforms consume these; the adapters themselves
//! never see key material.

use secure_gate::fixed_alias;

// Fixed-size concrete secrets — alphabetical order
fixed_alias!(pub Aes256Key32, 32); // AES-256 key
fixed_alias!(pub Iv16, 16); // CBC initialization vector (one AES block)
