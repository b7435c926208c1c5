// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Payload Encryption
//!
//! CRUD request and response bodies can be wrapped in an AES-256-CBC
//! envelope shared between the server and the client SDK.
//!
//! ## Wire Format
//!
//! ```text
//! base64( iv[16] || AES-256-CBC-PKCS7(key, iv, utf8(json)) )
//! ```
//!
//! The key is the configured passphrase taken verbatim as 32 raw bytes.
//! CBC provides confidentiality only: a tampered blob either fails padding
//! or decrypts to garbage, which the JSON layer then rejects.

pub mod envelope;

pub use envelope::{CipherError, PayloadCipher, IV_LEN, KEY_LEN};
