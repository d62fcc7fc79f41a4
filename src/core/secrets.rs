//! Secret generation for a fresh PDS install.
//!
//! The JWT secret comes straight from the OS CSPRNG. The two secp256k1 keys
//! are generated by `openssl ecparam` as DER `ECPrivateKey` structures
//! (RFC 5915) and the raw scalar is pulled out with a DER parser, so the
//! result does not depend on byte offsets of a particular openssl build.

use crate::constants;
use crate::core::runner::{CommandRunner, Invocation};
use anyhow::{anyhow, bail, Context, Result};
use rand::{rngs::OsRng, RngCore};
use x509_parser::der_parser::parse_der;
use zeroize::Zeroizing;

/// Secrets written to a new `.env`. Dropped values are zeroed.
pub struct GeneratedSecrets {
    pub jwt_secret: Zeroizing<String>,
    pub admin_password: Zeroizing<String>,
    pub rotation_key: Zeroizing<String>,
}

impl GeneratedSecrets {
    pub fn generate(runner: &dyn CommandRunner) -> Result<Self> {
        let jwt_secret = jwt_secret();
        let admin_password = k256_private_key_hex(runner).context("generate admin password")?;
        let rotation_key = k256_private_key_hex(runner).context("generate PLC rotation key")?;
        if *admin_password == *rotation_key {
            bail!("openssl returned the same secp256k1 key twice; refusing to reuse key material");
        }
        Ok(Self {
            jwt_secret,
            admin_password,
            rotation_key,
        })
    }
}

impl std::fmt::Debug for GeneratedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GeneratedSecrets { .. }")
    }
}

/// 16 random bytes as 32 lowercase hex characters.
pub fn jwt_secret() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; constants::JWT_SECRET_BYTES]);
    OsRng.fill_bytes(&mut bytes[..]);
    Zeroizing::new(hex::encode(&bytes[..]))
}

/// Generate one secp256k1 key with openssl and return its scalar as 64 hex chars.
pub fn k256_private_key_hex(runner: &dyn CommandRunner) -> Result<Zeroizing<String>> {
    let cmd = Invocation::new("openssl").args([
        "ecparam",
        "-name",
        constants::K256_CURVE_NAME,
        "-genkey",
        "-noout",
        "-outform",
        "DER",
    ]);
    let captured = runner.run(&cmd)?;
    let der = Zeroizing::new(captured.stdout);
    let scalar = extract_private_scalar(&der)?;
    Ok(Zeroizing::new(hex::encode(scalar.as_slice())))
}

/// Pull the `privateKey` OCTET STRING out of a DER `ECPrivateKey`:
///
/// ```text
/// ECPrivateKey ::= SEQUENCE {
///   version        INTEGER { ecPrivkeyVer1(1) },
///   privateKey     OCTET STRING,
///   parameters [0] ECParameters OPTIONAL,
///   publicKey  [1] BIT STRING OPTIONAL }
/// ```
pub fn extract_private_scalar(der: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let (rest, key) = parse_der(der).map_err(|e| anyhow!("decode EC private key: {}", e))?;
    if !rest.is_empty() {
        bail!("{} trailing bytes after EC private key", rest.len());
    }
    let fields = key
        .as_sequence()
        .map_err(|e| anyhow!("EC private key is not a SEQUENCE: {}", e))?;

    let version = fields
        .first()
        .ok_or_else(|| anyhow!("EC private key has no version"))?
        .as_u32()
        .map_err(|e| anyhow!("EC private key version: {}", e))?;
    if version != 1 {
        bail!("unsupported EC private key version {}", version);
    }

    let scalar = fields
        .get(1)
        .ok_or_else(|| anyhow!("EC private key has no privateKey field"))?
        .as_slice()
        .map_err(|e| anyhow!("EC privateKey is not an OCTET STRING: {}", e))?;
    if scalar.len() != constants::K256_SCALAR_BYTES {
        bail!(
            "EC private key scalar is {} bytes, expected {}",
            scalar.len(),
            constants::K256_SCALAR_BYTES
        );
    }
    Ok(Zeroizing::new(scalar.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(value: &str, len: usize) -> bool {
        value.len() == len && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
    use crate::core::fake::{k256_der, FakeRunner};
    use std::cell::Cell;

    #[test]
    fn test_jwt_secret_format() {
        let secret = jwt_secret();
        assert!(is_lower_hex(&secret, 32), "got {}", secret.as_str());
        assert_ne!(*secret, *jwt_secret());
    }

    #[test]
    fn test_extract_scalar_from_openssl_layout() {
        let der = k256_der(0xAB);
        let scalar = extract_private_scalar(&der).unwrap();
        assert_eq!(scalar.as_slice(), &[0xAB; 32]);
    }

    #[test]
    fn test_extract_scalar_without_optional_fields() {
        let mut der = vec![0x30, 0x25, 0x02, 0x01, 0x01, 0x04, 0x20];
        der.extend_from_slice(&[0x07; 32]);
        let scalar = extract_private_scalar(&der).unwrap();
        assert_eq!(scalar.as_slice(), &[0x07; 32]);
    }

    #[test]
    fn test_extract_rejects_wrong_version() {
        let mut der = k256_der(0x01);
        der[4] = 0x02;
        let err = extract_private_scalar(&der).unwrap_err();
        assert!(err.to_string().contains("version"), "{}", err);
    }

    #[test]
    fn test_extract_rejects_short_scalar() {
        let mut der = vec![0x30, 0x15, 0x02, 0x01, 0x01, 0x04, 0x10];
        der.extend_from_slice(&[0x07; 16]);
        let err = extract_private_scalar(&der).unwrap_err();
        assert!(err.to_string().contains("16 bytes"), "{}", err);
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract_private_scalar(b"not der at all").is_err());
        assert!(extract_private_scalar(&[]).is_err());
    }

    #[test]
    fn test_k256_key_hex() {
        let runner = FakeRunner::new(|_| FakeRunner::ok_bytes(k256_der(0x5c)));
        let key = k256_private_key_hex(&runner).unwrap();
        assert!(is_lower_hex(&key, 64));
        assert_eq!(key.as_str(), "5c".repeat(32));
        assert_eq!(
            runner.calls(),
            vec!["openssl ecparam -name secp256k1 -genkey -noout -outform DER"]
        );
    }

    #[test]
    fn test_generate_uses_independent_invocations() {
        let n = Cell::new(0u8);
        let runner = FakeRunner::new(move |_| {
            n.set(n.get() + 1);
            FakeRunner::ok_bytes(k256_der(n.get()))
        });
        let secrets = GeneratedSecrets::generate(&runner).unwrap();
        assert_eq!(runner.calls().len(), 2);
        assert!(is_lower_hex(&secrets.jwt_secret, 32));
        assert!(is_lower_hex(&secrets.admin_password, 64));
        assert!(is_lower_hex(&secrets.rotation_key, 64));
        assert_ne!(*secrets.admin_password, *secrets.rotation_key);
    }

    #[test]
    fn test_generate_rejects_duplicate_keys() {
        let runner = FakeRunner::new(|_| FakeRunner::ok_bytes(k256_der(0x42)));
        let err = GeneratedSecrets::generate(&runner).unwrap_err();
        assert!(err.to_string().contains("same secp256k1 key"));
    }

    #[test]
    fn test_generate_openssl_failure_is_fatal() {
        let runner = FakeRunner::new(|_| FakeRunner::failed(2));
        let err = GeneratedSecrets::generate(&runner).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), 2);
    }

    #[test]
    fn test_debug_hides_values() {
        let secrets = GeneratedSecrets {
            jwt_secret: Zeroizing::new("aa".into()),
            admin_password: Zeroizing::new("bb".into()),
            rotation_key: Zeroizing::new("cc".into()),
        };
        assert_eq!(format!("{:?}", secrets), "GeneratedSecrets { .. }");
    }
}
