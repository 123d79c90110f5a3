use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};

use crate::address::Address;

/// Ed25519 signing keypair for a derived account.
#[derive(Clone)]
pub struct Keypair {
    pub signing_key: SigningKey,
}

impl Keypair {
    /// Build a keypair using 32 bytes of derived key material as the secret seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Keypair {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Sign a message with the private key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verify a signature against a message using this keypair's public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.signing_key
            .verifying_key()
            .verify(message, signature)
            .is_ok()
    }

    /// The public key, which doubles as the on-chain address
    pub fn public_key(&self) -> Address {
        Address::new(self.signing_key.verifying_key().to_bytes())
    }

    /// 64-byte secret key in the usual `secret || public` layout
    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc8032_public_key() {
        // RFC 8032 test 1
        let secret = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
            .unwrap();
        let kp = Keypair::from_seed(&secret.try_into().unwrap());
        assert_eq!(
            hex::encode(kp.public_key().as_bytes()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Keypair::from_seed(&[7u8; 32]);
        let sig = kp.sign(b"unlock");
        assert!(kp.verify(b"unlock", &sig));
        assert!(!kp.verify(b"withdraw", &sig));
        assert_eq!(&kp.to_keypair_bytes()[32..], kp.public_key().as_bytes());
    }
}
