use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use stellar_strkey::{ed25519, Contract, Strkey};
use stellar_xdr::curr::{AccountId, Hash, MuxedAccount, PublicKey, ScAddress, Uint256};
use thiserror::Error;

/// Length of an encoded account or contract strkey
pub const STRKEY_LEN: usize = 56;

/// An account (`G...`) or contract (`C...`) address in strkey form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    /// An ed25519 account public key
    Account([u8; 32]),
    /// A deployed contract id
    Contract([u8; 32]),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid strkey `{0}`")]
    Invalid(String),
    /// A valid strkey that is neither an account nor a contract, e.g. a secret seed
    #[error("strkey `{0}` is not an account or contract address")]
    UnsupportedKind(String),
    /// Contracts cannot be the source or destination of a classic transaction
    #[error("{0} is a contract, an account is required")]
    NotAnAccount(Address),
}

impl Address {
    pub const fn account(key: [u8; 32]) -> Self {
        Address::Account(key)
    }

    pub const fn contract(id: [u8; 32]) -> Self {
        Address::Contract(id)
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, Address::Contract(_))
    }

    /// The raw 32 byte payload (public key or contract id)
    pub fn payload(&self) -> &[u8; 32] {
        match self {
            Address::Account(bytes) | Address::Contract(bytes) => bytes,
        }
    }

    /// Encodes the address as a 56 character strkey.
    pub fn to_strkey(&self) -> String {
        match self {
            Address::Account(key) => ed25519::PublicKey(*key).to_string(),
            Address::Contract(id) => Contract(*id).to_string(),
        }
    }

    /// The address as a contract argument
    pub fn to_sc_address(&self) -> ScAddress {
        match self {
            Address::Account(key) => ScAddress::Account(AccountId(
                PublicKey::PublicKeyTypeEd25519(Uint256(*key)),
            )),
            Address::Contract(id) => ScAddress::Contract(Hash(*id)),
        }
    }

    /// The address as a transaction source or payment destination
    pub fn to_muxed_account(&self) -> Result<MuxedAccount, AddressError> {
        match self {
            Address::Account(key) => Ok(MuxedAccount::Ed25519(Uint256(*key))),
            Address::Contract(_) => Err(AddressError::NotAnAccount(*self)),
        }
    }
}

impl From<&ScAddress> for Address {
    fn from(address: &ScAddress) -> Self {
        match address {
            ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(key)))) => {
                Address::Account(*key)
            }
            ScAddress::Contract(Hash(id)) => Address::Contract(*id),
        }
    }
}

/// Multiplexed accounts resolve to their underlying account
impl From<&MuxedAccount> for Address {
    fn from(account: &MuxedAccount) -> Self {
        match account {
            MuxedAccount::Ed25519(Uint256(key)) => Address::Account(*key),
            MuxedAccount::MuxedEd25519(muxed) => Address::Account(muxed.ed25519.0),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Strkey::from_string(s) {
            Ok(Strkey::PublicKeyEd25519(ed25519::PublicKey(key))) => Ok(Address::Account(key)),
            Ok(Strkey::Contract(Contract(id))) => Ok(Address::Contract(id)),
            Ok(_) => Err(AddressError::UnsupportedKind(s.to_owned())),
            Err(_) => Err(AddressError::Invalid(s.to_owned())),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_strkey())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // the all-zero key of the ed25519 strkey test vectors
    const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

    #[test]
    fn matches_known_strkey() {
        assert_eq!(Address::account([0u8; 32]).to_strkey(), ZERO_ACCOUNT);
        assert_eq!(ZERO_ACCOUNT.parse::<Address>().unwrap(), Address::account([0u8; 32]));
    }

    #[test]
    fn encodes_with_expected_prefix() {
        let account = Address::account([7u8; 32]).to_strkey();
        let contract = Address::contract([7u8; 32]).to_strkey();
        assert_eq!(account.len(), STRKEY_LEN);
        assert!(account.starts_with('G'));
        assert!(contract.starts_with('C'));
    }

    #[test]
    fn strkey_roundtrip() {
        let mut key = [0u8; 32];
        key.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8 * 7);
        for addr in [Address::account(key), Address::contract(key)] {
            let parsed: Address = addr.to_strkey().parse().unwrap();
            assert_eq!(parsed, addr);
            assert_eq!(Address::from(&addr.to_sc_address()), addr);
        }
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut encoded = Address::account([9u8; 32]).to_strkey().into_bytes();
        encoded[10] = if encoded[10] == b'A' { b'B' } else { b'A' };
        let encoded = String::from_utf8(encoded).unwrap();
        assert!(matches!(encoded.parse::<Address>(), Err(AddressError::Invalid(_))));
    }

    #[test]
    fn rejects_other_strkey_kinds() {
        assert!(matches!("GABC".parse::<Address>(), Err(AddressError::Invalid(_))));
        let seed = stellar_strkey::ed25519::PrivateKey([3u8; 32]).to_string();
        assert!(matches!(seed.parse::<Address>(), Err(AddressError::UnsupportedKind(_))));
    }

    #[test]
    fn contracts_are_not_accounts() {
        let contract = Address::contract([5u8; 32]);
        assert_eq!(contract.to_muxed_account(), Err(AddressError::NotAnAccount(contract)));
        let account = Address::account([5u8; 32]);
        assert_eq!(Address::from(&account.to_muxed_account().unwrap()), account);
    }

    #[test]
    fn serde_uses_strkey() {
        let addr = Address::contract([5u8; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
