use regex::Regex;
use std::sync::OnceLock;

/// `0x` prefix plus 20 hex-encoded bytes.
pub const ADDRESS_LENGTH: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must be {ADDRESS_LENGTH} characters, got {0}")]
    InvalidLength(usize),

    #[error("address is not 0x-prefixed hex")]
    InvalidFormat,
}

/// Address checks for addresses typed by users or reported by a wallet.
///
/// By default only the length is enforced; no checksum validation is done.
/// `strict` additionally requires the `0x` prefix and a hex body.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressValidator {
    strict: bool,
}

fn hex_address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[a-f0-9]{40}$").expect("static regex"))
}

impl AddressValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Trim and lowercase an address without validating it.
    pub fn normalize(address: &str) -> String {
        address.trim().to_lowercase()
    }

    /// Validate and return the normalized address.
    pub fn validate(&self, address: &str) -> Result<String, AddressError> {
        let normalized = Self::normalize(address);
        if normalized.is_empty() {
            return Err(AddressError::Empty);
        }

        let length = normalized.chars().count();
        if length != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength(length));
        }

        if self.strict && !hex_address_regex().is_match(&normalized) {
            return Err(AddressError::InvalidFormat);
        }

        Ok(normalized)
    }
}
