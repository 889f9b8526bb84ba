//! Token descriptors as reported by the data provider

use serde::Serialize;

pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u32,
}

impl TokenInfo {
    /// True when `needle` equals the symbol (case-insensitive) or the address.
    pub fn matches(&self, needle: &str, resolved_address: Option<&str>) -> bool {
        let needle = needle.trim();
        if needle.is_empty() {
            return false;
        }
        self.symbol.eq_ignore_ascii_case(needle)
            || self.address.eq_ignore_ascii_case(needle)
            || resolved_address.is_some_and(|addr| self.address.eq_ignore_ascii_case(addr))
    }
}
