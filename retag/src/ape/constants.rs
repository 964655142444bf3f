/// The identifier at the start of an APE header/footer
pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";

/// The size of an APE header/footer
pub(crate) const APE_HEADER_LEN: u32 = 32;

/// APEv1, footer only
pub(crate) const APE_VERSION_1: u32 = 1000;
/// APEv2, the only version written
pub(crate) const APE_VERSION_2: u32 = 2000;

// https://wiki.hydrogenaud.io/index.php?title=APE_key
pub(crate) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

