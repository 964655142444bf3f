//! Frame identifiers across ID3v2 versions
//!
//! ID3v2.2 uses 3 character frame IDs, while ID3v2.3 and ID3v2.4 use 4 characters. The two
//! later versions also disagree on a handful of frames: some ID3v2.3 frames were replaced in
//! ID3v2.4 (`TYER` became `TDRC`), and some ID3v2.4 frames have no ID3v2.3 equivalent at all.
//!
//! Every frame is stored in an [`Id3v2Tag`](crate::id3::v2::Id3v2Tag) under its *canonical*
//! ID, which is the newest ID that exists for its role. The table in this module is used to find
//! the ID for a role in any given version.

use crate::id3::v2::Id3v2Version;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A frame role and its identifier in every version
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameRole {
	/// The ID3v2.2 identifier
	pub v2: Option<&'static str>,
	/// The ID3v2.3 identifier
	pub v3: Option<&'static str>,
	/// The ID3v2.4 identifier
	pub v4: Option<&'static str>,
}

impl FrameRole {
	/// The identifier frames of this role are stored under
	pub fn canonical(&self) -> &'static str {
		// Every row of the table has at least one identifier
		self.v4.or(self.v3).or(self.v2).unwrap_or_default()
	}

	/// The identifier for `version`, if the role exists there
	pub fn for_version(&self, version: Id3v2Version) -> Option<&'static str> {
		match version {
			Id3v2Version::V2 => self.v2,
			Id3v2Version::V3 => self.v3,
			Id3v2Version::V4 => self.v4,
		}
	}
}

macro_rules! frame_roles {
	(@ID _) => { None };
	(@ID $id:literal) => { Some($id) };
	($($v2:tt $v3:tt $v4:tt),+ $(,)?) => {
		static FRAME_ROLES: &[FrameRole] = &[
			$(
				FrameRole {
					v2: frame_roles!(@ID $v2),
					v3: frame_roles!(@ID $v3),
					v4: frame_roles!(@ID $v4),
				},
			)+
		];
	};
}

frame_roles! {
	// Standard frames
	"BUF" "RBUF" "RBUF",
	"CNT" "PCNT" "PCNT",
	"COM" "COMM" "COMM",
	"CRA" "AENC" "AENC",
	"CRM" _      _,
	"ETC" "ETCO" "ETCO",
	"GEO" "GEOB" "GEOB",
	"IPL" "IPLS" "TIPL",
	"LNK" "LINK" "LINK",
	"MCI" "MCDI" "MCDI",
	"MLL" "MLLT" "MLLT",
	"PIC" "APIC" "APIC",
	"POP" "POPM" "POPM",
	"REV" "RVRB" "RVRB",
	"SLT" "SYLT" "SYLT",
	"STC" "SYTC" "SYTC",
	"TAL" "TALB" "TALB",
	"TBP" "TBPM" "TBPM",
	"TCM" "TCOM" "TCOM",
	"TCO" "TCON" "TCON",
	"TCR" "TCOP" "TCOP",
	"TDY" "TDLY" "TDLY",
	"TEN" "TENC" "TENC",
	"TFT" "TFLT" "TFLT",
	"TKE" "TKEY" "TKEY",
	"TLA" "TLAN" "TLAN",
	"TLE" "TLEN" "TLEN",
	"TMT" "TMED" "TMED",
	"TOA" "TOPE" "TOPE",
	"TOF" "TOFN" "TOFN",
	"TOL" "TOLY" "TOLY",
	"TOR" "TORY" "TDOR",
	"TOT" "TOAL" "TOAL",
	"TP1" "TPE1" "TPE1",
	"TP2" "TPE2" "TPE2",
	"TP3" "TPE3" "TPE3",
	"TP4" "TPE4" "TPE4",
	"TPA" "TPOS" "TPOS",
	"TPB" "TPUB" "TPUB",
	"TRC" "TSRC" "TSRC",
	"TRK" "TRCK" "TRCK",
	"TSS" "TSSE" "TSSE",
	"TT1" "TIT1" "TIT1",
	"TT2" "TIT2" "TIT2",
	"TT3" "TIT3" "TIT3",
	"TXT" "TEXT" "TEXT",
	"TXX" "TXXX" "TXXX",
	"TYE" "TYER" "TDRC",
	"UFI" "UFID" "UFID",
	"ULT" "USLT" "USLT",
	"WAF" "WOAF" "WOAF",
	"WAR" "WOAR" "WOAR",
	"WAS" "WOAS" "WOAS",
	"WCM" "WCOM" "WCOM",
	"WCP" "WCOP" "WCOP",
	"WPB" "WPUB" "WPUB",
	"WXX" "WXXX" "WXXX",
	_     "COMR" "COMR",
	_     "ENCR" "ENCR",
	_     "GRID" "GRID",
	_     "OWNE" "OWNE",
	_     "POSS" "POSS",
	_     "PRIV" "PRIV",
	_     "TOWN" "TOWN",
	_     "TRSN" "TRSN",
	_     "TRSO" "TRSO",
	_     "USER" "USER",
	_     "WORS" "WORS",
	_     "WPAY" "WPAY",

	// Removed in ID3v2.4
	"EQU" "EQUA" _,
	"RVA" "RVAD" _,
	"TDA" "TDAT" _,
	"TIM" "TIME" _,
	"TRD" "TRDA" _,
	"TSI" "TSIZ" _,

	// Added in ID3v2.4
	_     _      "ASPI",
	_     _      "EQU2",
	_     _      "RVA2",
	_     _      "SEEK",
	_     _      "SIGN",
	_     _      "TDEN",
	_     _      "TDRL",
	_     _      "TDTG",
	_     _      "TMCL",
	_     _      "TMOO",
	_     _      "TPRO",
	_     _      "TSST",

	// iTunes non-standard frames
	"TCP" "TCMP" "TCMP",
	"TS2" "TSO2" "TSO2",
	"TSC" "TSOC" "TSOC",
	"TSA" _      "TSOA",
	"TSP" _      "TSOP",
	"TST" _      "TSOT",
	"PCS" "PCST" "PCST",
	"TCT" "TCAT" "TCAT",
	"TDS" "TDES" "TDES",
	"TID" "TGID" "TGID",
	"WFD" "WFED" "WFED",
	"MVI" "MVIN" "MVIN",
	"MVN" "MVNM" "MVNM",
	"GP1" "GRP1" "GRP1",
}

struct Registry {
	canonical: HashMap<&'static str, usize>,
	v2: HashMap<&'static str, usize>,
	v3: HashMap<&'static str, usize>,
}

fn registry() -> &'static Registry {
	static INSTANCE: OnceLock<Registry> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut registry = Registry {
			canonical: HashMap::with_capacity(FRAME_ROLES.len()),
			v2: HashMap::with_capacity(FRAME_ROLES.len()),
			v3: HashMap::with_capacity(FRAME_ROLES.len()),
		};

		for (index, role) in FRAME_ROLES.iter().enumerate() {
			registry.canonical.insert(role.canonical(), index);
			if let Some(v2) = role.v2 {
				registry.v2.insert(v2, index);
			}
			if let Some(v3) = role.v3 {
				registry.v3.insert(v3, index);
			}
		}

		registry
	})
}

/// Find the role of any identifier, canonical or version specific
///
/// # Examples
///
/// ```rust
/// use retag::id3::v2::util::registry::role_of;
///
/// let year = role_of("TYER").unwrap();
/// assert_eq!(year.canonical(), "TDRC");
/// assert_eq!(year.v2, Some("TYE"));
///
/// assert!(role_of("ZZZZ").is_none());
/// ```
pub fn role_of(id: &str) -> Option<&'static FrameRole> {
	let registry = registry();
	registry
		.canonical
		.get(id)
		.or_else(|| registry.v3.get(id))
		.or_else(|| registry.v2.get(id))
		.map(|index| &FRAME_ROLES[*index])
}

/// Whether two identifiers name the same frame role
///
/// # Examples
///
/// ```rust
/// use retag::id3::v2::util::registry::same_role;
///
/// assert!(same_role("TYER", "TDRC"));
/// assert!(same_role("XABC", "XABC"));
/// assert!(!same_role("TIT2", "TPE1"));
/// ```
pub fn same_role(a: &str, b: &str) -> bool {
	if a == b {
		return true;
	}

	match (role_of(a), role_of(b)) {
		(Some(a), Some(b)) => std::ptr::eq(a, b),
		_ => false,
	}
}

/// Upgrade an ID3v2.2 identifier to its canonical identifier
///
/// # Examples
///
/// ```rust
/// use retag::id3::v2::util::registry::upgrade_v2;
///
/// assert_eq!(upgrade_v2("TT2"), Some("TIT2"));
/// assert_eq!(upgrade_v2("TYE"), Some("TDRC"));
/// assert_eq!(upgrade_v2("XYZ"), None);
/// ```
pub fn upgrade_v2(id: &str) -> Option<&'static str> {
	let registry = registry();
	registry
		.v2
		.get(id)
		.map(|index| FRAME_ROLES[*index].canonical())
}

/// Upgrade an ID3v2.3 identifier to its canonical identifier
///
/// Identifiers that are already canonical, and unknown identifiers, return `None`.
///
/// # Examples
///
/// ```rust
/// use retag::id3::v2::util::registry::upgrade_v3;
///
/// assert_eq!(upgrade_v3("IPLS"), Some("TIPL"));
/// assert_eq!(upgrade_v3("TIT2"), None);
/// ```
pub fn upgrade_v3(id: &str) -> Option<&'static str> {
	let registry = registry();
	registry
		.v3
		.get(id)
		.map(|index| FRAME_ROLES[*index].canonical())
		.filter(|canonical| *canonical != id)
}

/// Resolve the on-disk identifier of a frame for `version`
///
/// `id` may be a canonical or version specific identifier. Identifiers missing from the
/// registry are passed through as long as they have the length `version` expects, so
/// unknown frames survive a save in the version they were read from.
///
/// Returns `None` when the frame cannot be represented in `version` and must be dropped.
///
/// # Examples
///
/// ```rust
/// use retag::id3::v2::Id3v2Version;
/// use retag::id3::v2::util::registry::resolve_identifier;
///
/// assert_eq!(resolve_identifier("TIT2", Id3v2Version::V2).as_deref(), Some("TT2"));
/// assert_eq!(resolve_identifier("TDRC", Id3v2Version::V3).as_deref(), Some("TYER"));
///
/// // Only exists in ID3v2.4
/// assert_eq!(resolve_identifier("TSOP", Id3v2Version::V3), None);
///
/// // Unknown, but valid for ID3v2.3/4
/// assert_eq!(resolve_identifier("XABC", Id3v2Version::V4).as_deref(), Some("XABC"));
/// assert_eq!(resolve_identifier("XABC", Id3v2Version::V2), None);
/// ```
pub fn resolve_identifier(id: &str, version: Id3v2Version) -> Option<Cow<'static, str>> {
	if let Some(role) = role_of(id) {
		return role.for_version(version).map(Cow::Borrowed);
	}

	let expected_len = match version {
		Id3v2Version::V2 => 3,
		Id3v2Version::V3 | Id3v2Version::V4 => 4,
	};

	(id.len() == expected_len).then(|| Cow::Owned(id.to_owned()))
}
