use std::fmt;
use std::str::FromStr;

use crate::LocaleError;

/// Language plus optional region, e.g. `en` or `en_US`.
///
/// The language is stored lowercase and the region uppercase, so `EN_us`
/// and `en_US` are the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
	language: String,
	region: Option<String>,
}

impl Locale {
	pub fn new(language: &str) -> Self {
		Self {
			language: language.to_ascii_lowercase(),
			region: None,
		}
	}

	pub fn with_region(language: &str, region: &str) -> Self {
		Self {
			language: language.to_ascii_lowercase(),
			region: Some(region.to_ascii_uppercase()),
		}
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn region(&self) -> Option<&str> {
		self.region.as_deref()
	}

	/// Name of the lang file holding this locale (`en_US.json`).
	pub fn file_name(&self) -> String {
		format!("{self}.json")
	}

	/// Derives a locale from a lang file stem (`en`, `en_US`).
	///
	/// Segments after the region are ignored.
	pub fn from_file_stem(stem: &str) -> Result<Self, LocaleError> {
		let mut parts = stem.split('_');
		let language = parts.next().filter(|l| !l.is_empty()).ok_or_else(|| LocaleError::InvalidFileName(stem.to_string()))?;
		Ok(match parts.next().filter(|r| !r.is_empty()) {
			Some(region) => Self::with_region(language, region),
			None => Self::new(language),
		})
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.region {
			Some(region) => write!(f, "{}_{}", self.language, region),
			None => f.write_str(&self.language),
		}
	}
}

impl FromStr for Locale {
	type Err = LocaleError;

	/// Accepts both `en_US` and the BCP 47 style `en-US`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_file_stem(&s.replace('-', "_"))
	}
}
