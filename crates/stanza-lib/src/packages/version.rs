use serde::*;

/// A dotted numeric version such as `3.7.1`.
///
/// Missing trailing components compare as zero, so `1.0` and `1.0.0` are equal.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Version {
	parts: Vec<u64>,
}

impl Version {
	pub fn new(version: &str) -> crate::Result<Self> {
		let version = version.trim();
		if version.is_empty() {
			return Err(crate::Error::Parse("empty version string".to_string()));
		}
		let mut parts = Vec::new();
		for component in version.split('.') {
			parts.push(
				component.parse::<u64>().map_err(|_| {
					crate::Error::Parse(format!("invalid version component `{}` in `{}`", component, version))
				})?
			);
		}
		Ok(Version { parts })
	}

	pub fn parts(&self) -> &[u64] {
		&self.parts
	}

	/// The version with the component at `index` bumped and everything after it dropped.
	///
	/// Turns caret and tilde requirements into an exclusive upper bound.
	pub(crate) fn bumped(&self, index: usize) -> Version {
		let mut parts: Vec<u64> = self.parts.iter().copied().take(index + 1).collect();
		while parts.len() <= index {
			parts.push(0);
		}
		parts[index] += 1;
		Version { parts }
	}
}

impl TryFrom<&str> for Version {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		let len = self.parts.len().max(other.parts.len());
		for i in 0..len {
			let lhs = self.parts.get(i).copied().unwrap_or(0);
			let rhs = other.parts.get(i).copied().unwrap_or(0);
			match lhs.cmp(&rhs) {
				std::cmp::Ordering::Equal => {},
				ord => return ord,
			}
		}
		std::cmp::Ordering::Equal
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		/* Trailing zeroes are stripped so equal versions hash alike */
		let mut end = self.parts.len();
		while end > 0 && self.parts[end - 1] == 0 {
			end -= 1;
		}
		self.parts[..end].hash(state);
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let rendered: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
		write!(f, "{}", rendered.join("."))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn version_is_not_compared_lexically() { assert!(Version::new("1.2.4").unwrap() < Version::new("1.2.10").unwrap()) }
	#[test] fn version_trailing_zero_is_eq() { assert!(Version::new("1.0").unwrap() == Version::new("1.0.0").unwrap()) }
	#[test] fn version_shorter_is_lt() { assert!(Version::new("1.2").unwrap() < Version::new("1.2.3").unwrap()) }
	#[test] fn version_identical_are_eq() { assert!(Version::new("1.2.3").unwrap() == Version::new("1.2.3").unwrap()) }
	#[test] fn version_higher_is_gt() { assert!(Version::new("1.2.4").unwrap() > Version::new("1.2.3").unwrap()) }
	#[test] fn version_empty_is_rejected() { assert!(Version::new("").is_err()) }
	#[test] fn version_non_numeric_is_rejected() { assert!(Version::new("1.0b1").is_err()) }
	#[test] fn version_bumped_drops_tail() { assert!(Version::new("3.6.5").unwrap().bumped(1) == Version::new("3.7").unwrap()) }
}
