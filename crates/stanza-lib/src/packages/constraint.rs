//! Requirement expressions evaluated at filter time.

use serde::{Serialize, Deserialize};

use super::version::Version;

/// A single comparator such as `>=3.6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Term {
	Exact(Version),
	Not(Version),
	Greater(Version),
	GreaterEq(Version),
	Less(Version),
	LessEq(Version),
}

impl Term {
	fn matches(&self, version: &Version) -> bool {
		match self {
			Term::Exact(v) => version == v,
			Term::Not(v) => version != v,
			Term::Greater(v) => version > v,
			Term::GreaterEq(v) => version >= v,
			Term::Less(v) => version < v,
			Term::LessEq(v) => version <= v,
		}
	}
}

impl std::fmt::Display for Term {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Term::Exact(v) => write!(f, "=={}", v),
			Term::Not(v) => write!(f, "!={}", v),
			Term::Greater(v) => write!(f, ">{}", v),
			Term::GreaterEq(v) => write!(f, ">={}", v),
			Term::Less(v) => write!(f, "<{}", v),
			Term::LessEq(v) => write!(f, "<={}", v),
		}
	}
}

/// A version requirement expression.
///
/// `||` separates alternatives, commas AND terms within an alternative.
/// Caret and tilde requirements expand to a half open range on parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConstraint {
	/* An empty list matches every version */
	alternatives: Vec<Vec<Term>>,
}

impl Default for VersionConstraint {
	fn default() -> Self { Self::any() }
}

impl VersionConstraint {
	pub fn any() -> Self {
		VersionConstraint { alternatives: Vec::new() }
	}

	pub fn exact(version: &Version) -> Self {
		VersionConstraint { alternatives: vec![vec![Term::Exact(version.clone())]] }
	}

	pub fn is_any(&self) -> bool {
		self.alternatives.is_empty()
	}

	pub fn parse(expression: &str) -> crate::Result<Self> {
		let expression = expression.trim();
		if expression.is_empty() || expression == "*" {
			return Ok(Self::any());
		}
		let mut alternatives = Vec::new();
		for group in expression.split("||") {
			let mut terms = Vec::new();
			for term in group.split(',') {
				let term: String = term.chars().filter(|c| !c.is_whitespace()).collect();
				if term.is_empty() {
					continue;
				}
				terms.extend(parse_term(&term)?);
			}
			if terms.is_empty() {
				return Err(crate::Error::Parse(format!("empty constraint group in `{}`", expression)));
			}
			alternatives.push(terms);
		}
		Ok(VersionConstraint { alternatives })
	}

	pub fn matches(&self, version: &Version) -> bool {
		if self.alternatives.is_empty() {
			return true;
		}
		self.alternatives.iter().any(|terms| terms.iter().all(|t| t.matches(version)))
	}
}

fn parse_term(term: &str) -> crate::Result<Vec<Term>> {
	if let Some(rest) = term.strip_prefix(">=") {
		Ok(vec![Term::GreaterEq(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix("<=") {
		Ok(vec![Term::LessEq(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix("!=") {
		Ok(vec![Term::Not(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix("==") {
		Ok(vec![Term::Exact(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix('>') {
		Ok(vec![Term::Greater(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix('<') {
		Ok(vec![Term::Less(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix('=') {
		Ok(vec![Term::Exact(Version::new(rest)?)])
	} else if let Some(rest) = term.strip_prefix('^') {
		let version = Version::new(rest)?;
		let upper = version.bumped(0);
		Ok(vec![Term::GreaterEq(version), Term::Less(upper)])
	} else if let Some(rest) = term.strip_prefix('~') {
		let version = Version::new(rest)?;
		let index = std::cmp::min(version.parts().len() - 1, 1);
		let upper = version.bumped(index);
		Ok(vec![Term::GreaterEq(version), Term::Less(upper)])
	} else {
		Ok(vec![Term::Exact(Version::new(term)?)])
	}
}

impl std::fmt::Display for VersionConstraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.alternatives.is_empty() {
			return write!(f, "*");
		}
		let groups: Vec<String> = self.alternatives.iter()
			.map(|terms| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(","))
			.collect();
		write!(f, "{}", groups.join(" || "))
	}
}

/// An operating system requirement matched by identifier equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConstraint {
	/* Both lists empty matches every platform */
	allowed: Vec<String>,
	excluded: Vec<String>,
}

impl PlatformConstraint {
	pub fn any() -> Self {
		Self::default()
	}

	pub fn is_any(&self) -> bool {
		self.allowed.is_empty() && self.excluded.is_empty()
	}

	pub fn parse(expression: &str) -> crate::Result<Self> {
		let expression = expression.trim();
		if expression.is_empty() || expression == "*" {
			return Ok(Self::any());
		}
		let mut constraint = PlatformConstraint::default();
		for term in expression.split("||") {
			let term = term.trim();
			if term.is_empty() {
				return Err(crate::Error::Parse(format!("empty platform term in `{}`", expression)));
			}
			if let Some(rest) = term.strip_prefix("!=") {
				constraint.excluded.push(rest.trim().to_string());
			} else if let Some(rest) = term.strip_prefix('=') {
				constraint.allowed.push(rest.trim().to_string());
			} else {
				constraint.allowed.push(term.to_string());
			}
		}
		Ok(constraint)
	}

	pub fn matches(&self, platform: &str) -> bool {
		if self.excluded.iter().any(|p| p == platform) {
			return false;
		}
		self.allowed.is_empty() || self.allowed.iter().any(|p| p == platform)
	}
}

impl std::fmt::Display for PlatformConstraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.is_any() {
			return write!(f, "*");
		}
		let mut terms: Vec<String> = self.allowed.clone();
		terms.extend(self.excluded.iter().map(|p| format!("!={}", p)));
		write!(f, "{}", terms.join(" || "))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test] fn constraint_star_matches_everything() { assert!(VersionConstraint::parse("*").unwrap().matches(&v("0.1"))) }
	#[test] fn constraint_bare_is_exact() { assert!(VersionConstraint::parse("1.2").unwrap().matches(&v("1.2.0"))) }
	#[test] fn constraint_exact_rejects_other() { assert!(!VersionConstraint::parse("==1.2").unwrap().matches(&v("1.3"))) }
	#[test] fn constraint_not_rejects_named() { assert!(!VersionConstraint::parse("!=1.2").unwrap().matches(&v("1.2"))) }
	#[test] fn constraint_range_is_anded() { assert!(!VersionConstraint::parse(">=3.6,<4.0").unwrap().matches(&v("4.0"))) }
	#[test] fn constraint_range_accepts_inside() { assert!(VersionConstraint::parse(">=3.6,<4.0").unwrap().matches(&v("3.7.1"))) }
	#[test] fn constraint_alternatives_are_ored() { assert!(VersionConstraint::parse(">=2.7,<2.8 || >=3.4").unwrap().matches(&v("3.6"))) }
	#[test] fn constraint_caret_bounds_major() { assert!(!VersionConstraint::parse("^3.6").unwrap().matches(&v("4.0"))) }
	#[test] fn constraint_caret_accepts_minor_bump() { assert!(VersionConstraint::parse("^3.6").unwrap().matches(&v("3.9.2"))) }
	#[test] fn constraint_tilde_bounds_minor() { assert!(!VersionConstraint::parse("~3.6.1").unwrap().matches(&v("3.7"))) }
	#[test] fn constraint_garbage_is_rejected() { assert!(VersionConstraint::parse(">=abc").is_err()) }
	#[test] fn constraint_display_roundtrips() { let c = VersionConstraint::parse(">=3.6,<4.0").unwrap(); assert!(VersionConstraint::parse(&c.to_string()).unwrap() == c) }

	#[test] fn platform_star_matches_everything() { assert!(PlatformConstraint::parse("*").unwrap().matches("linux")) }
	#[test] fn platform_bare_is_equality() { assert!(!PlatformConstraint::parse("darwin").unwrap().matches("linux")) }
	#[test] fn platform_not_excludes() { assert!(!PlatformConstraint::parse("!=win32").unwrap().matches("win32")) }
	#[test] fn platform_not_allows_other() { assert!(PlatformConstraint::parse("!=win32").unwrap().matches("linux")) }
	#[test] fn platform_alternatives_are_ored() { assert!(PlatformConstraint::parse("linux || darwin").unwrap().matches("darwin")) }
}
