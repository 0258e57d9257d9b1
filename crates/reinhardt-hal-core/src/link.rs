//! HAL link objects

use serde::{Deserialize, Serialize};

/// A HAL link object
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::Link;
///
/// let link = Link::new("/orders{?page}").with_title("Orders");
/// assert!(link.templated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
	pub href: String,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub templated: bool,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub content_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deprecation: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hreflang: Option<String>,
}

impl Link {
	/// Creates a link. It is marked templated when `href` contains a URI
	/// template expression.
	pub fn new(href: impl Into<String>) -> Self {
		let href = href.into();
		let templated = href.contains('{');
		Self {
			href,
			templated,
			content_type: None,
			title: None,
			name: None,
			deprecation: None,
			hreflang: None,
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn templated(mut self, templated: bool) -> Self {
		self.templated = templated;
		self
	}
}

/// Value of a `_links` entry: one link or an array of links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkObject {
	Single(Link),
	Many(Vec<Link>),
}

impl LinkObject {
	/// Appends `link`, turning a single link into an array.
	pub fn push(&mut self, link: Link) {
		match self {
			Self::Many(links) => links.push(link),
			Self::Single(existing) => {
				let first = existing.clone();
				*self = Self::Many(vec![first, link]);
			}
		}
	}

	pub fn first(&self) -> Option<&Link> {
		match self {
			Self::Single(link) => Some(link),
			Self::Many(links) => links.first(),
		}
	}
}

impl From<Link> for LinkObject {
	fn from(link: Link) -> Self {
		Self::Single(link)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_plain_link_omits_optional_members() {
		let link = Link::new("/orders/1");
		assert_eq!(serde_json::to_value(&link).unwrap(), json!({"href": "/orders/1"}));
	}

	#[rstest]
	fn test_push_turns_single_into_array() {
		let mut object = LinkObject::from(Link::new("/a"));
		object.push(Link::new("/b"));

		assert_eq!(
			serde_json::to_value(&object).unwrap(),
			json!([{"href": "/a"}, {"href": "/b"}])
		);
		assert_eq!(object.first().map(|l| l.href.as_str()), Some("/a"));
	}
}
