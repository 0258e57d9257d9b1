//! Link creation
//!
//! Resource templates are bound to an endpoint through a [`LinkFactory`]. The
//! default [`ReversingLinkFactory`] resolves named routes with a
//! [`UrlReverser`] and passes raw hrefs through untouched.

use crate::error::{HalFormsError, HalFormsResult};
use async_trait::async_trait;
use http::Method;
use parking_lot::RwLock;
use reinhardt_hal_core::Link;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Where a form submits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
	/// A named route plus the values for its path parameters.
	Route {
		name: String,
		params: HashMap<String, String>,
		method: Option<Method>,
	},
	/// A literal href.
	Href { href: String, method: Option<Method> },
}

impl Endpoint {
	pub fn route(name: impl Into<String>) -> Self {
		Self::Route {
			name: name.into(),
			params: HashMap::new(),
			method: None,
		}
	}

	pub fn href(href: impl Into<String>) -> Self {
		Self::Href {
			href: href.into(),
			method: None,
		}
	}

	/// Adds a path parameter. Ignored for literal hrefs.
	pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		if let Self::Route { params, .. } = &mut self {
			params.insert(key.into(), value.to_string());
		}
		self
	}

	pub fn with_method(mut self, method: Method) -> Self {
		match &mut self {
			Self::Route { method: m, .. } | Self::Href { method: m, .. } => *m = Some(method),
		}
		self
	}

	pub fn method(&self) -> Option<&Method> {
		match self {
			Self::Route { method, .. } | Self::Href { method, .. } => method.as_ref(),
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Route { name, .. } => write!(f, "route `{}`", name),
			Self::Href { href, .. } => write!(f, "href `{}`", href),
		}
	}
}

/// Resolves a route name to a path.
pub trait UrlReverser: Send + Sync {
	/// Reverse a URL name to a path with parameters
	///
	/// Returns the resolved path or an error message.
	fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, String>;
}

/// Name → path pattern table
///
/// Patterns use `{param}` placeholders. Parameters the caller does not supply
/// stay in the resolved path, which makes the resulting link a URI template.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_forms::link::{RouteTable, UrlReverser};
/// use std::collections::HashMap;
///
/// let routes = RouteTable::new().with_route("user-detail", "/users/{id}/");
///
/// let mut params = HashMap::new();
/// params.insert("id".to_string(), "42".to_string());
/// assert_eq!(routes.reverse("user-detail", &params).unwrap(), "/users/42/");
/// assert_eq!(routes.reverse("user-detail", &HashMap::new()).unwrap(), "/users/{id}/");
/// ```
#[derive(Debug, Default)]
pub struct RouteTable {
	routes: RwLock<HashMap<String, String>>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, name: impl Into<String>, pattern: impl Into<String>) {
		self.routes.write().insert(name.into(), pattern.into());
	}

	pub fn with_route(self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.register(name, pattern);
		self
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.routes.read().contains_key(name)
	}
}

impl UrlReverser for RouteTable {
	fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, String> {
		let pattern = self
			.routes
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| format!("no route named `{}`", name))?;

		for (key, value) in params {
			if !is_safe_segment(value) {
				return Err(format!("invalid param '{}': contains reserved characters", key));
			}
		}
		Ok(substitute(&pattern, params))
	}
}

/// Path parameter values must stay within one segment.
fn is_safe_segment(value: &str) -> bool {
	!value.contains(['/', '?', '#', '{', '}']) && !value.contains("..")
}

fn substitute(pattern: &str, params: &HashMap<String, String>) -> String {
	let mut result = String::with_capacity(pattern.len());
	let mut rest = pattern;
	while let Some(start) = rest.find('{') {
		let Some(len) = rest[start..].find('}') else {
			break;
		};
		let name = &rest[start + 1..start + len];
		result.push_str(&rest[..start]);
		match params.get(name) {
			Some(value) => result.push_str(value),
			None => result.push_str(&rest[start..=start + len]),
		}
		rest = &rest[start + len + 1..];
	}
	result.push_str(rest);
	result
}

/// Turns an [`Endpoint`] into a hypermedia link
#[async_trait]
pub trait LinkFactory: Send + Sync {
	async fn create_link(
		&self,
		endpoint: &Endpoint,
		name: Option<&str>,
		title: Option<&str>,
	) -> HalFormsResult<Link>;
}

/// Link factory over a [`UrlReverser`]
#[derive(Clone)]
pub struct ReversingLinkFactory {
	reverser: Arc<dyn UrlReverser>,
}

impl ReversingLinkFactory {
	pub fn new(reverser: Arc<dyn UrlReverser>) -> Self {
		Self { reverser }
	}
}

impl Default for ReversingLinkFactory {
	fn default() -> Self {
		Self::new(Arc::new(RouteTable::new()))
	}
}

impl fmt::Debug for ReversingLinkFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReversingLinkFactory").finish_non_exhaustive()
	}
}

#[async_trait]
impl LinkFactory for ReversingLinkFactory {
	async fn create_link(
		&self,
		endpoint: &Endpoint,
		name: Option<&str>,
		title: Option<&str>,
	) -> HalFormsResult<Link> {
		let href = match endpoint {
			Endpoint::Href { href, .. } => href.clone(),
			Endpoint::Route {
				name: route,
				params,
				..
			} => self
				.reverser
				.reverse(route, params)
				.map_err(|message| HalFormsError::LinkCreation {
					endpoint: endpoint.to_string(),
					message,
				})?,
		};
		tracing::trace!(%endpoint, href = %href, "Resolved endpoint link");

		let mut link = Link::new(href);
		if let Some(name) = name {
			link = link.with_name(name);
		}
		if let Some(title) = title {
			link = link.with_title(title);
		}
		Ok(link)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn factory() -> ReversingLinkFactory {
		let routes = RouteTable::new()
			.with_route("orders", "/orders/")
			.with_route("order-detail", "/orders/{id}/items/{item}");
		ReversingLinkFactory::new(Arc::new(routes))
	}

	#[rstest]
	#[case(&[("id", "7"), ("item", "3")], "/orders/7/items/3")]
	#[case(&[("id", "7")], "/orders/7/items/{item}")]
	#[case(&[], "/orders/{id}/items/{item}")]
	fn test_substitute_keeps_missing_placeholders(
		#[case] params: &[(&str, &str)],
		#[case] expected: &str,
	) {
		let params = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		assert_eq!(substitute("/orders/{id}/items/{item}", &params), expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_route_endpoint_resolves(factory: ReversingLinkFactory) {
		let endpoint = Endpoint::route("order-detail").param("id", 7).param("item", 3);
		let link = factory
			.create_link(&endpoint, Some("edit"), Some("Edit order"))
			.await
			.unwrap();

		assert_eq!(link.href, "/orders/7/items/3");
		assert!(!link.templated);
		assert_eq!(link.name.as_deref(), Some("edit"));
		assert_eq!(link.title.as_deref(), Some("Edit order"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_unbound_params_make_templated_link(factory: ReversingLinkFactory) {
		let link = factory
			.create_link(&Endpoint::route("order-detail"), None, None)
			.await
			.unwrap();
		assert!(link.templated);
	}

	#[rstest]
	#[tokio::test]
	async fn test_href_passes_through(factory: ReversingLinkFactory) {
		let link = factory
			.create_link(&Endpoint::href("https://api.example.com/x"), None, None)
			.await
			.unwrap();
		assert_eq!(link.href, "https://api.example.com/x");
	}

	#[rstest]
	#[case(Endpoint::route("missing"))]
	#[case(Endpoint::route("order-detail").param("id", "../admin"))]
	#[tokio::test]
	async fn test_unresolvable_route_is_an_error(
		factory: ReversingLinkFactory,
		#[case] endpoint: Endpoint,
	) {
		let error = factory.create_link(&endpoint, None, None).await.unwrap_err();
		assert!(matches!(error, HalFormsError::LinkCreation { .. }));
	}

	#[rstest]
	fn test_method_is_shared_by_both_forms() {
		assert_eq!(
			Endpoint::href("/x").with_method(Method::PUT).method(),
			Some(&Method::PUT)
		);
		assert_eq!(
			Endpoint::route("x").with_method(Method::DELETE).method(),
			Some(&Method::DELETE)
		);
	}
}
