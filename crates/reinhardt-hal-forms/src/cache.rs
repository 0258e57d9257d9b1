//! Template cache
//!
//! Schema-only templates are memoized per [`TemplateKey`]. The cache is the
//! only state shared between construction calls; a miss computes the
//! template once even when several requests ask for the same key at the same
//! time, and failed or cancelled computations are never stored.

use crate::error::{HalFormsError, HalFormsResult};
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use moka::future::Cache;
use parking_lot::Mutex;
use reinhardt_hal_core::Template;
use std::any::TypeId;
use std::sync::Arc;
use std::time::Duration;

/// Cache key: source type plus the template-level request parameters
///
/// `generation` identifies the factory configuration (classifier, hooks,
/// foreign-key provider) that built the entry, so factories sharing a cache
/// never see each other's templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
	pub generation: u64,
	pub type_id: TypeId,
	pub type_name: &'static str,
	pub method: Option<Method>,
	pub title: Option<String>,
	pub content_type: Option<String>,
}

/// Get-or-create store for generated templates
#[async_trait]
pub trait TemplateCache: Send + Sync {
	/// Returns the cached template for `key`, running `init` on a miss.
	async fn get_or_create(
		&self,
		key: TemplateKey,
		init: BoxFuture<'_, HalFormsResult<Template>>,
	) -> HalFormsResult<Arc<Template>>;

	/// Drops every cached template.
	fn invalidate_all(&self);
}

/// Bounded cache backed by `moka`
///
/// Concurrent misses for one key are coalesced by `try_get_with`; misses for
/// different keys do not block each other.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_forms::MokaTemplateCache;
/// use std::time::Duration;
///
/// let cache = MokaTemplateCache::new(100, Some(Duration::from_secs(300)));
/// assert_eq!(cache.max_capacity(), 100);
/// ```
#[derive(Clone)]
pub struct MokaTemplateCache {
	cache: Cache<TemplateKey, Arc<Template>>,
	max_capacity: u64,
}

impl MokaTemplateCache {
	pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
		let mut builder = Cache::builder().max_capacity(max_capacity);
		if let Some(ttl) = ttl {
			builder = builder.time_to_live(ttl);
		}
		Self {
			cache: builder.build(),
			max_capacity,
		}
	}

	pub fn max_capacity(&self) -> u64 {
		self.max_capacity
	}

	/// Approximate number of cached templates.
	pub async fn entry_count(&self) -> u64 {
		self.cache.run_pending_tasks().await;
		self.cache.entry_count()
	}

	pub async fn contains(&self, key: &TemplateKey) -> bool {
		self.cache.get(key).await.is_some()
	}
}

impl Default for MokaTemplateCache {
	fn default() -> Self {
		Self::new(1000, None)
	}
}

#[async_trait]
impl TemplateCache for MokaTemplateCache {
	async fn get_or_create(
		&self,
		key: TemplateKey,
		init: BoxFuture<'_, HalFormsResult<Template>>,
	) -> HalFormsResult<Arc<Template>> {
		let type_name = key.type_name;
		// The request whose `init` ran gets its own error back; moka only
		// sees a detached copy for the requests coalesced onto it.
		let own_error: Mutex<Option<HalFormsError>> = Mutex::new(None);
		let result = self
			.cache
			.try_get_with(key, async {
				tracing::debug!(type_name, "Template cache miss");
				init.await.map(Arc::new).map_err(|error| {
					let detached = error.detached();
					*own_error.lock() = Some(error);
					detached
				})
			})
			.await;
		result.map_err(|shared| match own_error.lock().take() {
			Some(error) => error,
			None => HalFormsError::from_shared(shared),
		})
	}

	fn invalidate_all(&self) {
		self.cache.invalidate_all();
	}
}

/// Cache that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplateCache;

#[async_trait]
impl TemplateCache for NoTemplateCache {
	async fn get_or_create(
		&self,
		_key: TemplateKey,
		init: BoxFuture<'_, HalFormsResult<Template>>,
	) -> HalFormsResult<Arc<Template>> {
		init.await.map(Arc::new)
	}

	fn invalidate_all(&self) {}
}
