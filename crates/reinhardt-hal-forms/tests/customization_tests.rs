//! Hook chains, caching and cancellation

use http::Method;
use reinhardt_hal_forms::prelude::*;
use reinhardt_hal_forms::{
	BoxError, FormTemplateFactory, MokaTemplateCache, PropertyTemplateCustomization,
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(FormModel)]
struct Account {
	#[form(max_length = 40)]
	username: String,
	#[form(kind = "password", min_length = 8)]
	password: String,
	internal_notes: Option<String>,
}

fn account() -> Account {
	Account {
		username: "ada".to_string(),
		password: "correct horse".to_string(),
		internal_notes: Some("vip".to_string()),
	}
}

fn post() -> TemplateRequest {
	TemplateRequest::new(Method::POST).with_target("/accounts")
}

fn hide_internal() -> Customizations {
	Customizations::new().template_fn("hide-internal", |property, context| {
		if context.member.name.starts_with("internal_") {
			Ok(Customized::Skip)
		} else {
			Ok(Customized::Continue(property))
		}
	})
}

fn max_length(form: &Template, property: &str) -> Option<usize> {
	form.property(property)
		.and_then(|p| p.details.text_constraints())
		.and_then(|c| c.max_length)
}

// ============================================================================
// Property template chain
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_skip_removes_property() {
	let factory = FormFactory::default().with_customizations(hide_internal());

	let template = factory.create_template_for::<Account>(&post()).await.unwrap();

	assert_eq!(template.property_names(), vec!["username", "password"]);
}

#[rstest]
#[case(false, Some(20))]
#[case(true, Some(10))]
#[tokio::test]
async fn test_last_customization_wins_unless_stopped(
	#[case] stop: bool,
	#[case] expected: Option<usize>,
) {
	let customizations = Customizations::new()
		.template_fn("ten", move |mut property, _context| {
			if let Some(text) = property.details.text_constraints_mut() {
				text.max_length = Some(10);
			}
			Ok(if stop {
				Customized::Stop(property)
			} else {
				Customized::Continue(property)
			})
		})
		.template_fn("twenty", |mut property, _context| {
			if let Some(text) = property.details.text_constraints_mut() {
				text.max_length = Some(20);
			}
			Ok(Customized::Continue(property))
		});
	let factory = FormFactory::default().with_customizations(customizations);

	let template = factory.create_template_for::<Account>(&post()).await.unwrap();

	assert_eq!(max_length(&template, "username"), expected);
}

#[rstest]
#[tokio::test]
async fn test_customization_can_change_kind() {
	let factory = FormFactory::default().with_customizations(Customizations::new().template_fn(
		"notes-as-textarea",
		|mut property, context| {
			if context.member.name == "internal_notes" {
				property.set_kind(PropertyKind::Textarea);
			}
			Ok(Customized::Continue(property))
		},
	));

	let template = factory.create_template_for::<Account>(&post()).await.unwrap();

	assert_eq!(
		template.property("internalNotes").unwrap().kind(),
		PropertyKind::Textarea
	);
	assert_eq!(template.property("password").unwrap().kind(), PropertyKind::Password);
}

struct Failing;

#[async_trait::async_trait]
impl PropertyTemplateCustomization for Failing {
	fn name(&self) -> &str {
		"failing"
	}

	async fn customize(
		&self,
		_property: Property,
		_context: &MemberContext<'_>,
	) -> Result<Customized, BoxError> {
		Err("no schema for this member".into())
	}
}

#[rstest]
#[tokio::test]
async fn test_failing_hook_propagates_and_is_not_cached() {
	let cache = Arc::new(MokaTemplateCache::default());
	let factory = FormFactory::default()
		.with_cache(cache.clone())
		.with_customizations(Customizations::new().with_template(Failing));

	let error = factory
		.create_template_for::<Account>(&post())
		.await
		.unwrap_err();

	match error {
		HalFormsError::Customization {
			hook,
			type_name,
			property,
			..
		} => {
			assert_eq!(hook, "failing");
			assert_eq!(type_name, "Account");
			assert_eq!(property, "username");
		}
		other => panic!("unexpected error: {other}"),
	}
	assert_eq!(cache.entry_count().await, 0);
}

// ============================================================================
// Value chain
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_value_hooks_run_in_order() {
	let customizations = Customizations::new()
		.value_fn("redact-password", |property, value| {
			Ok(if property.kind() == PropertyKind::Password {
				None
			} else {
				value
			})
		})
		.value_fn("shout", |_property, value| {
			Ok(value.map(|v| match v.as_str() {
				Some(s) => json!(s.to_uppercase()),
				None => v,
			}))
		});
	let factory = FormFactory::default().with_customizations(customizations);

	let form = factory.create_form(&post(), Some(&account())).await.unwrap();

	assert_eq!(form.property("username").unwrap().value, Some(json!("ADA")));
	assert_eq!(form.property("password").unwrap().value, None);
	assert_eq!(form.property("internalNotes").unwrap().value, Some(json!("VIP")));
}

#[rstest]
#[tokio::test]
async fn test_failing_value_hook_propagates() {
	let factory = FormFactory::default().with_customizations(
		Customizations::new().value_fn("broken", |_property, _value| Err("boom".into())),
	);

	let error = factory
		.create_form(&post(), Some(&account()))
		.await
		.unwrap_err();

	assert!(matches!(error, HalFormsError::Customization { hook, .. } if hook == "broken"));
}

// ============================================================================
// Cache
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_concurrent_requests_build_once() {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let factory = FormFactory::default().with_customizations(Customizations::new().template_fn(
		"count",
		move |property, _context| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(Customized::Continue(property))
		},
	));

	let request = post();
	let builds = (0..8).map(|_| factory.create_template_for::<Account>(&request));
	let templates = futures::future::join_all(builds).await;

	assert!(templates.iter().all(Result::is_ok));
	// One hook call per member of a single build
	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test]
async fn test_cache_key_includes_title_and_method() {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let factory = FormFactory::default().with_customizations(Customizations::new().resource_fn(
		"count",
		move |template, _info| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(template)
		},
	));

	for request in [
		post(),
		post(),
		post().with_title("Sign up"),
		TemplateRequest::new(Method::PUT),
		post().with_target("/elsewhere"),
	] {
		factory.create_template_for::<Account>(&request).await.unwrap();
	}

	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test]
async fn test_reconfigured_clone_keeps_its_own_templates() {
	let base = FormTemplateFactory::default();
	let hiding = base.clone().with_customizations(hide_internal());

	let hidden = hiding.create_template_for::<Account>(&post()).await.unwrap();
	let plain = base.create_template_for::<Account>(&post()).await.unwrap();
	let hidden_again = hiding.create_template_for::<Account>(&post()).await.unwrap();

	assert_eq!(hidden.property_names(), vec!["username", "password"]);
	assert_eq!(
		plain.property_names(),
		vec!["username", "password", "internalNotes"]
	);
	assert_eq!(hidden_again.property_names(), vec!["username", "password"]);
}

#[rstest]
#[tokio::test]
async fn test_factories_sharing_a_cache_keep_separate_entries() {
	let cache = Arc::new(MokaTemplateCache::default());
	let plain = FormFactory::default().with_cache(cache.clone());
	let hiding = FormFactory::default()
		.with_cache(cache.clone())
		.with_customizations(hide_internal());

	let first = plain.create_template_for::<Account>(&post()).await.unwrap();
	let second = hiding.create_template_for::<Account>(&post()).await.unwrap();

	assert_eq!(first.properties.len(), 3);
	assert_eq!(second.properties.len(), 2);
	assert_eq!(cache.entry_count().await, 2);
}

#[rstest]
#[tokio::test]
async fn test_target_is_not_shared_between_requests() {
	let factory = FormFactory::default();

	let first = factory.create_template_for::<Account>(&post()).await.unwrap();
	let second = factory
		.create_template_for::<Account>(&TemplateRequest::new(Method::POST))
		.await
		.unwrap();

	assert_eq!(first.target.as_deref(), Some("/accounts"));
	assert_eq!(second.target, None);
}

// ============================================================================
// Cancellation
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_cancelled_build_is_retried_by_next_request() {
	let cache = Arc::new(MokaTemplateCache::default());
	let factory = FormFactory::default().with_cache(cache.clone());
	let token = CancellationToken::new();
	token.cancel();

	let error = factory
		.create_template_for::<Account>(&post().with_cancellation(token))
		.await
		.unwrap_err();
	assert!(error.is_cancelled());
	assert_eq!(cache.entry_count().await, 0);

	let template = factory.create_template_for::<Account>(&post()).await.unwrap();
	assert_eq!(template.properties.len(), 3);
	assert_eq!(cache.entry_count().await, 1);
}

struct CancelWhileBuilding {
	token: CancellationToken,
}

#[async_trait::async_trait]
impl PropertyTemplateCustomization for CancelWhileBuilding {
	fn name(&self) -> &str {
		"cancel-while-building"
	}

	async fn customize(
		&self,
		property: Property,
		_context: &MemberContext<'_>,
	) -> Result<Customized, BoxError> {
		self.token.cancel();
		tokio::task::yield_now().await;
		Ok(Customized::Continue(property))
	}
}

#[rstest]
#[tokio::test]
async fn test_waiter_rebuilds_after_another_request_is_cancelled() {
	let cache = Arc::new(MokaTemplateCache::default());
	let token = CancellationToken::new();
	let factory = FormFactory::default()
		.with_cache(cache.clone())
		.with_customizations(Customizations::new().with_template(CancelWhileBuilding {
			token: token.clone(),
		}));
	let cancelled_request = post().with_cancellation(token);
	let plain_request = post();

	let (cancelled, plain) = tokio::join!(
		factory.create_template_for::<Account>(&cancelled_request),
		factory.create_template_for::<Account>(&plain_request),
	);

	assert!(cancelled.unwrap_err().is_cancelled());
	let plain = plain.unwrap();
	assert_eq!(
		plain.property_names(),
		vec!["username", "password", "internalNotes"]
	);
	assert_eq!(cache.entry_count().await, 1);

	let cached = factory.create_template_for::<Account>(&post()).await.unwrap();
	assert_eq!(cached, plain);
}
