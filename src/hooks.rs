// Data-fetching hooks: service calls wrapped in cached queries and mutations

use crate::envelope::Paginated;
use crate::error::{ApiResult, ErrorKind};
use crate::models::{BookingRequest, BookingResponse, Profile, ProfileInput, WalletTransaction};
use crate::multipart::UploadFile;
use crate::notify::Notifier;
use crate::query::{QueryClient, QueryKey};
use crate::services::{
    Bookable, Bookings, ListParams, ProfileService, Resource, ResourceService, Services,
    WalletService,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Pause between a successful recharge and the jump to the payment page
pub const PAYMENT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

const PROFILE_KEY: &str = "profile";
const WALLET_TRANSACTIONS_KEY: &str = "wallet_transactions";

// Toasts on failure, except validation errors which the forms attach to fields
fn report_failure<T>(notifier: &dyn Notifier, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(err) = &result {
        if err.kind() != ErrorKind::Validation {
            notifier.api_error(err);
        }
    }
    result
}

pub struct ResourceHooks<R: Resource> {
    service: ResourceService<R>,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
}

impl<R: Resource> Clone for ResourceHooks<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            queries: self.queries.clone(),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R: Resource> ResourceHooks<R> {
    pub fn new(service: ResourceService<R>, queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            queries,
            notifier,
        }
    }

    pub fn root_key() -> QueryKey {
        QueryKey::new(R::PATH)
    }

    // Prefix shared by every page of the list
    pub fn lists_key() -> QueryKey {
        Self::root_key().with("list")
    }

    pub fn list_key(params: &ListParams) -> QueryKey {
        params
            .key_parts()
            .into_iter()
            .fold(Self::lists_key(), |key, part| key.with(part))
    }

    pub fn detail_key(id: u64) -> QueryKey {
        Self::root_key().with("detail").with(id)
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub async fn list(&self, params: ListParams) -> ApiResult<Arc<Paginated<R::Entity>>> {
        let service = self.service.clone();
        let key = Self::list_key(&params);
        self.queries
            .fetch(key, move || async move { service.get_all(&params).await })
            .await
    }

    pub async fn detail(&self, id: u64) -> ApiResult<Arc<R::Entity>> {
        let service = self.service.clone();
        self.queries
            .fetch(Self::detail_key(id), move || async move {
                service.get_by_id(id).await
            })
            .await
    }

    pub async fn create<D>(&self, data: &D, files: &[UploadFile]) -> ApiResult<R::Entity>
    where
        D: Serialize + Sync + ?Sized,
    {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.create(data, files),
                |_| notifier.success(&format!("{} : création réussie", R::DISPLAY_NAME)),
                &[Self::lists_key()],
            )
            .await;
        report_failure(notifier, result)
    }

    pub async fn update<D>(&self, id: u64, data: &D, files: &[UploadFile]) -> ApiResult<R::Entity>
    where
        D: Serialize + Sync + ?Sized,
    {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.update(id, data, files),
                |_| notifier.success(&format!("{} : mise à jour réussie", R::DISPLAY_NAME)),
                &[Self::lists_key(), Self::detail_key(id)],
            )
            .await;
        report_failure(notifier, result)
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.delete(id),
                |_| notifier.success(&format!("{} : suppression réussie", R::DISPLAY_NAME)),
                &[Self::lists_key(), Self::detail_key(id)],
            )
            .await;
        report_failure(notifier, result)
    }
}

impl<R: Bookable> ResourceHooks<R> {
    // A reservation changes the item's availability and the booking lists
    pub async fn book(&self, id: u64, request: &BookingRequest) -> ApiResult<BookingResponse> {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.book(id, request),
                |_| notifier.success("Réservation effectuée avec succès"),
                &[Self::detail_key(id), QueryKey::new(Bookings::PATH)],
            )
            .await;
        report_failure(notifier, result)
    }
}

// Where the user is sent after a successful recharge
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RechargeRedirect {
    pub payment_url: String,
    pub delay: Duration,
}

impl RechargeRedirect {
    pub async fn follow(self, navigator: &dyn Navigator) {
        tokio::time::sleep(self.delay).await;
        info!(url = %self.payment_url, "redirecting to payment page");
        navigator.navigate(&self.payment_url);
    }
}

#[derive(Clone)]
pub struct WalletHooks {
    service: WalletService,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
}

impl WalletHooks {
    pub fn new(service: WalletService, queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            queries,
            notifier,
        }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn transactions_key(params: &ListParams) -> QueryKey {
        params
            .key_parts()
            .into_iter()
            .fold(QueryKey::new(WALLET_TRANSACTIONS_KEY), |key, part| key.with(part))
    }

    pub async fn transactions(&self, params: ListParams) -> ApiResult<Arc<Paginated<WalletTransaction>>> {
        let service = self.service.clone();
        self.queries
            .fetch(Self::transactions_key(&params), move || async move {
                service.transactions(&params).await
            })
            .await
    }

    pub async fn recharge(&self, amount: u64) -> ApiResult<RechargeRedirect> {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.recharge(amount),
                |_| notifier.info("Redirection vers la page de paiement..."),
                &[QueryKey::new(WALLET_TRANSACTIONS_KEY), QueryKey::new(PROFILE_KEY)],
            )
            .await;
        report_failure(notifier, result).map(|response| RechargeRedirect {
            payment_url: response.payment_url,
            delay: PAYMENT_REDIRECT_DELAY,
        })
    }
}

#[derive(Clone)]
pub struct ProfileHooks {
    service: ProfileService,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
}

impl ProfileHooks {
    pub fn new(service: ProfileService, queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            queries,
            notifier,
        }
    }

    pub async fn profile(&self) -> ApiResult<Arc<Profile>> {
        let service = self.service.clone();
        self.queries
            .fetch(QueryKey::new(PROFILE_KEY), move || async move { service.get().await })
            .await
    }

    pub async fn update(&self, input: &ProfileInput, avatar: Option<UploadFile>) -> ApiResult<Profile> {
        let notifier = self.notifier.as_ref();
        let result = self
            .queries
            .mutate(
                self.service.update(input, avatar),
                |_| notifier.success("Profil mis à jour"),
                &[QueryKey::new(PROFILE_KEY)],
            )
            .await;
        report_failure(notifier, result)
    }
}

// Entry point handing out hooks that share one cache and one notifier
#[derive(Clone)]
pub struct Hooks {
    services: Services,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
}

impl Hooks {
    pub fn new(services: Services, queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            services,
            queries,
            notifier,
        }
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    pub fn resource<R: Resource>(&self) -> ResourceHooks<R> {
        ResourceHooks::new(
            self.services.resource(),
            self.queries.clone(),
            Arc::clone(&self.notifier),
        )
    }

    pub fn wallet(&self) -> WalletHooks {
        WalletHooks::new(
            self.services.wallet(),
            self.queries.clone(),
            Arc::clone(&self.notifier),
        )
    }

    pub fn profile(&self) -> ProfileHooks {
        ProfileHooks::new(
            self.services.profile(),
            self.queries.clone(),
            Arc::clone(&self.notifier),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::mock_transport::MockTransport;
    use crate::models::{BusinessTypeInput, HotelInput};
    use crate::notify::{Level, RecordingNotifier};
    use crate::query::QueryConfig;
    use crate::services::{BusinessTypes, Hotels, Users};
    use parking_lot::Mutex;
    use serde_json::json;

    struct Fixture {
        mock: Arc<MockTransport>,
        notifier: Arc<RecordingNotifier>,
        hooks: Hooks,
    }

    fn fixture() -> Fixture {
        let mock = Arc::new(MockTransport::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let hooks = Hooks::new(
            Services::new(mock.client()),
            QueryClient::new(QueryConfig::default()),
            notifier.clone(),
        );
        Fixture {
            mock,
            notifier,
            hooks,
        }
    }

    fn users_page() -> serde_json::Value {
        json!({
            "data": [{"id": 1, "name": "Aminata", "email": "a@example.com"}],
            "meta": {"current_page": 1, "last_page": 1, "per_page": 15, "total": 1}
        })
    }

    #[test]
    fn test_keys_include_resource_and_params() {
        let key = ResourceHooks::<Users>::list_key(&ListParams::page(3).with_owner(9));
        assert_eq!(key.to_string(), "users:list:page=3:owner_id=9");
        assert!(key.starts_with(&ResourceHooks::<Users>::lists_key()));
        assert_eq!(ResourceHooks::<Hotels>::detail_key(4).to_string(), "hotels:detail:4");
    }

    #[tokio::test]
    async fn test_concurrent_list_requests_hit_backend_once() {
        let f = fixture();
        f.mock.respond(HttpMethod::Get, "/users", 200, users_page());
        f.mock.set_delay(30);

        let users = f.hooks.resource::<Users>();
        let other_view = f.hooks.resource::<Users>();
        let (a, b) = tokio::join!(users.list(ListParams::page(1)), other_view.list(ListParams::page(1)));

        assert_eq!(f.mock.call_count(), 1);
        assert_eq!(a.unwrap().data, b.unwrap().data);

        // different page, different key
        users.list(ListParams::page(2)).await.unwrap();
        assert_eq!(f.mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_create_invalidates_lists_and_notifies() {
        let f = fixture();
        f.mock.respond(HttpMethod::Get, "/business-types", 200, json!({"data": [{"id": 1, "name": "Hôtellerie"}]}));
        f.mock.respond(HttpMethod::Post, "/business-types", 201, json!({"success": true, "data": {"id": 2, "name": "Location"}}));

        let types = f.hooks.resource::<BusinessTypes>();
        types.list(ListParams::default()).await.unwrap();
        let key = ResourceHooks::<BusinessTypes>::list_key(&ListParams::default());
        assert_eq!(f.hooks.queries().is_stale(&key), Some(false));

        let input = BusinessTypeInput {
            name: "Location".to_string(),
            description: None,
        };
        let created = types.create(&input, &[]).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(f.hooks.queries().is_stale(&key), Some(true));

        let toasts = f.notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, Level::Success);
        assert_eq!(toasts[0].message, "Type d'activité : création réussie");
    }

    #[tokio::test]
    async fn test_update_invalidates_item_key() {
        let f = fixture();
        f.mock.respond(HttpMethod::Get, "/hotels/5", 200, json!({"success": true, "data": {"id": 5, "name": "Old"}}));
        f.mock.respond(HttpMethod::Put, "/hotels/5", 200, json!({"success": true, "data": {"id": 5, "name": "New"}}));

        let hotels = f.hooks.resource::<Hotels>();
        assert_eq!(hotels.detail(5).await.unwrap().name, "Old");

        let input = HotelInput {
            name: "New".to_string(),
            address: "Rue 1".to_string(),
            city: "Saly".to_string(),
            ..HotelInput::default()
        };
        hotels.update(5, &input, &[]).await.unwrap();
        assert_eq!(
            f.hooks.queries().is_stale(&ResourceHooks::<Hotels>::detail_key(5)),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_errors_toast_by_category_but_not_validation() {
        let f = fixture();
        f.mock.respond(HttpMethod::Delete, "/users/3", 403, json!({"message": "Forbidden"}));
        f.mock.respond(
            HttpMethod::Post,
            "/business-types",
            422,
            json!({"message": "Invalid", "errors": {"name": ["Déjà utilisé"]}}),
        );

        let err = f.hooks.resource::<Users>().delete(3).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let input = BusinessTypeInput {
            name: "Hôtellerie".to_string(),
            description: None,
        };
        let err = f
            .hooks
            .resource::<BusinessTypes>()
            .create(&input, &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let toasts = f.notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, ErrorKind::Forbidden.toast_message());
    }

    #[tokio::test]
    async fn test_booking_invalidates_bookings() {
        let f = fixture();
        f.hooks
            .queries()
            .set_query_data(QueryKey::new("bookings").with("list").with("page=1"), 0u8);
        f.mock.respond(
            HttpMethod::Post,
            "/hotels/2/book",
            201,
            json!({"success": true, "data": {"booking": {"id": 10, "check_in": "2025-08-01", "check_out": "2025-08-03"}}}),
        );

        let request = BookingRequest {
            check_in: "2025-08-01".to_string(),
            check_out: "2025-08-03".to_string(),
            guests: 2,
            room_id: Some(4),
            notes: None,
        };
        let response = f.hooks.resource::<Hotels>().book(2, &request).await.unwrap();
        assert_eq!(response.booking.id, 10);
        assert_eq!(
            f.hooks
                .queries()
                .is_stale(&QueryKey::new("bookings").with("list").with("page=1")),
            Some(true)
        );
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) {
            self.visited.lock().push(url.to_string());
        }
    }

    #[tokio::test]
    async fn test_recharge_returns_redirect_plan() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Post,
            "/wallets/recharge",
            200,
            json!({"success": true, "data": {"payment_url": "https://pay.example.com/p/55"}}),
        );

        let redirect = f.hooks.wallet().recharge(5000).await.unwrap();
        assert_eq!(redirect.payment_url, "https://pay.example.com/p/55");
        assert_eq!(redirect.delay, PAYMENT_REDIRECT_DELAY);
        assert_eq!(f.notifier.snapshot()[0].level, Level::Info);

        let navigator = RecordingNavigator::default();
        RechargeRedirect {
            delay: Duration::from_millis(5),
            ..redirect
        }
        .follow(&navigator)
        .await;
        assert_eq!(*navigator.visited.lock(), vec!["https://pay.example.com/p/55".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_is_cached() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Get,
            "/profile",
            200,
            json!({"success": true, "data": {"id": 1, "name": "Ibrahima", "email": "i@example.com"}}),
        );

        let profile = f.hooks.profile();
        profile.profile().await.unwrap();
        profile.profile().await.unwrap();
        assert_eq!(f.mock.call_count(), 1);
    }
}
