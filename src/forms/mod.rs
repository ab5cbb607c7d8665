// Client-side forms: schema validation, submission and 422 error mapping

mod definitions;
mod schema;
mod server_errors;

pub use definitions::*;
pub use schema::{FieldMessages, FieldSchema, Rule, Schema};
pub use server_errors::{base_field, local_field, map_server_errors, FieldMapping, MappedErrors};

use crate::error::{ApiError, ApiResult};
use crate::hooks::{RechargeRedirect, ResourceHooks, WalletHooks};
use crate::models::{BookingRequest, BookingResponse, RechargeRequest};
use crate::multipart::UploadFile;
use crate::notify::Notifier;
use crate::services::{Bookable, Resource};
use async_trait::async_trait;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::debug;

// What the view shows after a rejected submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub errors: FieldMessages,
    pub panel: Vec<String>,
    pub message: Option<String>,
}

impl FormState {
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_field_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn dismiss_panel(&mut self) {
        self.panel.clear();
    }
}

#[async_trait]
pub trait Form: Send + Sync {
    type Input: Serialize + Send + Sync;
    type Output: Send;

    fn schema(&self) -> &Schema;

    fn field_mapping(&self) -> FieldMapping;

    fn notifier(&self) -> &dyn Notifier;

    // Checks spanning several fields, run after the schema passes
    fn cross_check(&self, _input: &Self::Input) -> FieldMessages {
        FieldMessages::new()
    }

    async fn send(&self, input: &Self::Input) -> ApiResult<Self::Output>;
}

// Validate, send, and turn a failure into the state the view renders.
// Nothing reaches the network unless validation passes.
pub async fn submit<F: Form + ?Sized>(form: &F, input: &F::Input) -> Result<F::Output, FormState> {
    let mapping = form.field_mapping();
    let value = serde_json::to_value(input).map_err(|e| FormState {
        message: Some(e.to_string()),
        ..FormState::default()
    })?;

    let mut errors = form.schema().validate(&value);
    if errors.is_empty() {
        errors = form.cross_check(input);
    }
    if !errors.is_empty() {
        debug!(fields = errors.len(), "form rejected before submission");
        return Err(FormState {
            errors: to_local_names(errors, mapping),
            ..FormState::default()
        });
    }

    form.send(input)
        .await
        .map_err(|err| failure_state(form.notifier(), &err, mapping))
}

fn to_local_names(errors: FieldMessages, mapping: FieldMapping) -> FieldMessages {
    errors
        .into_iter()
        .map(|(field, message)| {
            let local = local_field(mapping, &field).map_or(field, str::to_string);
            (local, message)
        })
        .collect()
}

// Hooks already toast non-validation failures; here only a 422 needs
// attaching to fields, with a toast for whatever has no field.
fn failure_state(notifier: &dyn Notifier, err: &ApiError, mapping: FieldMapping) -> FormState {
    let Some(server_errors) = err.field_errors() else {
        return FormState {
            message: Some(err.user_message()),
            ..FormState::default()
        };
    };

    let mapped = map_server_errors(server_errors, mapping);
    if !mapped.unmapped.is_empty() {
        notifier.error(&mapped.unmapped.join(" "));
    } else if mapped.fields.is_empty() {
        notifier.error(&err.user_message());
    }

    FormState {
        errors: mapped.fields,
        panel: mapped.panel,
        message: Some(err.user_message()),
    }
}

// Create or edit form for one resource; files are sent as multipart
pub struct ResourceForm<R: Resource, I> {
    hooks: ResourceHooks<R>,
    target: Option<u64>,
    files: Vec<UploadFile>,
    schema: Schema,
    mapping: FieldMapping,
    _input: PhantomData<fn(&I)>,
}

impl<R: Resource, I> ResourceForm<R, I> {
    pub fn new(hooks: ResourceHooks<R>, target: Option<u64>, schema: Schema, mapping: FieldMapping) -> Self {
        Self {
            hooks,
            target,
            files: Vec::new(),
            schema,
            mapping,
            _input: PhantomData,
        }
    }

    pub fn with_files(mut self, files: Vec<UploadFile>) -> Self {
        self.files = files;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }
}

#[async_trait]
impl<R, I> Form for ResourceForm<R, I>
where
    R: Resource,
    I: Serialize + Send + Sync,
{
    type Input = I;
    type Output = R::Entity;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn field_mapping(&self) -> FieldMapping {
        self.mapping
    }

    fn notifier(&self) -> &dyn Notifier {
        self.hooks.notifier()
    }

    async fn send(&self, input: &I) -> ApiResult<R::Entity> {
        match self.target {
            None => self.hooks.create(input, &self.files).await,
            Some(id) => self.hooks.update(id, input, &self.files).await,
        }
    }
}

pub struct BookingForm<R: Bookable> {
    hooks: ResourceHooks<R>,
    target: u64,
    schema: Schema,
}

impl<R: Bookable> BookingForm<R> {
    pub fn new(hooks: ResourceHooks<R>, target: u64) -> Self {
        Self {
            hooks,
            target,
            schema: booking_schema(),
        }
    }
}

#[async_trait]
impl<R: Bookable> Form for BookingForm<R> {
    type Input = BookingRequest;
    type Output = BookingResponse;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn field_mapping(&self) -> FieldMapping {
        BOOKING_FIELDS
    }

    fn notifier(&self) -> &dyn Notifier {
        self.hooks.notifier()
    }

    fn cross_check(&self, input: &BookingRequest) -> FieldMessages {
        check_stay_dates(input)
    }

    async fn send(&self, input: &BookingRequest) -> ApiResult<BookingResponse> {
        self.hooks.book(self.target, input).await
    }
}

pub struct RechargeForm {
    wallet: WalletHooks,
    schema: Schema,
}

impl RechargeForm {
    pub fn new(wallet: WalletHooks) -> Self {
        Self {
            wallet,
            schema: recharge_schema(),
        }
    }
}

#[async_trait]
impl Form for RechargeForm {
    type Input = RechargeRequest;
    type Output = RechargeRedirect;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn field_mapping(&self) -> FieldMapping {
        RECHARGE_FIELDS
    }

    fn notifier(&self) -> &dyn Notifier {
        self.wallet.notifier()
    }

    async fn send(&self, input: &RechargeRequest) -> ApiResult<RechargeRedirect> {
        self.wallet.recharge(input.amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{Hooks, PAYMENT_REDIRECT_DELAY};
    use crate::http::HttpMethod;
    use crate::mock_transport::MockTransport;
    use crate::models::{AmenityInput, CommissionInput, HotelInput};
    use crate::notify::{Level, RecordingNotifier};
    use crate::query::QueryClient;
    use crate::services::{Commissions, Hotels, Services};
    use serde_json::json;
    use std::sync::Arc;

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
            QueryClient::default(),
            notifier.clone(),
        );
        Fixture {
            mock,
            notifier,
            hooks,
        }
    }

    fn hotel_input(name: &str) -> HotelInput {
        HotelInput {
            name: name.to_string(),
            address: "Route de la Corniche".to_string(),
            city: "Dakar".to_string(),
            stars: Some(4),
            business_type_id: Some(1),
            ..HotelInput::default()
        }
    }

    #[tokio::test]
    async fn test_commission_above_hundred_never_sent() {
        let f = fixture();
        let form = commission_form(f.hooks.resource::<Commissions>(), None);
        let input = CommissionInput {
            business_type_id: Some(2),
            rate: 150.0,
        };

        let state = submit(&form, &input).await.unwrap_err();
        assert_eq!(state.error("rate"), Some("Doit être inférieur ou égal à 100"));
        assert_eq!(f.mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_short_name_never_sent() {
        let f = fixture();
        let form = hotel_form(f.hooks.resource::<Hotels>(), None);

        let state = submit(&form, &hotel_input("H")).await.unwrap_err();
        assert!(state.error("name").is_some());
        assert_eq!(f.mock.call_count(), 0);
        assert!(f.notifier.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_local_names_used_for_client_errors() {
        let f = fixture();
        let form = commission_form(f.hooks.resource::<Commissions>(), None);
        let input = CommissionInput {
            business_type_id: None,
            rate: 10.0,
        };

        let state = submit(&form, &input).await.unwrap_err();
        assert_eq!(state.error("businessType"), Some("Ce champ est requis"));
    }

    #[tokio::test]
    async fn test_valid_hotel_created() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Post,
            "/hotels",
            201,
            json!({"success": true, "data": {"id": 12, "name": "Terrou-Bi"}}),
        );
        let form = hotel_form(f.hooks.resource::<Hotels>(), None);

        let hotel = submit(&form, &hotel_input("Terrou-Bi")).await.unwrap();
        assert_eq!(hotel.id, 12);
        assert_eq!(f.mock.last_request().unwrap().method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn test_edit_form_updates() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Put,
            "/amenities/3",
            200,
            json!({"success": true, "data": {"id": 3, "name": "Piscine"}}),
        );
        let form = amenity_form(f.hooks.resource(), Some(3));
        assert!(form.is_edit());

        let input = AmenityInput {
            name: "Piscine".to_string(),
            icon: None,
        };
        let amenity = submit(&form, &input).await.unwrap();
        assert_eq!(amenity.name, "Piscine");
    }

    #[tokio::test]
    async fn test_server_errors_attach_to_fields() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Post,
            "/hotels",
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": {
                    "business_type_id": ["Le type d'activité est invalide."],
                    "amenities.0": ["Équipement inconnu."],
                    "owner": ["Compte propriétaire requis."]
                }
            }),
        );
        let form = hotel_form(f.hooks.resource::<Hotels>(), None);

        let state = submit(&form, &hotel_input("Terrou-Bi")).await.unwrap_err();
        assert_eq!(state.error("businessType"), Some("Le type d'activité est invalide."));
        assert_eq!(state.error("amenities"), Some("Équipement inconnu."));
        assert_eq!(state.panel.len(), 3);

        let toasts = f.notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, Level::Error);
        assert_eq!(toasts[0].message, "Compte propriétaire requis.");
    }

    #[tokio::test]
    async fn test_validation_without_fields_toasts_message() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Post,
            "/commissions",
            422,
            json!({"message": "Une commission existe déjà pour ce type."}),
        );
        let form = commission_form(f.hooks.resource::<Commissions>(), None);
        let input = CommissionInput {
            business_type_id: Some(1),
            rate: 12.5,
        };

        let state = submit(&form, &input).await.unwrap_err();
        assert!(!state.has_field_errors());
        assert_eq!(
            f.notifier.drain()[0].message,
            "Une commission existe déjà pour ce type."
        );
    }

    #[tokio::test]
    async fn test_recharge_five_thousand() {
        let f = fixture();
        f.mock.respond(
            HttpMethod::Post,
            "/wallets/recharge",
            200,
            json!({"success": true, "data": {"payment_url": "https://pay.example.com/checkout/77"}}),
        );
        let form = RechargeForm::new(f.hooks.wallet());

        let redirect = submit(&form, &RechargeRequest { amount: 5000 }).await.unwrap();
        assert_eq!(redirect.payment_url, "https://pay.example.com/checkout/77");
        assert_eq!(redirect.delay, PAYMENT_REDIRECT_DELAY);

        let request = f.mock.last_request().unwrap();
        assert_eq!(request.path, "/wallets/recharge");
        assert_eq!(request.body.as_json(), Some(&json!({"amount": 5000})));
    }

    #[tokio::test]
    async fn test_recharge_below_minimum_rejected() {
        let f = fixture();
        let form = RechargeForm::new(f.hooks.wallet());

        let state = submit(&form, &RechargeRequest { amount: 50 }).await.unwrap_err();
        assert!(state.error("amount").is_some());
        assert_eq!(f.mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_booking_dates_checked_before_sending() {
        let f = fixture();
        let form = BookingForm::new(f.hooks.resource::<Hotels>(), 4);
        let input = BookingRequest {
            check_in: "2025-08-10".to_string(),
            check_out: "2025-08-08".to_string(),
            guests: 2,
            ..BookingRequest::default()
        };

        let state = submit(&form, &input).await.unwrap_err();
        assert!(state.error("checkOut").is_some());
        assert_eq!(f.mock.call_count(), 0);
    }

    #[test]
    fn test_dismiss_panel_keeps_field_errors() {
        let mut state = FormState {
            errors: [("name".to_string(), "Requis".to_string())].into_iter().collect(),
            panel: vec!["Requis".to_string()],
            message: None,
        };
        state.dismiss_panel();
        assert!(state.panel.is_empty());
        assert!(state.has_field_errors());
    }
}
