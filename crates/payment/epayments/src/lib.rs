pub mod amount;
pub mod credentials;
pub mod error;
pub mod hash;
pub mod payment;
pub mod payment_request;
pub mod redirect;
pub mod token;

use ::env::Env;
use log::{info, warn};
use reqwest::{header::AUTHORIZATION, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use amount::Amount;
pub use credentials::{Credentials, Environment};
pub use error::EPaymentsError;
pub use hash::{compute_integrity_hash, HashFields};
pub use payment::{Operation, OperationResponse, PaymentPageResponse};
pub use payment_request::{Gateway, Language, PaymentRequest};
pub use redirect::Redirect;
pub use token::AccessToken;

use payment::TokenResponse;

const TOKEN_PATH: &str = "/api/v1/oauth/token";
const PAYMENT_PAGE_PATH: &str = "/api/v1/public/paymentpage";
const OPERATION_PATH: &str = "/api/v1/operation";

pub const DONE_STATE: &str = "Done";

#[derive(Debug, Clone)]
struct CachedLink {
    order_number: String,
    url: String,
}

/// Client of the ePayments hosted checkout.
pub struct EPayments {
    client: Client,
    credentials: Credentials,
    link: Option<CachedLink>,
}

impl EPayments {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            link: None,
        }
    }

    pub fn from_env(env: &Env) -> Self {
        let mut credentials = Credentials::new(env.shop_id(), env.secret_key())
            .with_timeout(env.timeout());
        if let (Some(username), Some(password)) = (env.username(), env.password()) {
            credentials = credentials.with_user(username, password);
        }
        credentials.set_test_mode(env.sandbox());
        if let Some(base_url) = env.base_url() {
            credentials.set_environment(Environment::Custom(base_url.to_owned()));
        }
        Self::new(credentials)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.credentials
    }

    pub fn set_test_mode(&mut self, sandbox: bool) -> bool {
        self.credentials.set_test_mode(sandbox)
    }

    /// Payment page url from the last successful request.
    pub fn link(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.url.as_str())
    }

    pub fn forget_link(&mut self) {
        self.link = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.credentials.base_url(), path)
    }

    /// Password grant against the OAuth endpoint.
    pub async fn request_access_token(&self) -> Result<AccessToken, EPaymentsError> {
        let (username, password) = match (
            self.credentials.username(),
            self.credentials.password(),
        ) {
            (Some(username), Some(password)) => (username, password),
            _ => {
                return Err(EPaymentsError::Auth(
                    "username and password are not configured".to_owned(),
                ))
            }
        };

        let url = self.url(TOKEN_PATH);
        info!("Requesting access token: {}", url);
        let response = self
            .client
            .post(&url)
            .timeout(self.credentials.timeout())
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await?;

        let body = read_json(response)
            .await?
            .ok_or_else(|| EPaymentsError::Auth("empty token response".to_owned()))?;
        let token: TokenResponse = serde_json::from_value(body)
            .map_err(|err| EPaymentsError::Auth(format!("unreadable token response: {}", err)))?;

        match token.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(AccessToken::issued(
                access_token,
                token.token_type,
                token.expires_in,
            )),
            None => {
                let reason = token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "no access_token in response".to_owned());
                warn!("Access token was not issued: {}", reason);
                Err(EPaymentsError::Auth(reason))
            }
        }
    }

    /// Asks the gateway for a payment page and caches its url.
    pub async fn request_payment_page_url(
        &mut self,
        request: &PaymentRequest,
    ) -> Result<PaymentPageResponse, EPaymentsError> {
        let url = self.url(PAYMENT_PAGE_PATH);
        info!(
            "Requesting payment page for order {}: {}",
            request.order_number(),
            url
        );
        let response = self
            .client
            .get(&url)
            .timeout(self.credentials.timeout())
            .query(&request.query_pairs(&self.credentials))
            .send()
            .await?;

        let body = match read_json(response).await? {
            Some(Value::Object(fields)) if fields.is_empty() => None,
            other => other,
        }
        .ok_or(EPaymentsError::NoResponse)?;
        let page: PaymentPageResponse = parse(body)?;

        if let Some(messages) = page.error_messages() {
            warn!(
                "Gateway rejected payment page for order {}: {:?}",
                request.order_number(),
                messages
            );
            return Err(EPaymentsError::Gateway { messages });
        }

        let link = page
            .url_to_redirect()
            .ok_or(EPaymentsError::MissingRedirectUrl)?;
        self.link = Some(CachedLink {
            order_number: request.order_number().to_owned(),
            url: link.to_owned(),
        });
        Ok(page)
    }

    /// Fetches an operation with a freshly issued token.
    pub async fn get_operation(
        &self,
        operation_id: i64,
    ) -> Result<OperationResponse, EPaymentsError> {
        let token = self.request_access_token().await?;
        self.get_operation_with_token(&token, operation_id).await
    }

    pub async fn get_operation_with_token(
        &self,
        token: &AccessToken,
        operation_id: i64,
    ) -> Result<OperationResponse, EPaymentsError> {
        let url = self.url(OPERATION_PATH);
        info!("Requesting operation {}: {}", operation_id, url);
        let response = self
            .client
            .get(&url)
            .timeout(self.credentials.timeout())
            .header(AUTHORIZATION, token.bearer())
            .query(&[("operationId", operation_id)])
            .send()
            .await?;

        let body = read_json(response).await?.ok_or(EPaymentsError::NoResponse)?;
        OperationResponse::from_value(body).ok_or(EPaymentsError::NoResponse)
    }

    /// Returns the operation when it is done and belongs to the order.
    pub async fn verify_operation(
        &self,
        operation_id: i64,
        order_number: &str,
    ) -> Result<Operation, EPaymentsError> {
        let response = self.get_operation(operation_id).await?;
        match_operation(&response, operation_id, order_number).cloned()
    }

    /// `true` only when the first listed operation is done and belongs to the order.
    pub async fn check_operation(
        &self,
        operation_id: i64,
        order_number: &str,
    ) -> Result<bool, EPaymentsError> {
        match self.verify_operation(operation_id, order_number).await {
            Ok(_) => Ok(true),
            Err(EPaymentsError::Gateway { .. })
            | Err(EPaymentsError::ValidationMismatch { .. })
            | Err(EPaymentsError::NoResponse) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Resolves where to send the buyer. A link cached for the same order is reused.
    pub async fn send(&mut self, request: &PaymentRequest) -> Result<Redirect, EPaymentsError> {
        let cached = self
            .link
            .as_ref()
            .filter(|link| link.order_number == request.order_number())
            .map(|link| link.url.clone());

        let link = match cached {
            Some(link) => link,
            None => {
                let page = self.request_payment_page_url(request).await?;
                page.url_to_redirect()
                    .ok_or(EPaymentsError::MissingRedirectUrl)?
                    .to_owned()
            }
        };
        info!("Redirecting order {} to {}", request.order_number(), link);
        Ok(Redirect::to(&link)?)
    }
}

/// Compares the first listed operation with what the shop expects.
pub fn match_operation<'a>(
    response: &'a OperationResponse,
    operation_id: i64,
    order_number: &str,
) -> Result<&'a Operation, EPaymentsError> {
    if let Some(messages) = response.error_messages() {
        return Err(EPaymentsError::Gateway { messages });
    }

    let mismatch = |reason: String| EPaymentsError::ValidationMismatch {
        operation_id,
        reason,
    };
    let operation = response
        .first_operation()
        .ok_or_else(|| mismatch("no operations in response".to_owned()))?;

    if operation.id() != Some(operation_id) {
        return Err(mismatch(format!("id is {:?}", operation.id)));
    }
    if operation.state() != Some(DONE_STATE) {
        return Err(mismatch(format!("state is {:?}", operation.state)));
    }
    if operation.order_number() != Some(order_number) {
        return Err(mismatch(format!(
            "order number is {:?}",
            operation.order_number
        )));
    }
    Ok(operation)
}

/// Body as JSON, `None` when the gateway sent nothing usable.
async fn read_json(response: Response) -> Result<Option<Value>, EPaymentsError> {
    let status = response.status();
    if !status.is_success() {
        warn!("Gateway responded with HTTP {}", status);
    }
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("Gateway response is not JSON: {}", err);
            Ok(None)
        }
    }
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, EPaymentsError> {
    serde_json::from_value(body).map_err(|err| {
        warn!("Unexpected gateway response shape: {}", err);
        EPaymentsError::NoResponse
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: Value) -> OperationResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_match_done_operation() {
        let response = response(json!({
            "result": {"operations": [{"id": 42, "state": "Done", "orderNumber": "ORD-1"}]}
        }));
        let operation = match_operation(&response, 42, "ORD-1").unwrap();
        assert_eq!(Some("Done"), operation.state());
    }

    #[test]
    fn test_match_rejects_mismatches() {
        let pending = response(json!({
            "result": {"operations": [{"id": 42, "state": "Pending", "orderNumber": "ORD-1"}]}
        }));
        assert!(matches!(
            match_operation(&pending, 42, "ORD-1"),
            Err(EPaymentsError::ValidationMismatch { operation_id: 42, .. })
        ));

        let other_order = response(json!({
            "result": {"operations": [{"id": 42, "state": "Done", "orderNumber": "ORD-2"}]}
        }));
        assert!(match_operation(&other_order, 42, "ORD-1").is_err());

        let other_id = response(json!({
            "result": {"operations": [{"id": 41, "state": "Done", "orderNumber": "ORD-1"}]}
        }));
        assert!(match_operation(&other_id, 42, "ORD-1").is_err());

        let empty = response(json!({"result": {"operations": []}}));
        assert!(match_operation(&empty, 42, "ORD-1").is_err());

        let string_id = response(json!({
            "result": {"operations": [{"id": "42", "state": "Done", "orderNumber": "ORD-1"}]}
        }));
        assert!(match_operation(&string_id, 42, "ORD-1").is_err());
    }

    #[test]
    fn test_match_only_first_operation() {
        let response = response(json!({
            "result": {"operations": [
                {"id": 41, "state": "Done", "orderNumber": "ORD-0"},
                {"id": 42, "state": "Done", "orderNumber": "ORD-1"}
            ]}
        }));
        assert!(match_operation(&response, 42, "ORD-1").is_err());
    }

    #[test]
    fn test_match_error_envelope_wins() {
        let response = response(json!({
            "error": {"messages": ["Operation not found"]},
            "result": {"operations": [{"id": 42, "state": "Done", "orderNumber": "ORD-1"}]}
        }));
        match match_operation(&response, 42, "ORD-1") {
            Err(EPaymentsError::Gateway { messages }) => {
                assert_eq!(vec!["Operation not found".to_owned()], messages)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_sandbox_read_at_call_time() {
        let mut client = EPayments::new(Credentials::new(1, "key"));
        assert_eq!(
            "https://test-ms.epayments.com/api/v1/oauth/token",
            client.url(TOKEN_PATH)
        );
        client.set_test_mode(false);
        assert_eq!(
            "https://ms.epayments.com/api/v1/operation",
            client.url(OPERATION_PATH)
        );
        client.set_test_mode(true);
        assert_eq!(
            "https://test-ms.epayments.com/api/v1/public/paymentpage",
            client.url(PAYMENT_PAGE_PATH)
        );
    }
}
