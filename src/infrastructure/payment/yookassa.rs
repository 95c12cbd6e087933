//! YooKassa (v3 REST API) payment gateway.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::time::Duration;
use tracing::{debug, info};

use super::gateway::{PaymentError, PaymentGateway};
use crate::domain::entities::{Money, PaymentRequest, PaymentSession};

/// Connection and receipt settings for [`YooKassaGateway`].
#[derive(Debug, Clone)]
pub struct YooKassaConfig {
    /// Base API URL without a trailing slash, e.g. `https://api.yookassa.ru/v3`.
    pub api_url: String,
    pub shop_id: String,
    pub secret_key: String,
    /// Where the buyer lands after paying.
    pub return_url: String,
    pub description: String,
    pub currency: String,
    pub vat_code: u8,
    pub timeout: Duration,
}

#[serde_as]
#[derive(Debug, Serialize)]
struct AmountBody<'a> {
    #[serde_as(as = "DisplayFromStr")]
    value: Money,
    currency: &'a str,
}

#[derive(Debug, Serialize)]
struct ConfirmationBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    return_url: &'a str,
}

#[derive(Debug, Serialize)]
struct MetadataBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct CustomerBody<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
}

#[derive(Debug, Serialize)]
struct ReceiptItemBody<'a> {
    description: &'a str,
    quantity: &'static str,
    amount: AmountBody<'a>,
    vat_code: u8,
}

#[derive(Debug, Serialize)]
struct ReceiptBody<'a> {
    customer: CustomerBody<'a>,
    items: Vec<ReceiptItemBody<'a>>,
}

/// Body of `POST /payments`.
#[derive(Debug, Serialize)]
struct CreatePaymentBody<'a> {
    amount: AmountBody<'a>,
    capture: bool,
    confirmation: ConfirmationBody<'a>,
    description: &'a str,
    metadata: MetadataBody<'a>,
    receipt: ReceiptBody<'a>,
}

#[derive(Debug, Deserialize)]
struct ConfirmationResponse {
    confirmation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: String,
    confirmation: Option<ConfirmationResponse>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<String>,
    description: Option<String>,
}

fn build_body<'a>(config: &'a YooKassaConfig, request: &'a PaymentRequest) -> CreatePaymentBody<'a> {
    CreatePaymentBody {
        amount: AmountBody {
            value: request.amount,
            currency: &config.currency,
        },
        capture: true,
        confirmation: ConfirmationBody {
            kind: "redirect",
            return_url: &config.return_url,
        },
        description: &config.description,
        metadata: MetadataBody {
            email: &request.email,
        },
        receipt: ReceiptBody {
            customer: CustomerBody {
                full_name: &request.name,
                email: &request.email,
                phone: &request.phone,
            },
            items: vec![ReceiptItemBody {
                description: &config.description,
                quantity: "1.00",
                amount: AmountBody {
                    value: request.amount,
                    currency: &config.currency,
                },
                vat_code: config.vat_code,
            }],
        },
    }
}

/// Turns a provider response into a session or a [`PaymentError`].
fn parse_response(status: StatusCode, body: &str) -> Result<PaymentSession, PaymentError> {
    if !status.is_success() {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            code: None,
            description: None,
        });
        return Err(PaymentError::Rejected {
            status: status.as_u16(),
            code: err.code.unwrap_or_else(|| "unknown".to_string()),
            description: err
                .description
                .unwrap_or_else(|| body.chars().take(200).collect()),
        });
    }

    let payment: PaymentResponse = serde_json::from_str(body)
        .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

    let redirect_url = payment
        .confirmation
        .and_then(|c| c.confirmation_url)
        .ok_or_else(|| PaymentError::InvalidResponse("missing confirmation_url".to_string()))?;

    Ok(PaymentSession {
        redirect_url,
        payment_id: payment.id,
    })
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Timeout
    } else {
        PaymentError::Transport(e.to_string())
    }
}

/// Payment gateway backed by the YooKassa REST API.
///
/// Every call sends a fresh `Idempotence-Key`, so a repeated purchase opens a
/// new session rather than replaying the previous one.
pub struct YooKassaGateway {
    http: reqwest::Client,
    config: YooKassaConfig,
}

impl YooKassaGateway {
    /// Builds the HTTP client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(config: YooKassaConfig) -> Result<Self, PaymentError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl PaymentGateway for YooKassaGateway {
    async fn create_session(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let idempotence_key = uuid::Uuid::new_v4().to_string();
        let url = format!("{}/payments", self.config.api_url.trim_end_matches('/'));

        debug!(%idempotence_key, amount = %request.amount, "Creating payment");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.shop_id, Some(&self.config.secret_key))
            .header("Idempotence-Key", &idempotence_key)
            .json(&build_body(&self.config, &request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        let session = parse_response(status, &body)?;
        info!(payment_id = %session.payment_id, "Payment session created");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> YooKassaConfig {
        YooKassaConfig {
            api_url: "https://api.yookassa.ru/v3".to_string(),
            shop_id: "123456".to_string(),
            secret_key: "test_secret".to_string(),
            return_url: "https://course.example.com/thanks".to_string(),
            description: "Course purchase".to_string(),
            currency: "RUB".to_string(),
            vat_code: 1,
            timeout: Duration::from_secs(5),
        }
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            amount: Money::from_minor(1_500_00),
            name: "Ivan Petrov".to_string(),
            email: "ivan@example.com".to_string(),
            phone: "79991234567".to_string(),
        }
    }

    #[test]
    fn test_body_shape() {
        let config = config();
        let request = request();
        let body = serde_json::to_value(build_body(&config, &request)).unwrap();

        assert_eq!(body["amount"]["value"], "1500.00");
        assert_eq!(body["amount"]["currency"], "RUB");
        assert_eq!(body["capture"], true);
        assert_eq!(body["confirmation"]["type"], "redirect");
        assert_eq!(
            body["confirmation"]["return_url"],
            "https://course.example.com/thanks"
        );
        assert_eq!(body["metadata"]["email"], "ivan@example.com");
        assert_eq!(body["receipt"]["customer"]["phone"], "79991234567");
        assert_eq!(body["receipt"]["customer"]["full_name"], "Ivan Petrov");
        assert_eq!(body["receipt"]["items"][0]["quantity"], "1.00");
        assert_eq!(body["receipt"]["items"][0]["vat_code"], 1);
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{
            "id": "2c5d1a9e-000f-5000-9000-1b1c1d1e1f10",
            "status": "pending",
            "confirmation": {
                "type": "redirect",
                "confirmation_url": "https://yoomoney.ru/checkout/payments/v2/contract?orderId=2c5d"
            }
        }"#;

        let session = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(session.payment_id, "2c5d1a9e-000f-5000-9000-1b1c1d1e1f10");
        assert!(session.redirect_url.starts_with("https://yoomoney.ru/checkout"));
    }

    #[test]
    fn test_parse_missing_confirmation() {
        let body = r#"{ "id": "abc", "status": "pending" }"#;

        let err = parse_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{
            "type": "error",
            "id": "ab1",
            "code": "invalid_request",
            "description": "Receipt is missing or illegal"
        }"#;

        let err = parse_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        match err {
            PaymentError::Rejected {
                status,
                code,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid_request");
                assert_eq!(description, "Receipt is missing or illegal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_json_error() {
        let err = parse_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, PaymentError::Rejected { status: 502, .. }));
    }
}
