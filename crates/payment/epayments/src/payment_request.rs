use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    amount::Amount,
    credentials::Credentials,
    hash::{compute_integrity_hash, HashFields},
};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Payment method preselected on the payment page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gateway {
    Card,
    Wallet,
}

impl Gateway {
    pub fn id(self) -> u8 {
        match self {
            Gateway::Card => 1,
            Gateway::Wallet => 2,
        }
    }
}

impl From<Gateway> for u8 {
    fn from(value: Gateway) -> Self {
        value.id()
    }
}

impl TryFrom<u8> for Gateway {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gateway::Card),
            2 => Ok(Gateway::Wallet),
            other => Err(format!("Unknown gateway id: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[strum(serialize = "En")]
    En,
    #[strum(serialize = "Ru")]
    Ru,
    #[strum(serialize = "ES")]
    Es,
}

/// One checkout attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    order_number: String,
    order_name: String,
    order_sum_amount: Amount,
    order_sum_currency: String,
    gateway: Option<Gateway>,
    language: Option<Language>,
    operation_life_time: Option<u32>,
    shop_success_url: Option<String>,
    shop_fail_url: Option<String>,
    shop_default_url: Option<String>,
}

impl PaymentRequest {
    pub fn new(
        order_number: impl Into<String>,
        order_name: impl Into<String>,
        order_sum_amount: impl Into<Amount>,
    ) -> Self {
        PaymentRequest {
            order_number: order_number.into(),
            order_name: order_name.into(),
            order_sum_amount: order_sum_amount.into(),
            order_sum_currency: DEFAULT_CURRENCY.to_owned(),
            gateway: None,
            language: None,
            operation_life_time: None,
            shop_success_url: None,
            shop_fail_url: None,
            shop_default_url: None,
        }
    }

    /// Three letter ISO-4217 code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.order_sum_currency = currency.into();
        self
    }

    pub fn with_gateway(mut self, gateway: Gateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Lifetime of the payment link in minutes. The gateway accepts 1..=4320.
    pub fn with_operation_life_time(mut self, minutes: u32) -> Self {
        self.operation_life_time = Some(minutes);
        self
    }

    pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
        self.shop_success_url = Some(url.into());
        self
    }

    pub fn with_fail_url(mut self, url: impl Into<String>) -> Self {
        self.shop_fail_url = Some(url.into());
        self
    }

    /// Target of the "back to shop" button.
    pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
        self.shop_default_url = Some(url.into());
        self
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn order_name(&self) -> &str {
        &self.order_name
    }

    pub fn amount(&self) -> Amount {
        self.order_sum_amount
    }

    pub fn currency(&self) -> &str {
        &self.order_sum_currency
    }

    pub fn gateway(&self) -> Option<Gateway> {
        self.gateway
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn operation_life_time(&self) -> Option<u32> {
        self.operation_life_time
    }

    pub fn shop_success_url(&self) -> Option<&str> {
        self.shop_success_url.as_deref()
    }

    pub fn shop_fail_url(&self) -> Option<&str> {
        self.shop_fail_url.as_deref()
    }

    pub fn shop_default_url(&self) -> Option<&str> {
        self.shop_default_url.as_deref()
    }

    pub fn integrity_hash(&self, credentials: &Credentials) -> String {
        compute_integrity_hash(&HashFields {
            shop_id: credentials.shop_id(),
            secret_key: credentials.secret_key(),
            order_number: &self.order_number,
            amount: self.order_sum_amount,
            currency: &self.order_sum_currency,
        })
    }

    /// Query of the payment page request. Unset optional attributes are left out.
    pub fn query_pairs(&self, credentials: &Credentials) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("shopId", credentials.shop_id().to_string()),
            ("orderNumber", self.order_number.clone()),
            ("orderSumAmount", self.order_sum_amount.to_string()),
            ("orderSumCurrency", self.order_sum_currency.clone()),
            ("orderName", self.order_name.clone()),
            ("sha512", self.integrity_hash(credentials)),
        ];

        let optional = [
            ("gatewayId", self.gateway.map(|g| g.id().to_string())),
            ("shopSuccessUrl", self.shop_success_url.clone()),
            ("shopFailUrl", self.shop_fail_url.clone()),
            ("shopDefaultUrl", self.shop_default_url.clone()),
            ("language", self.language.map(|l| l.to_string())),
            (
                "operationLifeTime",
                self.operation_life_time.map(|m| m.to_string()),
            ),
        ];
        query.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value))),
        );
        query
    }
}
