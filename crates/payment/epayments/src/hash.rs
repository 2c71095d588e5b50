use sha2::{Digest, Sha512};

use crate::amount::Amount;

const SEPARATOR: &str = ";";

/// Attributes bound by the `sha512` parameter of the payment page request.
#[derive(Clone, Copy)]
pub struct HashFields<'a> {
    pub shop_id: i64,
    pub secret_key: &'a str,
    pub order_number: &'a str,
    pub amount: Amount,
    pub currency: &'a str,
}

/// SHA-512 hex digest of `shopId;secretKey;orderNumber;orderSumAmount;orderSumCurrency`.
pub fn compute_integrity_hash(fields: &HashFields) -> String {
    let data = [
        fields.shop_id.to_string(),
        fields.secret_key.to_owned(),
        fields.order_number.to_owned(),
        fields.amount.to_string(),
        fields.currency.to_owned(),
    ]
    .join(SEPARATOR);

    let mut hasher = Sha512::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
