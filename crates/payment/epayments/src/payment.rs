use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// {
//   "result": {
//     "urlToRedirect": "https://test-ms.epayments.com/paymentpage/..."
//   }
// }
//
// {
//   "error": {
//     "code": 2002019,
//     "messages": ["Invalid orderSumAmount"]
//   }
// }
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PaymentPageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PaymentPageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PaymentPageResult {
    #[serde(rename = "urlToRedirect", skip_serializing_if = "Option::is_none")]
    pub url_to_redirect: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentPageResponse {
    pub fn url_to_redirect(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.url_to_redirect.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn error_messages(&self) -> Option<Vec<String>> {
        self.error.as_ref().map(error_messages)
    }
}

// {
//   "result": {
//     "operations": [
//       { "id": 42, "state": "Done", "orderNumber": "ORD-1", ... }
//     ]
//   }
// }
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OperationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(rename = "orderNumber", skip_serializing_if = "Option::is_none")]
    pub order_number: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Field types are compared strictly: an id sent as "42" is not the id 42.
impl Operation {
    pub fn id(&self) -> Option<i64> {
        self.id.as_ref().and_then(Value::as_i64)
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_ref().and_then(Value::as_str)
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_ref().and_then(Value::as_str)
    }
}

impl OperationResponse {
    /// Typed view of a gateway body. An object whose `result` has an
    /// unexpected shape is kept as is in `extra`.
    pub fn from_value(body: Value) -> Option<OperationResponse> {
        let Value::Object(mut fields) = body else {
            return None;
        };
        if let Ok(response) = serde_json::from_value(Value::Object(fields.clone())) {
            return Some(response);
        }
        let error = fields.remove("error").filter(|e| !e.is_null());
        Some(OperationResponse {
            result: None,
            error,
            extra: fields,
        })
    }

    pub fn first_operation(&self) -> Option<&Operation> {
        self.result
            .as_ref()
            .and_then(|r| r.operations.as_ref())
            .and_then(|operations| operations.first())
    }

    pub fn error_messages(&self) -> Option<Vec<String>> {
        self.error.as_ref().map(error_messages)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Texts of an `error` envelope. Accepts `{"messages": [..]}`, `{"message": ..}`
/// or a bare string.
pub fn error_messages(error: &Value) -> Vec<String> {
    match error {
        Value::String(message) => vec![message.clone()],
        Value::Object(fields) => {
            if let Some(Value::Array(messages)) = fields.get("messages") {
                messages
                    .iter()
                    .map(|m| match m {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            } else if let Some(Value::String(message)) = fields.get("message") {
                vec![message.clone()]
            } else {
                vec![error.to_string()]
            }
        }
        other => vec![other.to_string()],
    }
}
