//! Inbound request validation and normalization.
//!
//! Both validators take the raw JSON body and never panic on malformed input.
//! Fields are checked in declaration order and the first violated rule is
//! reported; later fields are not inspected.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Smallest accepted order amount, in rupees.
pub const MIN_ORDER_AMOUNT: i64 = 1;

/// Largest accepted order amount, in rupees.
pub const MAX_ORDER_AMOUNT: i64 = 1_000_000;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const COUNTRY_CODE: &str = "+91";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern compiles"));

/// A validated, normalized order-creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Major currency units. No conversion to paise happens anywhere.
    pub amount: Decimal,
    /// Trimmed.
    pub customer_name: String,
    /// Trimmed and lowercased.
    pub customer_email: String,
    /// Ten digits, country code and separators removed.
    pub customer_phone: String,
    pub course_id: Option<String>,
}

impl OrderRequest {
    /// Validates a raw create-order body.
    ///
    /// Expected shape:
    /// `{order_amount, customer_name, customer_email, customer_phone, course_id?}`
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = body
            .as_object()
            .ok_or_else(|| ValidationError::rule("body", "Request body must be a JSON object"))?;

        let amount = parse_amount(fields.get("order_amount"))?;
        let customer_name = parse_name(fields.get("customer_name"))?;
        let customer_email = parse_email(fields.get("customer_email"))?;
        let customer_phone = parse_phone(fields.get("customer_phone"))?;
        let course_id = parse_course_id(fields.get("course_id"))?;

        Ok(Self {
            amount,
            customer_name,
            customer_email,
            customer_phone,
            course_id,
        })
    }

    /// Phone number safe for logs, e.g. `98******10`.
    pub fn masked_phone(&self) -> String {
        mask_phone(&self.customer_phone)
    }

    /// Only the part after `@`; the local part is never logged.
    pub fn email_domain(&self) -> &str {
        self.customer_email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("-")
    }
}

/// A validated order-verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOrderRequest {
    pub order_id: String,
}

impl VerifyOrderRequest {
    /// Validates a raw verify-order body: `{orderId}`.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let order_id = body
            .get("orderId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ValidationError::rule("orderId", "Order ID is required"))?;

        Ok(Self {
            order_id: order_id.to_string(),
        })
    }
}

/// Removes whitespace, hyphens and a leading `+91`.
///
/// Does not validate; see [`OrderRequest::from_json`].
pub fn normalize_phone(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    match compact.strip_prefix(COUNTRY_CODE) {
        Some(rest) => rest.to_string(),
        None => compact,
    }
}

/// Keeps the first and last two digits of a phone number.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

fn parse_amount(value: Option<&Value>) -> Result<Decimal, ValidationError> {
    let number = match value {
        None | Some(Value::Null) => {
            return Err(ValidationError::rule("order_amount", "Amount is required"))
        }
        Some(Value::Number(number)) => number,
        Some(_) => {
            return Err(ValidationError::rule(
                "order_amount",
                "Amount must be a number",
            ))
        }
    };

    let min = Decimal::from(MIN_ORDER_AMOUNT);
    let max = Decimal::from(MAX_ORDER_AMOUNT);
    let below_min = || ValidationError::rule("order_amount", "Minimum amount is ₹1");
    let above_max = || ValidationError::rule("order_amount", "Maximum amount is ₹10,00,000");

    let raw = number.to_string();
    let amount = match Decimal::from_str(&raw).or_else(|_| Decimal::from_scientific(&raw)) {
        Ok(amount) => amount,
        // Only magnitudes far outside the accepted range fail to parse.
        Err(_) => {
            return Err(match number.as_f64() {
                Some(f) if f > 0.0 => above_max(),
                _ => below_min(),
            })
        }
    };

    if amount < min {
        return Err(below_min());
    }
    if amount > max {
        return Err(above_max());
    }
    Ok(amount.normalize())
}

fn parse_name(value: Option<&Value>) -> Result<String, ValidationError> {
    let name = value
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::rule("customer_name", "Name is required"))?
        .trim();

    let length = name.chars().count();
    if length < NAME_MIN_CHARS {
        return Err(ValidationError::rule(
            "customer_name",
            "Name must be at least 2 characters",
        ));
    }
    if length > NAME_MAX_CHARS {
        return Err(ValidationError::rule(
            "customer_name",
            "Name must be at most 100 characters",
        ));
    }
    Ok(name.to_string())
}

fn parse_email(value: Option<&Value>) -> Result<String, ValidationError> {
    let email = value
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::rule("customer_email", "Email is required"))?
        .trim()
        .to_lowercase();

    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::rule(
            "customer_email",
            "Invalid email address",
        ));
    }
    Ok(email)
}

fn parse_phone(value: Option<&Value>) -> Result<String, ValidationError> {
    let raw = value
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::rule("customer_phone", "Phone number is required"))?;

    let phone = normalize_phone(raw);
    if !MOBILE_PATTERN.is_match(&phone) {
        return Err(ValidationError::rule(
            "customer_phone",
            "Invalid phone number. Enter a 10-digit Indian mobile number",
        ));
    }
    Ok(phone)
}

fn parse_course_id(value: Option<&Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => {
            let id = id.trim();
            Ok((!id.is_empty()).then(|| id.to_string()))
        }
        Some(_) => Err(ValidationError::rule(
            "course_id",
            "Course ID must be a string",
        )),
    }
}
