//! Checkout form and its validation.

use quickcart_core::{DeliveryTier, Email, PaymentMethod};
use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::models::User;

/// City filled in whenever a delivery location is known.
pub const DEFAULT_CITY: &str = "Bengaluru";

/// Postal code filled in whenever a delivery location is known.
pub const DEFAULT_POSTAL_CODE: &str = "560001";

/// Contact, address and payment details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub delivery: DeliveryTier,
    pub payment: PaymentMethod,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub card_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub card_expiry: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub card_cvv: String,
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }
}

impl CheckoutForm {
    /// Form as first shown: address from the delivery location, contact
    /// details from the signed-in user.
    #[must_use]
    pub fn prefill(location: Option<&Location>, user: Option<&User>) -> Self {
        let mut form = Self::default();
        if let Some(location) = location {
            form.address.clone_from(&location.full_address);
            form.city = DEFAULT_CITY.to_owned();
            form.postal_code = DEFAULT_POSTAL_CODE.to_owned();
        }
        if let Some(user) = user {
            form.name.clone_from(&user.name);
            form.email = user.email.to_string();
            if let Some(phone) = &user.phone {
                form.phone.clone_from(phone);
            }
        }
        form
    }

    /// Every problem with the form, in field order. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field));
            } else if field == "email" {
                if let Err(err) = Email::parse(value) {
                    errors.push(FieldError {
                        field,
                        message: err.to_string(),
                    });
                }
            }
        }

        if self.payment == PaymentMethod::Card {
            let card = [
                ("card_number", &self.card_number),
                ("card_expiry", &self.card_expiry),
                ("card_cvv", &self.card_cvv),
            ];
            for (field, value) in card {
                if value.trim().is_empty() {
                    errors.push(FieldError::required(field));
                }
            }
        }

        errors
    }

    /// Address block shown on the confirmation.
    #[must_use]
    pub fn delivery_address(&self) -> String {
        format!("{}, {} {}", self.address.trim(), self.city.trim(), self.postal_code.trim())
    }
}
