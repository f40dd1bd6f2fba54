//! Input validation
//!
//! Checks run before any service call. Services themselves trust their
//! callers.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::orders::PaymentMethod;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[0-9]{9}$").expect("valid phone pattern"));

/// A field failed validation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Please enter your email")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter your phone number")]
    MissingPhone,

    #[error("Please enter a valid phone number (01XXXXXXXXX)")]
    InvalidPhone,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter delivery address")]
    MissingAddress,

    #[error("Please enter {} transaction ID", .0.label())]
    MissingTransactionId(PaymentMethod),
}

/// Sign-in form.
#[derive(Debug, Clone, Copy)]
pub struct SignInForm<'a> {
    /// Account email
    pub email: &'a str,

    /// Account password
    pub password: &'a str,
}

impl SignInForm<'_> {
    /// Check email and password.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(self.email)?;
        validate_password(self.password)
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Copy)]
pub struct SignUpForm<'a> {
    /// Display name
    pub name: &'a str,

    /// Account email
    pub email: &'a str,

    /// Mobile number, `01XXXXXXXXX`
    pub phone: &'a str,

    /// Chosen password
    pub password: &'a str,

    /// Repeated password
    pub confirm_password: &'a str,
}

impl SignUpForm<'_> {
    /// Check every field, in the order the form shows them.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(self.email)?;
        validate_password(self.password)?;

        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }

        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }

        if !PHONE.is_match(self.phone) {
            return Err(ValidationError::InvalidPhone);
        }

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(())
    }
}

/// Customer and payment details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Recipient name
    pub customer_name: String,

    /// Recipient phone
    pub customer_phone: String,

    /// Where to deliver
    pub delivery_address: String,

    /// How the customer pays
    pub payment_method: PaymentMethod,

    /// Wallet transaction id, required for bKash and Nagad
    pub transaction_id: Option<String>,
}

impl CheckoutDetails {
    /// Check the checkout form.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }

        if self.customer_phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }

        if self.delivery_address.trim().is_empty() {
            return Err(ValidationError::MissingAddress);
        }

        if self.payment_method.requires_transaction_id() && self.transaction_id().is_none() {
            return Err(ValidationError::MissingTransactionId(self.payment_method));
        }

        Ok(())
    }

    /// Trimmed transaction id, `None` when blank.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    if !EMAIL.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::MissingPassword);
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up() -> SignUpForm<'static> {
        SignUpForm {
            name: "Rahim Uddin",
            email: "rahim@example.com",
            phone: "01712345678",
            password: "secret1",
            confirm_password: "secret1",
        }
    }

    fn checkout() -> CheckoutDetails {
        CheckoutDetails {
            customer_name: "Rahim".to_string(),
            customer_phone: "01712345678".to_string(),
            delivery_address: "Mirpur 10".to_string(),
            payment_method: PaymentMethod::Cash,
            transaction_id: None,
        }
    }

    #[test]
    fn valid_sign_up_passes() {
        assert_eq!(sign_up().validate(), Ok(()));
    }

    #[test]
    fn sign_in_rejects_bad_email_and_short_password() {
        let bad_email = SignInForm {
            email: "rahim@example",
            password: "secret1",
        };
        let short_password = SignInForm {
            email: "rahim@example.com",
            password: "abc",
        };

        assert_eq!(bad_email.validate(), Err(ValidationError::InvalidEmail));
        assert_eq!(short_password.validate(), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn sign_up_checks_phone_format() {
        for phone in ["0171234567", "02712345678", "01712345678x"] {
            let form = SignUpForm { phone, ..sign_up() };

            assert_eq!(form.validate(), Err(ValidationError::InvalidPhone), "{phone}");
        }
    }

    #[test]
    fn sign_up_requires_matching_passwords() {
        let form = SignUpForm {
            confirm_password: "secret2",
            ..sign_up()
        };

        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn checkout_requires_address() {
        let details = CheckoutDetails {
            delivery_address: "   ".to_string(),
            ..checkout()
        };

        assert_eq!(details.validate(), Err(ValidationError::MissingAddress));
    }

    #[test]
    fn wallet_payments_need_transaction_id() {
        let details = CheckoutDetails {
            payment_method: PaymentMethod::Bkash,
            transaction_id: Some("  ".to_string()),
            ..checkout()
        };

        assert_eq!(
            details.validate(),
            Err(ValidationError::MissingTransactionId(PaymentMethod::Bkash))
        );
        assert_eq!(
            ValidationError::MissingTransactionId(PaymentMethod::Bkash).to_string(),
            "Please enter bKash transaction ID"
        );
    }

    #[test]
    fn cash_ignores_blank_transaction_id() {
        let details = CheckoutDetails {
            transaction_id: Some(String::new()),
            ..checkout()
        };

        assert_eq!(details.validate(), Ok(()));
        assert_eq!(details.transaction_id(), None);
    }
}
