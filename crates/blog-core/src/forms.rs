//! Typed reader-facing forms and their validation.
//!
//! A submitted form is normalized with [`Form::clean`] and validated into a
//! [`BoundForm`]. Invalid input is not an error: the bound form carries
//! field-keyed messages that are rendered next to the inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Field name -> human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Maximum accepted length of a search query, in characters.
pub const MAX_QUERY_LEN: usize = 200;

/// [`MAX_QUERY_LEN`] as the `u64` the `validator` length rule expects.
const MAX_QUERY_LEN_U64: u64 = MAX_QUERY_LEN as u64;

/// A validatable form.
pub trait Form: Validate {
    /// Normalize raw input before validation.
    fn clean(self) -> Self;
}

/// Validate `form`, collecting messages per field. Empty means valid.
pub fn validate_form<F: Validate>(form: &F) -> FieldErrors {
    let Err(errors) = form.validate() else {
        return FieldErrors::new();
    };

    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors.iter().map(message_for).collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn message_for(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

/// A form together with the outcome of validating it.
#[derive(Debug, Clone, Serialize)]
pub struct BoundForm<F> {
    pub data: F,
    pub errors: FieldErrors,
}

impl<F: Form> BoundForm<F> {
    pub fn bind(data: F) -> Self {
        let data = data.clean();
        let errors = validate_form(&data);
        Self { data, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<F: Default> BoundForm<F> {
    /// A blank form, as rendered before any submission.
    pub fn unbound() -> Self {
        Self {
            data: F::default(),
            errors: FieldErrors::new(),
        }
    }
}

/// "Email this post to a friend" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(length(
        min = 1,
        max = 25,
        message = "Name is required and must be at most 25 characters."
    ))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub to: String,

    /// Optional note appended to the message.
    pub comments: String,
}

impl Form for EmailPostForm {
    fn clean(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        }
    }
}

/// Reader comment form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(
        min = 1,
        max = 80,
        message = "Name is required and must be at most 80 characters."
    ))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl Form for CommentForm {
    fn clean(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}

/// Full-text search form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(length(
        min = 1,
        max = MAX_QUERY_LEN_U64,
        message = "Enter a search query of at most 200 characters."
    ))]
    pub query: String,
}

impl Form for SearchForm {
    fn clean(self) -> Self {
        Self {
            query: self.query.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_form(name: &str, email: &str, to: &str) -> EmailPostForm {
        EmailPostForm {
            name: name.to_string(),
            email: email.to_string(),
            to: to.to_string(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_valid_share_form() {
        let form = BoundForm::bind(share_form("Ann", "ann@example.com", "bob@example.com"));
        assert!(form.is_valid());
    }

    #[test]
    fn test_share_form_reports_each_bad_field() {
        let form = BoundForm::bind(share_form("", "not-an-email", "bob@example.com"));

        assert!(!form.is_valid());
        assert!(form.errors.contains_key("name"));
        assert!(form.errors.contains_key("email"));
        assert!(!form.errors.contains_key("to"));
        assert_eq!(
            form.errors["email"],
            vec!["Enter a valid email address.".to_string()]
        );
    }

    #[test]
    fn test_share_form_name_length_limit() {
        let long_name = "x".repeat(26);
        let form = BoundForm::bind(share_form(&long_name, "a@example.com", "b@example.com"));
        assert!(form.errors.contains_key("name"));
    }

    #[test]
    fn test_whitespace_only_name_is_rejected() {
        let form = BoundForm::bind(CommentForm {
            name: "   ".to_string(),
            email: "ann@example.com".to_string(),
            body: "Nice post".to_string(),
        });

        assert!(!form.is_valid());
        assert_eq!(form.data.name, "");
        assert!(form.errors.contains_key("name"));
    }

    #[test]
    fn test_comment_form_requires_body() {
        let form = BoundForm::bind(CommentForm {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            body: String::new(),
        });
        assert_eq!(form.errors.keys().collect::<Vec<_>>(), vec!["body"]);
    }

    #[test]
    fn test_search_form_bounds() {
        assert!(!BoundForm::bind(SearchForm::default()).is_valid());
        assert!(BoundForm::bind(SearchForm { query: "rust".into() }).is_valid());

        let too_long = SearchForm {
            query: "q".repeat(MAX_QUERY_LEN + 1),
        };
        assert!(!BoundForm::bind(too_long).is_valid());
    }

    #[test]
    fn test_unbound_form_is_blank() {
        let form: BoundForm<CommentForm> = BoundForm::unbound();
        assert!(form.errors.is_empty());
        assert!(form.data.name.is_empty());
    }
}
