//! Request payload validation
//!
//! The payload is checked as raw JSON so that wrong types are reported as
//! validation errors instead of deserialisation failures. Each rule is an
//! independent check returning at most one [`FieldError`]. Every rule runs on
//! every payload, absent fields included, so a missing `userId` also fails the
//! length and type rules and a non-array `roles` also fails the element rule.

use crate::mapping::RoleMapping;
use crate::UserId;
use serde_json::Value;
use std::borrow::Cow;
use validator::ValidateLength;

/// Field carrying the user identifier
pub const USER_ID_FIELD: &str = "userId";

/// Field carrying the external role names
pub const ROLES_FIELD: &str = "roles";

pub const USER_ID_MIN_LEN: u64 = 1;
pub const USER_ID_MAX_LEN: u64 = 20;
pub const MAX_ROLES: u64 = 10;

/// Error messages; clients match on these exact strings.
pub mod messages {
    pub const USER_ID_MISSING: &str = "UserId is missing";
    pub const USER_ID_LENGTH: &str = "UserId must be between 1 and 20 characters";
    pub const USER_ID_NOT_STRING: &str = "UserId must be a string";
    pub const ROLES_MISSING: &str = "Roles parameter is missing";
    pub const ROLES_SHAPE: &str = "Roles must be an array with max 10 elements";
    pub const ROLES_VALUES: &str = "Roles must be an array of strings of Azure AD roles";
}

/// Validation failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required field absent
    MissingField,
    /// Wrong type, length or element count
    InvalidShape,
    /// Unrecognised role name
    InvalidValue,
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub kind: ErrorKind,
    /// Offending field name
    pub path: &'static str,
    /// Offending value; `None` when the field is absent
    pub value: Option<Value>,
    pub msg: &'static str,
}

impl FieldError {
    fn new(kind: ErrorKind, path: &'static str, value: Option<&Value>, msg: &'static str) -> Self {
        Self {
            kind,
            path,
            value: value.cloned(),
            msg,
        }
    }
}

/// A validated role update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUpdate {
    /// HTML-escaped user id, used as the store key
    pub user_id: UserId,
    /// External role names as sent, duplicates included
    pub roles: Vec<String>,
}

type Check = fn(&Value, &RoleMapping) -> Option<FieldError>;

/// Rules in reporting order
const CHECKS: &[Check] = &[
    user_id_present,
    user_id_length,
    user_id_is_string,
    roles_present,
    roles_shape,
    roles_known,
];

fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.as_object().and_then(|obj| obj.get(name))
}

fn user_id_present(payload: &Value, _: &RoleMapping) -> Option<FieldError> {
    match field(payload, USER_ID_FIELD) {
        Some(_) => None,
        None => Some(FieldError::new(
            ErrorKind::MissingField,
            USER_ID_FIELD,
            None,
            messages::USER_ID_MISSING,
        )),
    }
}

/// Text the length rule measures; an absent or `null` id counts as empty
fn user_id_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

fn user_id_length(payload: &Value, _: &RoleMapping) -> Option<FieldError> {
    let value = field(payload, USER_ID_FIELD);
    let text = user_id_text(value);
    let text: &str = &text;
    if text.validate_length(Some(USER_ID_MIN_LEN), Some(USER_ID_MAX_LEN), None) {
        None
    } else {
        Some(FieldError::new(
            ErrorKind::InvalidShape,
            USER_ID_FIELD,
            value,
            messages::USER_ID_LENGTH,
        ))
    }
}

fn user_id_is_string(payload: &Value, _: &RoleMapping) -> Option<FieldError> {
    let value = field(payload, USER_ID_FIELD);
    if value.is_some_and(Value::is_string) {
        None
    } else {
        Some(FieldError::new(
            ErrorKind::InvalidShape,
            USER_ID_FIELD,
            value,
            messages::USER_ID_NOT_STRING,
        ))
    }
}

fn roles_present(payload: &Value, _: &RoleMapping) -> Option<FieldError> {
    match field(payload, ROLES_FIELD) {
        Some(_) => None,
        None => Some(FieldError::new(
            ErrorKind::MissingField,
            ROLES_FIELD,
            None,
            messages::ROLES_MISSING,
        )),
    }
}

fn roles_shape(payload: &Value, _: &RoleMapping) -> Option<FieldError> {
    let value = field(payload, ROLES_FIELD);
    let within_bounds = value
        .and_then(Value::as_array)
        .is_some_and(|roles| roles.validate_length(None, Some(MAX_ROLES), None));
    if within_bounds {
        None
    } else {
        Some(FieldError::new(
            ErrorKind::InvalidShape,
            ROLES_FIELD,
            value,
            messages::ROLES_SHAPE,
        ))
    }
}

fn roles_known(payload: &Value, mapping: &RoleMapping) -> Option<FieldError> {
    let value = field(payload, ROLES_FIELD);
    let all_known = value.and_then(Value::as_array).is_some_and(|roles| {
        roles
            .iter()
            .all(|role| role.as_str().is_some_and(|name| mapping.contains(name)))
    });
    if all_known {
        None
    } else {
        Some(FieldError::new(
            ErrorKind::InvalidValue,
            ROLES_FIELD,
            value,
            messages::ROLES_VALUES,
        ))
    }
}

/// Run every rule against the payload and collect the failures
pub fn validate(payload: &Value, mapping: &RoleMapping) -> Vec<FieldError> {
    CHECKS
        .iter()
        .filter_map(|check| check(payload, mapping))
        .collect()
}

/// Validate the payload and extract the update it describes
pub fn validate_update(
    payload: &Value,
    mapping: &RoleMapping,
) -> std::result::Result<RoleUpdate, Vec<FieldError>> {
    let errors = validate(payload, mapping);
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "role update payload rejected");
        return Err(errors);
    }

    // Both fields are known to be well-formed past this point.
    let user_id = field(payload, USER_ID_FIELD)
        .and_then(Value::as_str)
        .map(escape)
        .unwrap_or_default();
    let roles = field(payload, ROLES_FIELD)
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(|r| r.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Ok(RoleUpdate { user_id, roles })
}

/// HTML-escape a string so it can never carry markup.
///
/// Uses the same table as validator.js `escape()`: `& " ' < > / \` and the
/// backtick.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages_of(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.msg).collect()
    }

    #[test]
    fn test_valid_payload() {
        let mapping = RoleMapping::default();
        let payload = json!({
            "userId": "257684345692",
            "roles": ["001 - Admin", "003 - Warehouse Personnel", "001 - Admin"]
        });

        assert!(validate(&payload, &mapping).is_empty());

        let update = validate_update(&payload, &mapping).unwrap();
        assert_eq!(update.user_id, "257684345692");
        assert_eq!(update.roles.len(), 3);
    }

    #[test]
    fn test_empty_roles_is_valid() {
        let mapping = RoleMapping::default();
        let payload = json!({ "userId": "257684345692", "roles": [] });
        let update = validate_update(&payload, &mapping).unwrap();
        assert!(update.roles.is_empty());
    }

    #[test]
    fn test_missing_user_id() {
        let errors = validate(&json!({ "roles": [] }), &RoleMapping::default());
        assert_eq!(
            messages_of(&errors),
            vec![
                messages::USER_ID_MISSING,
                messages::USER_ID_LENGTH,
                messages::USER_ID_NOT_STRING,
            ]
        );
        assert_eq!(errors[0].kind, ErrorKind::MissingField);
        assert!(errors.iter().all(|e| e.path == "userId" && e.value.is_none()));
    }

    #[test]
    fn test_user_id_length_bounds() {
        let mapping = RoleMapping::default();

        let errors = validate(&json!({ "userId": "", "roles": [] }), &mapping);
        assert_eq!(messages_of(&errors), vec![messages::USER_ID_LENGTH]);

        let errors = validate(&json!({ "userId": "x".repeat(21), "roles": [] }), &mapping);
        assert_eq!(messages_of(&errors), vec![messages::USER_ID_LENGTH]);

        let errors = validate(&json!({ "userId": "x".repeat(20), "roles": [] }), &mapping);
        assert!(errors.is_empty());

        // counted in characters, not bytes
        let errors = validate(&json!({ "userId": "é".repeat(20), "roles": [] }), &mapping);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_non_string_user_id() {
        let mapping = RoleMapping::default();

        let errors = validate(&json!({ "userId": 382563285125u64, "roles": [] }), &mapping);
        assert_eq!(messages_of(&errors), vec![messages::USER_ID_NOT_STRING]);
        assert_eq!(errors[0].value, Some(json!(382563285125u64)));

        // null is present but measures as empty
        let errors = validate(&json!({ "userId": null, "roles": [] }), &mapping);
        assert_eq!(
            messages_of(&errors),
            vec![messages::USER_ID_LENGTH, messages::USER_ID_NOT_STRING]
        );

    }

    #[test]
    fn test_missing_roles() {
        let errors = validate(&json!({ "userId": "382563285125" }), &RoleMapping::default());
        assert_eq!(
            messages_of(&errors),
            vec![
                messages::ROLES_MISSING,
                messages::ROLES_SHAPE,
                messages::ROLES_VALUES,
            ]
        );
        assert_eq!(errors[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_roles_not_an_array() {
        let mapping = RoleMapping::default();
        for roles in [json!({}), json!("001 - Admin"), json!(7), json!(null)] {
            let errors = validate(&json!({ "userId": "382563285125", "roles": roles }), &mapping);
            assert_eq!(
                messages_of(&errors),
                vec![messages::ROLES_SHAPE, messages::ROLES_VALUES]
            );
            assert_eq!(errors[0].kind, ErrorKind::InvalidShape);
            assert_eq!(errors[1].kind, ErrorKind::InvalidValue);
        }
    }

    #[test]
    fn test_too_many_roles() {
        let mapping = RoleMapping::default();

        let roles = vec!["001 - Admin"; 11];
        let errors = validate(&json!({ "userId": "382563285125", "roles": roles }), &mapping);
        assert_eq!(messages_of(&errors), vec![messages::ROLES_SHAPE]);

        let roles = vec!["001 - Admin"; 10];
        let errors = validate(&json!({ "userId": "382563285125", "roles": roles }), &mapping);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_roles_must_be_known_strings() {
        let mapping = RoleMapping::default();

        let errors = validate(&json!({ "userId": "382563285125", "roles": [123, 124] }), &mapping);
        assert_eq!(messages_of(&errors), vec![messages::ROLES_VALUES]);
        assert_eq!(errors[0].kind, ErrorKind::InvalidValue);

        let errors = validate(
            &json!({ "userId": "382563285125", "roles": ["001 - Admin", "BC_ADMIN"] }),
            &mapping,
        );
        assert_eq!(messages_of(&errors), vec![messages::ROLES_VALUES]);
    }

    #[test]
    fn test_all_violations_reported() {
        let mapping = RoleMapping::default();
        let mut roles = vec![json!("999 - Unknown")];
        roles.extend(std::iter::repeat(json!("001 - Admin")).take(11));

        let errors = validate(&json!({ "userId": 42, "roles": roles }), &mapping);
        assert_eq!(
            messages_of(&errors),
            vec![
                messages::USER_ID_NOT_STRING,
                messages::ROLES_SHAPE,
                messages::ROLES_VALUES,
            ]
        );

        let errors = validate(&json!([]), &mapping);
        assert_eq!(
            messages_of(&errors),
            vec![
                messages::USER_ID_MISSING,
                messages::USER_ID_LENGTH,
                messages::USER_ID_NOT_STRING,
                messages::ROLES_MISSING,
                messages::ROLES_SHAPE,
                messages::ROLES_VALUES,
            ]
        );
    }

    #[test]
    fn test_user_id_is_escaped() {
        let mapping = RoleMapping::default();
        let payload = json!({ "userId": "<b>o'neil</b>", "roles": [] });
        let update = validate_update(&payload, &mapping).unwrap();
        assert_eq!(update.user_id, "&lt;b&gt;o&#x27;neil&lt;&#x2F;b&gt;");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain-id_123"), "plain-id_123");
        assert_eq!(escape(r#"a&b"c\d`e"#), "a&amp;b&quot;c&#x5C;d&#96;e");
        assert_eq!(
            escape(r#"&"'<>/\`"#),
            "&amp;&quot;&#x27;&lt;&gt;&#x2F;&#x5C;&#96;"
        );
        assert_eq!(escape("é/é"), "é&#x2F;é");
    }
}
