//! Declarative updates: shape validation and dispatch to the path engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{BatchError, UpdateError};
use crate::core::lookup::TagLookup;
use crate::core::path::set_field_with;
use crate::core::record::Record;
use crate::core::value::Value;

/// Update action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Set,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Set => "set",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UpdateError;

    /// Parse an action name. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Action::Set),
            "delete" => Ok(Action::Delete),
            other => Err(UpdateError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

/// One declarative mutation, as received from a caller.
///
/// `action` stays a plain string so that malformed input survives
/// deserialization and is rejected by [`Update::validate`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Dot-separated tag path of the target field.
    pub field: String,
    pub action: String,
    /// Payload for `set`. Ignored by `delete`.
    #[serde(default)]
    pub value: Value,
}

impl Update {
    pub fn new(
        field: impl Into<String>,
        action: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            action: action.into(),
            value: value.into(),
        }
    }

    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Action::Set.as_str(), value)
    }

    pub fn delete(field: impl Into<String>) -> Self {
        Self::new(field, Action::Delete.as_str(), Value::Null)
    }

    /// Check the update's shape, trimming `field` in place.
    ///
    /// Must run before [`Update::apply`]. Calling it again is harmless.
    pub fn validate(&mut self) -> Result<(), UpdateError> {
        let trimmed = self.field.trim();
        if trimmed.len() != self.field.len() {
            self.field = trimmed.to_string();
        }
        if self.field.is_empty() {
            return Err(UpdateError::invalid_update("field cannot be empty"));
        }
        if self.action.parse::<Action>().is_err() {
            return Err(UpdateError::invalid_update(format!(
                "invalid action '{}'",
                self.action
            )));
        }
        Ok(())
    }

    /// Typed operation for this update's action.
    pub fn operation(&self) -> Result<Operation, UpdateError> {
        Ok(match self.action.parse::<Action>()? {
            Action::Set => Operation::Set(self.value.clone()),
            Action::Delete => Operation::Delete,
        })
    }

    /// Apply to `record` using the default tag namespaces.
    pub fn apply(&self, record: &mut dyn Record) -> Result<(), UpdateError> {
        self.apply_with(&TagLookup::default(), record)
    }

    /// Apply to `record`, resolving path segments with `lookup`.
    ///
    /// `delete` assigns `Null`, which every field type maps to its zero
    /// representation; it does not remove anything structurally.
    pub fn apply_with(
        &self,
        lookup: &TagLookup,
        record: &mut dyn Record,
    ) -> Result<(), UpdateError> {
        let operation = self.operation()?;
        debug!(
            field = %self.field,
            action = %self.action,
            record = record.type_name(),
            "applying update"
        );
        operation.apply_at(lookup, record, &self.field)
    }

    /// Validate and convert into the checked, typed form.
    pub fn into_mutation(mut self) -> Result<Mutation, UpdateError> {
        self.validate()?;
        let operation = self.operation()?;
        Ok(Mutation {
            path: self.field,
            operation,
        })
    }
}

/// Typed counterpart of an update's action and value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Set(Value),
    Delete,
}

impl Operation {
    pub fn action(&self) -> Action {
        match self {
            Operation::Set(_) => Action::Set,
            Operation::Delete => Action::Delete,
        }
    }

    /// Value the engine assigns for this operation.
    pub fn value(&self) -> Value {
        match self {
            Operation::Set(value) => value.clone(),
            Operation::Delete => Value::Null,
        }
    }

    fn apply_at(
        &self,
        lookup: &TagLookup,
        record: &mut dyn Record,
        path: &str,
    ) -> Result<(), UpdateError> {
        set_field_with(lookup, record, path, self.value())
    }
}

/// A validated update: trimmed path plus typed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub path: String,
    pub operation: Operation,
}

impl Mutation {
    pub fn apply(&self, record: &mut dyn Record) -> Result<(), UpdateError> {
        self.apply_with(&TagLookup::default(), record)
    }

    pub fn apply_with(
        &self,
        lookup: &TagLookup,
        record: &mut dyn Record,
    ) -> Result<(), UpdateError> {
        debug!(field = %self.path, action = %self.operation.action(), "applying mutation");
        self.operation.apply_at(lookup, record, &self.path)
    }
}

/// Validate then apply `updates` in order, using the default tag namespaces.
pub fn apply_all(updates: &mut [Update], record: &mut dyn Record) -> Result<(), BatchError> {
    apply_all_with(&TagLookup::default(), updates, record)
}

/// Validate every update, then apply them in order.
///
/// A malformed update aborts before anything is applied. After that the
/// first failing update stops the batch; updates before it stay applied.
pub fn apply_all_with(
    lookup: &TagLookup,
    updates: &mut [Update],
    record: &mut dyn Record,
) -> Result<(), BatchError> {
    for (index, update) in updates.iter_mut().enumerate() {
        update.validate().map_err(|source| BatchError {
            index,
            field: update.field.clone(),
            source,
        })?;
    }

    for (index, update) in updates.iter().enumerate() {
        update.apply_with(lookup, record).map_err(|source| BatchError {
            index,
            field: update.field.clone(),
            source,
        })?;
    }
    debug!(count = updates.len(), "batch applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Account, Profile};

    #[test]
    fn validate_trims_field_in_place() {
        let mut update = Update::set("  profile.name \t", "Ada");
        update.validate().expect("valid");
        assert_eq!(update.field, "profile.name");

        update.validate().expect("still valid");
        assert_eq!(update.field, "profile.name");
    }

    #[test]
    fn validate_rejects_blank_field() {
        for field in ["", "   ", "\n\t"] {
            let mut update = Update::set(field, 1);
            let err = update.validate().expect_err("blank field");
            assert!(matches!(err, UpdateError::InvalidUpdate { .. }));
            assert_eq!(update.field, "");
        }
    }

    #[test]
    fn validate_rejects_unknown_actions() {
        for action in ["", "SET", "remove", " set"] {
            let mut update = Update::new("age", action, 1);
            let err = update.validate().expect_err("bad action");
            assert_eq!(
                err,
                UpdateError::invalid_update(format!("invalid action '{action}'"))
            );
        }
    }

    #[test]
    fn apply_without_validation_reports_unknown_action() {
        let mut account = Account::default();
        let update = Update::new("age", "upsert", 3);
        let err = update.apply(&mut account).expect_err("unknown action");
        assert_eq!(
            err,
            UpdateError::UnknownAction {
                action: "upsert".to_string()
            }
        );
        assert_eq!(account, Account::default());
    }

    #[test]
    fn delete_assigns_zero_value_not_previous_value() {
        let mut account = Account::default();
        account.nickname = Some("al".to_string());

        let mut set = Update::set("nickname", "ally");
        set.validate().expect("valid");
        set.apply(&mut account).expect("set");
        assert_eq!(account.nickname.as_deref(), Some("ally"));

        let mut delete = Update::delete("nickname");
        delete.validate().expect("valid");
        delete.apply(&mut account).expect("delete");
        assert_eq!(account.nickname, None);

        let mut delete_age = Update::delete("age");
        delete_age.validate().expect("valid");
        account.age = 40;
        delete_age.apply(&mut account).expect("delete age");
        assert_eq!(account.age, 0);
    }

    #[test]
    fn delete_resets_inline_record() {
        let mut account = Account {
            profile: Profile::named("Ada"),
            email: "ada@example.com".to_string(),
            ..Account::default()
        };
        let mut delete = Update::delete("profile");
        delete.validate().expect("valid");
        delete.apply(&mut account).expect("delete");
        assert_eq!(account.profile, Profile::default());
        assert_eq!(account.email, "ada@example.com");
    }

    #[test]
    fn delete_ignores_configured_value() {
        let mut account = Account::default();
        account.score = 2.5;
        let update = Update::new("score", "delete", "ignored");
        update.apply(&mut account).expect("delete");
        assert_eq!(account.score, 0.0);
    }

    #[test]
    fn into_mutation_validates_and_types_the_action() {
        let mutation = Update::new(" profile.name ", "set", "Ada")
            .into_mutation()
            .expect("valid");
        assert_eq!(mutation.path, "profile.name");
        assert_eq!(mutation.operation, Operation::Set(Value::from("Ada")));

        let mut account = Account::default();
        mutation.apply(&mut account).expect("apply");
        assert_eq!(account.profile, Profile::named("Ada"));

        let err = Update::new("age", "patch", 1)
            .into_mutation()
            .expect_err("invalid");
        assert!(matches!(err, UpdateError::InvalidUpdate { .. }));
    }

    #[test]
    fn deserializes_wire_shape() {
        let update: Update =
            serde_json::from_str(r#"{"field":"age","action":"set","value":30}"#).expect("parse");
        assert_eq!(update, Update::set("age", 30));

        let delete: Update =
            serde_json::from_str(r#"{"field":"nickname","action":"delete"}"#).expect("parse");
        assert_eq!(delete.value, Value::Null);
    }

    #[test]
    fn batch_rejects_malformed_update_before_applying_any() {
        let mut account = Account::default();
        let mut updates = vec![Update::set("age", 30), Update::new("email", "drop", "x")];
        let err = apply_all(&mut updates, &mut account).expect_err("malformed");
        assert_eq!(err.index, 1);
        assert!(matches!(err.source, UpdateError::InvalidUpdate { .. }));
        assert_eq!(account.age, 0);
    }

    #[test]
    fn batch_stops_at_first_failure_without_rollback() {
        let mut account = Account::default();
        let mut updates = vec![
            Update::set(" age ", 30),
            Update::set("age", "thirty"),
            Update::set("email", "ada@example.com"),
        ];
        let err = apply_all(&mut updates, &mut account).expect_err("incompatible");
        assert_eq!(err.index, 1);
        assert_eq!(err.field, "age");
        assert_eq!(err.source, UpdateError::incompatible("i32", "string"));
        assert_eq!(account.age, 30);
        assert_eq!(account.email, "");
        assert_eq!(updates[0].field, "age");
    }
}
