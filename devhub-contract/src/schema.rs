//! Declarative per-method validation schemas
//!
//! Each gateway method declares the fields its request must carry and the
//! shape check each field must pass. One generic validator evaluates the
//! table, so the required-field policy lives in data rather than in a pile
//! of per-route conditionals.

use serde_json::{Map, Value};

use crate::{ContractError, Result};

/// Shape check applied to a single request field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Present and non-falsy (null, false, 0 and "" are rejected;
    /// empty arrays and objects are accepted)
    Truthy,
    /// Present and non-null. Lets numeric ids be 0.
    Defined,
    /// Present and array-typed
    Array,
}

impl FieldCheck {
    fn passes(self, value: &Value) -> bool {
        match self {
            FieldCheck::Truthy => is_truthy(value),
            FieldCheck::Defined => !value.is_null(),
            FieldCheck::Array => value.is_array(),
        }
    }
}

/// Truthiness over JSON values, matching how the contract frontends treat
/// missing-or-empty input.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One required field of a method schema
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub check: FieldCheck,
}

/// Validation contract for a single contract method
#[derive(Debug, Clone, Copy)]
pub struct MethodSchema {
    /// Contract method name, also used as the route segment
    pub method: &'static str,
    pub fields: &'static [FieldRule],
}

impl MethodSchema {
    /// Validate an untyped request body against this schema.
    ///
    /// On success returns the args object for the contract call: exactly the
    /// schema's fields, in schema order, values taken verbatim from the
    /// input. Extra input fields are dropped. Any unmet rule yields the
    /// single uniform `InvalidInput` error.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>> {
        let body = input.as_object().ok_or(ContractError::InvalidInput)?;

        let mut args = Map::with_capacity(self.fields.len());
        for rule in self.fields {
            let value = body.get(rule.name).ok_or(ContractError::InvalidInput)?;
            if !rule.check.passes(value) {
                return Err(ContractError::InvalidInput);
            }
            args.insert(rule.name.to_string(), value.clone());
        }
        Ok(args)
    }
}

const fn truthy(name: &'static str) -> FieldRule {
    FieldRule { name, check: FieldCheck::Truthy }
}

const fn defined(name: &'static str) -> FieldRule {
    FieldRule { name, check: FieldCheck::Defined }
}

const fn array(name: &'static str) -> FieldRule {
    FieldRule { name, check: FieldCheck::Array }
}

pub const ADD_MEMBER: MethodSchema = MethodSchema {
    method: "add_member",
    fields: &[truthy("member"), truthy("metadata")],
};

// `accepted_terms_and_conditions_version` is documented as optional in the
// plugin manifest but required here; see DESIGN.md.
pub const ADD_PROPOSAL: MethodSchema = MethodSchema {
    method: "add_proposal",
    fields: &[
        truthy("body"),
        truthy("labels"),
        truthy("accepted_terms_and_conditions_version"),
    ],
};

pub const ADD_RFP: MethodSchema = MethodSchema {
    method: "add_rfp",
    fields: &[truthy("body"), truthy("labels")],
};

// id 0 is a valid rfp id, so it gets a definedness check.
pub const CANCEL_RFP: MethodSchema = MethodSchema {
    method: "cancel_rfp",
    fields: &[
        defined("id"),
        array("proposals_to_cancel"),
        array("proposals_to_unlink"),
    ],
};

pub const CREATE_COMMUNITY: MethodSchema = MethodSchema {
    method: "create_community",
    fields: &[truthy("inputs")],
};

pub const EDIT_MEMBER: MethodSchema = MethodSchema {
    method: "edit_member",
    fields: &[truthy("member"), truthy("metadata")],
};

pub const EDIT_PROPOSAL: MethodSchema = MethodSchema {
    method: "edit_proposal",
    fields: &[defined("id"), truthy("body"), truthy("labels")],
};

pub const GET_COMMUNITY: MethodSchema = MethodSchema {
    method: "get_community",
    fields: &[truthy("handle")],
};

pub const GET_PROPOSAL: MethodSchema = MethodSchema {
    method: "get_proposal",
    fields: &[defined("proposal_id")],
};

/// All mutating-method schemas, in route order
pub const WRITE_SCHEMAS: &[MethodSchema] = &[
    ADD_MEMBER,
    ADD_PROPOSAL,
    ADD_RFP,
    CANCEL_RFP,
    CREATE_COMMUNITY,
    EDIT_MEMBER,
    EDIT_PROPOSAL,
];
