//! Per-revision dispatch table
//!
//! Each revision of the function is a static list of [`OperationRule`]s, one
//! per accepted method. A rule names the fields that must validate, the
//! operation to run, and whether the success envelope echoes the names.
//!
//! | Revision | POST | PUT | DELETE |
//! |----------|------|-----|--------|
//! | `greeting` | names, no store | - | - |
//! | `insert` | names, insert | - | - |
//! | `crud` | names, insert | id + names | id |
//! | `full` | names + city + age | id + names + city + age | id |

use std::fmt;
use std::str::FromStr;

use crate::store::Statement;
use crate::user::{Field, UserRecord};

const TABLE: &str = "users";

/// What a rule does once its fields are valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Answer without touching the store
    Greet,
    Insert,
    Update,
    Delete,
}

impl Operation {
    /// Zero affected rows means the id did not match a user
    pub fn zero_rows_is_not_found(self) -> bool {
        matches!(self, Operation::Update | Operation::Delete)
    }
}

/// Validation and dispatch data for one method of one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRule {
    pub method: &'static str,
    pub operation: Operation,
    /// Required fields, checked in this order
    pub fields: &'static [Field],
    /// Echo `firstname`/`lastname` in the success envelope
    pub echo_names: bool,
}

impl OperationRule {
    const fn new(
        method: &'static str,
        operation: Operation,
        fields: &'static [Field],
        echo_names: bool,
    ) -> Self {
        Self {
            method,
            operation,
            fields,
            echo_names,
        }
    }

    fn data_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied().filter(|f| *f != Field::Id)
    }

    /// Build the single statement this rule issues, `None` for `Greet`.
    pub fn statement(&self, record: &UserRecord) -> Option<Statement> {
        match self.operation {
            Operation::Greet => None,
            Operation::Insert => {
                let columns: Vec<&str> = self.data_fields().map(Field::column).collect();
                let placeholders = vec!["?"; columns.len()].join(", ");
                let params = self.data_fields().map(|f| record.param(f)).collect();
                Some(Statement::new(
                    format!(
                        "INSERT INTO {TABLE} ({}) VALUES ({placeholders})",
                        columns.join(", ")
                    ),
                    params,
                ))
            }
            Operation::Update => {
                let assignments: Vec<String> = self
                    .data_fields()
                    .map(|f| format!("{}=?", f.column()))
                    .collect();
                let mut params: Vec<_> = self.data_fields().map(|f| record.param(f)).collect();
                params.push(record.param(Field::Id));
                Some(Statement::new(
                    format!("UPDATE {TABLE} SET {} WHERE id=?", assignments.join(", ")),
                    params,
                ))
            }
            Operation::Delete => Some(Statement::new(
                format!("DELETE FROM {TABLE} WHERE id=?"),
                vec![record.param(Field::Id)],
            )),
        }
    }
}

const NAMES: &[Field] = &[Field::FirstName, Field::LastName];
const ID_AND_NAMES: &[Field] = &[Field::Id, Field::FirstName, Field::LastName];
const ALL: &[Field] = &[Field::FirstName, Field::LastName, Field::City, Field::Age];
const ID_AND_ALL: &[Field] = &[
    Field::Id,
    Field::FirstName,
    Field::LastName,
    Field::City,
    Field::Age,
];
const ID_ONLY: &[Field] = &[Field::Id];

const GREETING_RULES: &[OperationRule] =
    &[OperationRule::new("POST", Operation::Greet, NAMES, true)];

const INSERT_RULES: &[OperationRule] =
    &[OperationRule::new("POST", Operation::Insert, NAMES, true)];

const CRUD_RULES: &[OperationRule] = &[
    OperationRule::new("POST", Operation::Insert, NAMES, false),
    OperationRule::new("PUT", Operation::Update, ID_AND_NAMES, false),
    OperationRule::new("DELETE", Operation::Delete, ID_ONLY, false),
];

const FULL_RULES: &[OperationRule] = &[
    OperationRule::new("POST", Operation::Insert, ALL, false),
    OperationRule::new("PUT", Operation::Update, ID_AND_ALL, false),
    OperationRule::new("DELETE", Operation::Delete, ID_ONLY, false),
];

/// The published revisions of the function, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Revision {
    /// POST-only greeting, no persistence
    Greeting,
    /// POST-only insert of first and last name
    Insert,
    /// POST/PUT/DELETE on first and last name
    Crud,
    /// POST/PUT/DELETE on first name, last name, city and age
    #[default]
    Full,
}

impl Revision {
    pub const ALL: [Revision; 4] = [
        Revision::Greeting,
        Revision::Insert,
        Revision::Crud,
        Revision::Full,
    ];

    pub fn rules(self) -> &'static [OperationRule] {
        match self {
            Revision::Greeting => GREETING_RULES,
            Revision::Insert => INSERT_RULES,
            Revision::Crud => CRUD_RULES,
            Revision::Full => FULL_RULES,
        }
    }

    /// Find the rule for a method (case-insensitive)
    pub fn rule_for(self, method: &str) -> Option<&'static OperationRule> {
        self.rules()
            .iter()
            .find(|rule| rule.method.eq_ignore_ascii_case(method))
    }

    pub fn number(self) -> u8 {
        match self {
            Revision::Greeting => 1,
            Revision::Insert => 2,
            Revision::Crud => 3,
            Revision::Full => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Revision::Greeting => "greeting",
            Revision::Insert => "insert",
            Revision::Crud => "crud",
            Revision::Full => "full",
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown revision {0:?} (expected greeting, insert, crud, full or 1-4)")]
pub struct UnknownRevision(pub String);

impl FromStr for Revision {
    type Err = UnknownRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Revision::ALL
            .into_iter()
            .find(|rev| {
                rev.name().eq_ignore_ascii_case(wanted) || rev.number().to_string() == wanted
            })
            .ok_or_else(|| UnknownRevision(s.to_string()))
    }
}
