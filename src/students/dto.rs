use serde::{Deserialize, Serialize};

/// Every field is optional on the wire so that validation can name each
/// missing one instead of failing on the first.
#[derive(Debug, Default, Deserialize)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreatedStudent {
    pub id: i64,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub age: i32,
}
