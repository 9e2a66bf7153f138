use std::fmt;

use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};

use crate::framework::{deserialize_id, RestResource};

/// A registered user as served by the user backend.
///
/// The gateway only reads users (`getMe`) and authenticates them (`loginUser`), so this type is
/// a [`RestResource`] without the CRUD capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ID,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl RestResource for User {
    const RESOURCE_NAME: &'static str = "user";
}

/// Credentials for `loginUser`, posted as-is to `<service-root>/user/login`.
#[derive(Clone, PartialEq, Serialize, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
