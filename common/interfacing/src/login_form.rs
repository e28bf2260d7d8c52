use crate::imports::*;

/// Credentials as entered in the sign-in / sign-up form.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginForm {
    pub username: String,
    #[serde(serialize_with = "expose_secret_string")]
    pub password: SecretString,
}
