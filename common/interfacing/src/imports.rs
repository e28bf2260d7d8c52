pub use serde::{Deserialize, Serialize};

pub use secrecy::SecretString;

// secrecy skips Serialize on purpose; forms opt back in per field
pub fn expose_secret_string<S>(v: &SecretString, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use secrecy::ExposeSecret;
    s.serialize_str(v.expose_secret())
}
