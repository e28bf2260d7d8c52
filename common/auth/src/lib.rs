use anyhow::Context;

fn hash_algo<'a>() -> argon2::Argon2<'a> {
    argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(15000, 2, 1, None).unwrap(),
    )
}

pub fn hash_pwd(password: &[u8]) -> anyhow::Result<String> {
    Ok(argon2::PasswordHasher::hash_password(
        &hash_algo(),
        password,
        &argon2::password_hash::SaltString::generate(&mut rand::thread_rng()),
    )?
    .to_string())
}

/// Checks a candidate password against a PHC-format hash.
/// `Ok(false)` is a mismatch; `Err` means the stored hash is unusable.
///
/// It's a slow operation, 10ms kind of slow. Call it off the async runtime.
pub fn verify_pwd(candidate: &[u8], phc_hash: &str) -> anyhow::Result<bool> {
    let expected = argon2::PasswordHash::new(phc_hash)
        .context("Failed to parse hash in PHC string format.")?;

    match argon2::PasswordVerifier::verify_password(&argon2::Argon2::default(), candidate, &expected)
    {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
