use crate::error::CoreError;
use crate::model::RegistrationResult;

/// Check that the service registered the key we submitted.
///
/// Services have been seen to answer with a different identity than the
/// one requested; rendering such a result would produce a config whose
/// private key does not belong to the registered peer.
pub fn validate(requested: &str, result: RegistrationResult) -> Result<RegistrationResult, CoreError> {
    if result.public_key == requested {
        Ok(result)
    } else {
        Err(CoreError::IdentityMismatch {
            requested: requested.to_owned(),
            returned: result.public_key,
        })
    }
}
