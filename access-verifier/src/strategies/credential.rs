//! Credential gate.
//!
//! The presented JWT must:
//! - verify against the key published by the gate's issuer
//! - carry `iss` equal to the issuer origin and `sub` equal to the
//!   presenting principal
//! - assert the gate's credential type under `vc.credentialSubject`
//! - match every declared credential argument exactly

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use access_core::{
    Credential, CredentialArgument, CredentialGate, FailureReason, GateVerdict,
    VerifiedCredentialArgs,
};

use super::capability_unreachable;
use crate::capability::{CredentialIssuer, IssuerKey};
use crate::config::CredentialConfig;

#[derive(Debug, Deserialize)]
struct CredentialClaims {
    sub: String,
    vc: VerifiableCredential,
}

#[derive(Debug, Deserialize)]
struct VerifiableCredential {
    #[serde(rename = "credentialSubject")]
    credential_subject: Map<String, Value>,
}

pub async fn verify(
    issuer: &dyn CredentialIssuer,
    gate: &CredentialGate,
    args: &VerifiedCredentialArgs,
    config: &CredentialConfig,
) -> GateVerdict {
    let credential = &gate.credential;

    if args.ii_origin.trim().is_empty() {
        return invalid("missing identity provider origin");
    }

    let key = match issuer
        .issuer_key(&credential.issuer_canister_id, &credential.issuer_origin)
        .await
    {
        Ok(key) => key,
        Err(err) => return capability_unreachable("credential issuer", err),
    };

    let (decoding_key, algorithm) = match decoding_key(&key) {
        Ok(pair) => pair,
        Err(err) => return GateVerdict::indeterminate(format!("issuer key unusable: {err}")),
    };

    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&[credential.issuer_origin.as_str()]);
    // set_issuer alone only checks `iss` when the token carries one
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_aud = false;
    validation.leeway = config.leeway_secs;

    let claims = match decode::<CredentialClaims>(&args.credential_jwt, &decoding_key, &validation)
    {
        Ok(data) => data.claims,
        Err(err) => return invalid(describe_jwt_error(err.kind())),
    };

    if claims.sub != args.user_ii_principal {
        return invalid("credential subject does not match the presenting principal");
    }

    debug!(
        credential = %credential.credential_name,
        ii_origin = %args.ii_origin,
        "Credential signature and issuer verified"
    );

    match_subject(credential, &claims.vc.credential_subject)
}

fn decoding_key(key: &IssuerKey) -> jsonwebtoken::errors::Result<(DecodingKey, Algorithm)> {
    Ok(match key {
        IssuerKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
        IssuerKey::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
        IssuerKey::EcPem(pem) => (DecodingKey::from_ec_pem(pem.as_bytes())?, Algorithm::ES256),
        IssuerKey::EdPem(pem) => (DecodingKey::from_ed_pem(pem.as_bytes())?, Algorithm::EdDSA),
    })
}

fn describe_jwt_error(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::ExpiredSignature => "credential expired".into(),
        ErrorKind::ImmatureSignature => "credential not yet valid".into(),
        ErrorKind::InvalidSignature => "invalid signature".into(),
        ErrorKind::InvalidIssuer => "credential issued by a different origin".into(),
        ErrorKind::InvalidAlgorithm => "unexpected signing algorithm".into(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim `{claim}`"),
        ErrorKind::Json(_) => "malformed credential claims".into(),
        _ => "malformed credential token".into(),
    }
}

/// Check the asserted credential type and its arguments.
fn match_subject(credential: &Credential, subject: &Map<String, Value>) -> GateVerdict {
    let Some(asserted) = subject.get(&credential.credential_type) else {
        return invalid(format!(
            "credential type `{}` not asserted",
            credential.credential_type
        ));
    };

    if let Some(arguments) = &credential.credential_arguments {
        for (name, expected) in arguments {
            if !argument_matches(expected, asserted.get(name)) {
                return invalid(format!("argument `{name}` does not match {expected}"));
            }
        }
    }

    GateVerdict::Passed
}

fn argument_matches(expected: &CredentialArgument, actual: Option<&Value>) -> bool {
    match (expected, actual) {
        (CredentialArgument::String(expected), Some(Value::String(actual))) => expected == actual,
        (CredentialArgument::Number(expected), Some(Value::Number(actual))) => {
            numbers_equal(expected, actual)
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn invalid(detail: impl Into<String>) -> GateVerdict {
    GateVerdict::Failed(FailureReason::invalid_credential(detail))
}
