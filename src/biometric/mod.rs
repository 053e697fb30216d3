//! Biometric gate used before showing account balances.
//!
//! Platform calls return a full [`BiometricResult`]; [`BiometricAuth`] narrows
//! every outcome to a boolean so callers never see why an attempt failed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BiometricResult<T> = std::result::Result<T, BiometricError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiometricKind {
    Fingerprint,
    #[serde(rename = "facial")]
    FacialRecognition,
    Iris,
    Unknown,
}

#[derive(Debug, Error)]
pub enum BiometricError {
    #[error("no biometric hardware present")]
    NoHardware,
    #[error("no biometric credential enrolled")]
    NotEnrolled,
    #[error("authentication cancelled by the user")]
    Cancelled,
    #[error("biometric sensor locked out")]
    Lockout,
    #[error("credential not recognised")]
    Rejected,
    #[error("platform error: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Failed,
}

/// Raw platform authentication capability.
pub trait BiometricPlatform {
    fn has_hardware(&self) -> BiometricResult<bool>;
    fn is_enrolled(&self) -> BiometricResult<bool>;
    fn supported_kinds(&self) -> BiometricResult<Vec<BiometricKind>>;
    fn authenticate(&self, prompt: &str) -> BiometricResult<AuthOutcome>;
}

#[derive(Debug, Clone)]
pub struct BiometricAuth<P> {
    platform: P,
}

impl<P: BiometricPlatform> BiometricAuth<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// True only when hardware is present and at least one credential is enrolled.
    pub fn is_supported(&self) -> bool {
        self.check_supported().is_ok()
    }

    /// True only on an explicit success.
    pub fn authenticate(&self, prompt: &str) -> bool {
        match self.try_authenticate(prompt) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(?err, "biometric authentication did not succeed");
                false
            }
        }
    }

    pub fn list_supported_kinds(&self) -> Vec<BiometricKind> {
        match self.platform.supported_kinds() {
            Ok(kinds) => {
                let mut unique = Vec::with_capacity(kinds.len());
                for kind in kinds {
                    if !unique.contains(&kind) {
                        unique.push(kind);
                    }
                }
                unique
            }
            Err(err) => {
                tracing::debug!(?err, "failed to list biometric kinds");
                Vec::new()
            }
        }
    }

    fn check_supported(&self) -> BiometricResult<()> {
        if !self.platform.has_hardware()? {
            return Err(BiometricError::NoHardware);
        }
        if !self.platform.is_enrolled()? {
            return Err(BiometricError::NotEnrolled);
        }
        Ok(())
    }

    fn try_authenticate(&self, prompt: &str) -> BiometricResult<()> {
        self.check_supported()?;
        match self.platform.authenticate(prompt)? {
            AuthOutcome::Success => Ok(()),
            AuthOutcome::Failed => Err(BiometricError::Rejected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct ScriptedPlatform {
        hardware: Option<bool>,
        enrolled: Option<bool>,
        kinds: Option<Vec<BiometricKind>>,
        outcome: RefCell<Option<BiometricResult<AuthOutcome>>>,
        auth_calls: Cell<usize>,
    }

    impl ScriptedPlatform {
        fn ready(outcome: BiometricResult<AuthOutcome>) -> Self {
            Self {
                hardware: Some(true),
                enrolled: Some(true),
                kinds: Some(vec![BiometricKind::Fingerprint]),
                outcome: RefCell::new(Some(outcome)),
                ..Self::default()
            }
        }
    }

    impl BiometricPlatform for ScriptedPlatform {
        fn has_hardware(&self) -> BiometricResult<bool> {
            self.hardware
                .ok_or_else(|| BiometricError::Platform("hardware probe failed".into()))
        }

        fn is_enrolled(&self) -> BiometricResult<bool> {
            self.enrolled
                .ok_or_else(|| BiometricError::Platform("enrollment probe failed".into()))
        }

        fn supported_kinds(&self) -> BiometricResult<Vec<BiometricKind>> {
            self.kinds
                .clone()
                .ok_or_else(|| BiometricError::Platform("kind probe failed".into()))
        }

        fn authenticate(&self, _prompt: &str) -> BiometricResult<AuthOutcome> {
            self.auth_calls.set(self.auth_calls.get() + 1);
            self.outcome
                .borrow_mut()
                .take()
                .unwrap_or(Err(BiometricError::Lockout))
        }
    }

    #[test]
    fn unsupported_when_hardware_present_but_not_enrolled() {
        let platform = ScriptedPlatform {
            hardware: Some(true),
            enrolled: Some(false),
            ..ScriptedPlatform::default()
        };
        let auth = BiometricAuth::new(platform);

        assert!(!auth.is_supported());
        assert!(!auth.authenticate("Unlock Moneta"));
        assert_eq!(auth.platform.auth_calls.get(), 0);
    }

    #[test]
    fn unsupported_without_hardware() {
        let platform = ScriptedPlatform {
            hardware: Some(false),
            enrolled: Some(true),
            ..ScriptedPlatform::default()
        };
        assert!(!BiometricAuth::new(platform).is_supported());
    }

    #[test]
    fn probe_errors_read_as_unsupported() {
        let auth = BiometricAuth::new(ScriptedPlatform::default());
        assert!(!auth.is_supported());
        assert!(!auth.authenticate("Unlock Moneta"));
    }

    #[test]
    fn authenticate_succeeds_only_on_explicit_success() {
        let auth = BiometricAuth::new(ScriptedPlatform::ready(Ok(AuthOutcome::Success)));
        assert!(auth.is_supported());
        assert!(auth.authenticate("Unlock Moneta"));
    }

    #[test]
    fn every_failure_collapses_to_false() {
        let failures = [
            Ok(AuthOutcome::Failed),
            Err(BiometricError::Cancelled),
            Err(BiometricError::Lockout),
            Err(BiometricError::Platform("sensor busy".into())),
        ];
        for outcome in failures {
            let auth = BiometricAuth::new(ScriptedPlatform::ready(outcome));
            assert!(!auth.authenticate("Unlock Moneta"));
            assert_eq!(auth.platform.auth_calls.get(), 1);
        }
    }

    #[test]
    fn supported_kinds_are_deduplicated_in_order() {
        let platform = ScriptedPlatform {
            kinds: Some(vec![
                BiometricKind::FacialRecognition,
                BiometricKind::Fingerprint,
                BiometricKind::FacialRecognition,
                BiometricKind::Iris,
            ]),
            ..ScriptedPlatform::default()
        };
        assert_eq!(
            BiometricAuth::new(platform).list_supported_kinds(),
            vec![
                BiometricKind::FacialRecognition,
                BiometricKind::Fingerprint,
                BiometricKind::Iris
            ]
        );
    }

    #[test]
    fn supported_kinds_empty_on_platform_error() {
        let auth = BiometricAuth::new(ScriptedPlatform::default());
        assert!(auth.list_supported_kinds().is_empty());
    }

    #[test]
    fn biometric_kind_serializes_with_short_names() {
        assert_eq!(
            serde_json::to_string(&BiometricKind::FacialRecognition).unwrap(),
            r#""facial""#
        );
        assert_eq!(
            serde_json::to_string(&BiometricKind::Fingerprint).unwrap(),
            r#""fingerprint""#
        );
    }
}
