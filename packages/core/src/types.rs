// ABOUTME: Scoping types that tie temp tokens and galleries to one submission
// ABOUTME: Restricted resource ids (assign:<assignment>:<user>) and widget gallery references

use crate::constants::{GALLERY_RRID_PREFIX, SUBMISSION_SCOPE_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Invalid submission scope: {0}")]
    InvalidScope(String),

    #[error("Invalid gallery template: {0}")]
    InvalidTemplate(String),
}

/// One user's submission to one assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionScope {
    pub assignment_id: u64,
    pub user_id: u64,
}

impl SubmissionScope {
    pub fn new(assignment_id: u64, user_id: u64) -> Self {
        Self {
            assignment_id,
            user_id,
        }
    }

    /// Restricted resource id carried in the `!d` field of a temp token
    pub fn restricted_resource_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SubmissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            SUBMISSION_SCOPE_PREFIX, self.assignment_id, self.user_id
        )
    }
}

impl FromStr for SubmissionScope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(prefix), Some(assignment), Some(user), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScopeError::InvalidScope(s.to_string()));
        };

        if prefix != SUBMISSION_SCOPE_PREFIX {
            return Err(ScopeError::InvalidScope(s.to_string()));
        }

        let assignment_id = assignment
            .parse::<u64>()
            .map_err(|_| ScopeError::InvalidScope(s.to_string()))?;
        let user_id = user
            .parse::<u64>()
            .map_err(|_| ScopeError::InvalidScope(s.to_string()))?;

        Ok(Self::new(assignment_id, user_id))
    }
}

/// Gallery id the embedded widget boots with for one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryRef {
    pub scope: SubmissionScope,
    pub account_id: String,
    pub template: String,
}

impl GalleryRef {
    /// Build the gallery reference for a submission.
    ///
    /// The template is joined with `!`, so it must not contain one.
    pub fn for_submission(
        scope: SubmissionScope,
        account_id: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, ScopeError> {
        let template = template.into();
        if template.is_empty() || template.contains('!') {
            return Err(ScopeError::InvalidTemplate(template));
        }

        Ok(Self {
            scope,
            account_id: account_id.into(),
            template,
        })
    }

    /// `rrid:assign:<assignment>:<user>!<account>!<template>`
    pub fn fid(&self) -> String {
        format!(
            "{}:{}!{}!{}",
            GALLERY_RRID_PREFIX, self.scope, self.account_id, self.template
        )
    }
}

impl fmt::Display for GalleryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_restricted_resource_id() {
        let scope = SubmissionScope::new(7, 42);
        assert_eq!(scope.restricted_resource_id(), "assign:7:42");
    }

    #[test]
    fn test_scope_parses_back() {
        let scope: SubmissionScope = "assign:7:42".parse().unwrap();
        assert_eq!(scope, SubmissionScope::new(7, 42));
    }

    #[rstest]
    #[case("")]
    #[case("assign:7")]
    #[case("assign:7:42:1")]
    #[case("course:7:42")]
    #[case("assign:x:42")]
    #[case("assign:7:-1")]
    fn test_scope_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<SubmissionScope>(),
            Err(ScopeError::InvalidScope(_))
        ));
    }

    #[test]
    fn test_gallery_fid() {
        let gallery =
            GalleryRef::for_submission(SubmissionScope::new(7, 42), "12345", "portrait").unwrap();
        assert_eq!(gallery.fid(), "rrid:assign:7:42!12345!portrait");
        assert_eq!(gallery.to_string(), gallery.fid());
    }

    #[test]
    fn test_gallery_rejects_template_with_separator() {
        let result = GalleryRef::for_submission(SubmissionScope::new(1, 2), "12345", "a!b");
        assert_eq!(result, Err(ScopeError::InvalidTemplate("a!b".to_string())));

        let result = GalleryRef::for_submission(SubmissionScope::new(1, 2), "12345", "");
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_serializes_as_struct() {
        let json = serde_json::to_value(SubmissionScope::new(7, 42)).unwrap();
        assert_eq!(json, serde_json::json!({ "assignment_id": 7, "user_id": 42 }));
    }
}
