// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the hierarchy of error types for the render control subsystem.
//!
//! Capability probe failures never appear here: they are folded into the
//! [`CapabilitySnapshot`](crate::capability::CapabilitySnapshot) as
//! "unsupported" and drive the fallback rule instead of erroring.

use crate::backend::BackendKind;
use std::fmt;

/// An error raised by a concrete rendering backend during its lifecycle.
#[derive(Debug)]
pub enum BackendError {
    /// The backend's underlying rendering library failed to load.
    LibraryUnavailable {
        /// The backend that failed.
        kind: BackendKind,
        /// Details from the loader.
        details: String,
    },
    /// Backend setup failed after the library was available.
    InitializationFailed {
        /// The backend that failed.
        kind: BackendKind,
        /// Details from the backend.
        details: String,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::LibraryUnavailable { kind, details } => {
                write!(
                    f,
                    "Rendering library for the {kind} backend failed to load: {details}"
                )
            }
            BackendError::InitializationFailed { kind, details } => {
                write!(f, "Initialization of the {kind} backend failed: {details}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// A high-level error surfaced by the backend selector.
#[derive(Debug)]
pub enum SelectorError {
    /// An operation required an initialized selector, but `initialize` has
    /// not completed successfully yet.
    NotInitialized,
    /// A backend switch is already in flight; concurrent switches are
    /// rejected rather than queued, so the caller can retry deliberately
    /// once the pending switch settles.
    SwitchInProgress,
    /// The backend being brought up reported a hard failure.
    Backend(BackendError),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::NotInitialized => {
                write!(f, "The backend selector is not initialized.")
            }
            SelectorError::SwitchInProgress => {
                write!(
                    f,
                    "A backend switch is already in progress; wait for it to settle and retry."
                )
            }
            SelectorError::Backend(err) => {
                write!(f, "Backend lifecycle operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for SelectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectorError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for SelectorError {
    fn from(err: BackendError) -> Self {
        SelectorError::Backend(err)
    }
}
