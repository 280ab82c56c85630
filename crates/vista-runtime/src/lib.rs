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

//! # Vista Runtime
//!
//! The backend selector: probes client capability, chooses between the two
//! rendering backends, initializes the chosen one, and exposes a runtime
//! switch that fully disposes the old backend before constructing the new.

pub mod selection;
pub mod selector;

pub use selection::{choose_backend, InitializeOptions, SelectionReason};
pub use selector::BackendSelector;
