// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::path::PathError;
use crate::template::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("root element <{tag}> is not a registered component")]
    UnknownRoot { tag: String },
    #[error("`bind-model` can only be used on <input> elements, found it on <{tag}>")]
    ModelOnNonInput { tag: String },
    #[error("component <{selector}> has no method `{method}`")]
    UnknownMethod { selector: String, method: String },
    #[error("component <{selector}> is rendered inside itself")]
    Recursive { selector: String },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("malformed template: {0}")]
    Template(#[from] ParseError),
    #[error("component state could not be converted: {0}")]
    State(#[from] serde_json::Error),
    #[error("host DOM error: {0}")]
    Host(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
