#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A storefront creator as supplied by the caller.
///
/// Only `id` feeds the layout seeds; `name` is carried through for labeling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
}

impl Creator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Creator {
            id: id.into(),
            name: name.into(),
        }
    }
}
