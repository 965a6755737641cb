//! Strongly-typed identifiers for explores, views and queries.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// A non-empty explore name, unique within a model.
    pub struct ExploreName;
}

define_newtype_string! {
    /// A non-empty logical view name, unique within a project.
    ///
    /// Join aliases are view names too: generated SQL refers to a joined
    /// view by its alias, so aliases and their source views share a type.
    pub struct ViewName;
}

define_newtype_string! {
    /// Identifier of a saved query in the BI service.
    pub struct QueryId;
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
