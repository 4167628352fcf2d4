//! Command definitions
//!
//! Operations a front end (the CLI) can route through `LogStore::execute`.

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },

    /// List live keys in index walk order
    Keys,
}

/// Outcome of an executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Mutation applied
    Ok,

    /// Value for a GET
    Value(Vec<u8>),

    /// GET on a key with no live entry
    NotFound,

    /// Keys for a KEYS
    Keys(Vec<Vec<u8>>),
}
