use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

/// Number of raw bytes in an object hash
pub const OID_RAW_LEN: usize = 20;

/// Number of hex digits in a printed object hash
pub const OID_HEX_LEN: usize = OID_RAW_LEN * 2;

/// Content hash identifying an object in the history store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OID_RAW_LEN]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OID_RAW_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OID_RAW_LEN] {
        &self.0
    }

    /// Check whether a string has the shape of a full hex object id
    pub fn is_hex_id(s: &str) -> bool {
        s.len() == OID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl FromStr for ObjectId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_hex_id(s) {
            return Err(GraphError::InvalidObjectId(s.to_string()));
        }

        git2::Oid::from_str(s)
            .map(Self::from)
            .map_err(|_| GraphError::InvalidObjectId(s.to_string()))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<git2::Oid> for ObjectId {
    fn from(oid: git2::Oid) -> Self {
        let mut bytes = [0u8; OID_RAW_LEN];
        bytes.copy_from_slice(&oid.as_bytes()[..OID_RAW_LEN]);
        Self(bytes)
    }
}

impl TryFrom<ObjectId> for git2::Oid {
    type Error = git2::Error;

    fn try_from(id: ObjectId) -> Result<Self, Self::Error> {
        git2::Oid::from_bytes(&id.0)
    }
}
