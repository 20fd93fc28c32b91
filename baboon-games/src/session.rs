use crate::role::RoleResolver;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Who is connected, and whether they see the admin section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    address: Option<Address>,
    is_admin: bool,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: Address, roles: &dyn RoleResolver) -> Self {
        Self {
            address: Some(address),
            is_admin: roles.is_admin(&address),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}
