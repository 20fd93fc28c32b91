use alloy_primitives::Address;

/// Decides whether a connected account gets the admin view.
///
/// This only gates what the client shows. The wager contract enforces who may
/// actually call `pickWinner`.
pub trait RoleResolver: Send + Sync {
    fn is_admin(&self, address: &Address) -> bool;
}

/// Admin set taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRoles {
    admins: Vec<Address>,
}

impl StaticRoles {
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    pub fn admins(&self) -> &[Address] {
        &self.admins
    }
}

impl RoleResolver for StaticRoles {
    fn is_admin(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_address_match() {
        let admin: Address = "0x174501fd8461F910beDE1E2689Aee51c4B55a85a".parse().unwrap();
        let roles = StaticRoles::new([admin]);

        assert!(roles.is_admin(&admin));
        assert!(!roles.is_admin(&Address::repeat_byte(0x17)));
    }

    #[test]
    fn test_hex_case_does_not_matter_once_parsed() {
        let mixed: Address = "0x174501fd8461F910beDE1E2689Aee51c4B55a85a".parse().unwrap();
        let lower: Address = "0x174501fd8461f910bede1e2689aee51c4b55a85a".parse().unwrap();
        let roles = StaticRoles::new([mixed]);

        assert!(roles.is_admin(&lower));
    }

    #[test]
    fn test_empty_roles_grant_nothing() {
        let roles = StaticRoles::default();
        assert!(!roles.is_admin(&Address::ZERO));
    }
}
