use eventstock_core::UserId;
use eventstock_staff::StaffUser;

/// Picks the user a system notification is addressed to.
pub trait RecipientResolver: Send + Sync {
    fn resolve(&self, users: &[&StaffUser]) -> Option<UserId>;
}

/// Lowest-id active superuser, else lowest-id active staff user, else
/// lowest-id active user, else nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeOrderResolver;

impl RecipientResolver for PrivilegeOrderResolver {
    fn resolve(&self, users: &[&StaffUser]) -> Option<UserId> {
        lowest(users, |u| u.is_active() && u.is_superuser())
            .or_else(|| lowest(users, |u| u.is_active() && u.is_staff()))
            .or_else(|| lowest(users, StaffUser::is_active))
    }
}

fn lowest(users: &[&StaffUser], pred: impl Fn(&StaffUser) -> bool) -> Option<UserId> {
    users
        .iter()
        .filter(|u| pred(**u))
        .map(|u| u.id_typed())
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventstock_staff::UserDetails;

    fn user(username: &str, staff: bool, superuser: bool) -> StaffUser {
        StaffUser::register(
            UserId::new(),
            UserDetails {
                username: username.into(),
                is_staff: staff,
                is_superuser: superuser,
                ..UserDetails::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn prefers_active_superuser() {
        let plain = user("plain", false, false);
        let staff = user("staff", true, false);
        let admin = user("admin", true, true);
        let resolved = PrivilegeOrderResolver.resolve(&[&plain, &staff, &admin]);
        assert_eq!(resolved, Some(admin.id_typed()));
    }

    #[test]
    fn suspended_superuser_falls_back_to_staff() {
        let mut admin = user("admin", true, true);
        admin.suspend();
        let staff = user("staff", true, false);
        let resolved = PrivilegeOrderResolver.resolve(&[&admin, &staff]);
        assert_eq!(resolved, Some(staff.id_typed()));
    }

    #[test]
    fn falls_back_to_any_active_user_then_none() {
        let plain = user("plain", false, false);
        assert_eq!(PrivilegeOrderResolver.resolve(&[&plain]), Some(plain.id_typed()));

        let mut gone = user("gone", false, false);
        gone.suspend();
        assert_eq!(PrivilegeOrderResolver.resolve(&[&gone]), None);
        assert_eq!(PrivilegeOrderResolver.resolve(&[]), None);
    }

    #[test]
    fn picks_lowest_id_among_equals() {
        let a = user("a", true, true);
        let b = user("b", true, true);
        let expected = a.id_typed().min(b.id_typed());
        assert_eq!(PrivilegeOrderResolver.resolve(&[&b, &a]), Some(expected));
    }
}
