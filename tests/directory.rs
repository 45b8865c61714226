use std::sync::Mutex;

use async_trait::async_trait;
use onboarding_core::directory::{
    DirectoryError, NewUser, Profile, Role, StaffDirectory, UserDirectory,
};
use onboarding_core::submission::GatewayError;
use serde_json::json;

/// In-memory `profiles` table.
#[derive(Default)]
struct FakeDirectory {
    profiles: Mutex<Vec<Profile>>,
    created: Mutex<Vec<NewUser>>,
    calls: Mutex<Vec<String>>,
    refuse_create: bool,
}

impl FakeDirectory {
    fn seeded() -> Self {
        let profile = |id: &str, name: &str, role: Role, created_at: &str| Profile {
            id: id.into(),
            email: format!("{id}@example.com"),
            full_name: name.into(),
            role,
            created_at: Some(created_at.into()),
        };
        Self {
            profiles: Mutex::new(vec![
                profile("u3", "Priya Shah", Role::Staff, "2025-02-01T09:00:00Z"),
                profile("u1", "Alex Reed", Role::Manager, "2024-11-05T09:00:00Z"),
                profile("u2", "Chris Lowe", Role::Staff, "2025-01-10T09:00:00Z"),
            ]),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn role_of(&self, id: &str) -> Option<Role> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.role)
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn list(&self) -> Result<Vec<Profile>, GatewayError> {
        self.calls.lock().unwrap().push("list".into());
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn create(&self, user: &NewUser) -> Result<Profile, GatewayError> {
        self.calls.lock().unwrap().push("create".into());
        if self.refuse_create {
            return Err(GatewayError::Backend("A user with this email already exists".into()));
        }
        self.created.lock().unwrap().push(user.clone());
        let profile = Profile {
            id: "u9".into(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            created_at: Some("2025-03-07T14:05:09Z".into()),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile)
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(format!("set_role {user_id}"));
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or_else(|| GatewayError::NotFound(user_id.to_string()))?;
        profile.role = role;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(format!("delete {user_id}"));
        self.profiles.lock().unwrap().retain(|p| p.id != user_id);
        Ok(())
    }
}

#[tokio::test]
async fn staff_listed_oldest_first_with_own_row_marked() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, Some("u1"));

    let staff = directory.staff().await.unwrap();
    let order: Vec<_> = staff.iter().map(|e| e.profile.id.as_str()).collect();
    assert_eq!(order, ["u1", "u2", "u3"]);
    assert!(staff[0].is_self);
    assert!(!staff[0].can_manage());
    assert!(staff[1..].iter().all(|e| e.can_manage()));
}

#[tokio::test]
async fn own_account_cannot_be_changed() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, Some("u1"));

    let err = directory.set_role("u1", Role::Staff).await.unwrap_err();
    assert!(matches!(err, DirectoryError::OwnAccount));
    let err = directory.delete("u1").await.unwrap_err();
    assert!(matches!(err, DirectoryError::OwnAccount));

    assert!(backend.calls().is_empty());
    assert_eq!(backend.role_of("u1"), Some(Role::Manager));
}

#[tokio::test]
async fn toggle_promotes_and_demotes() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, Some("u1"));
    let staff = directory.staff().await.unwrap();
    let chris = &staff[1].profile;

    assert_eq!(chris.role.toggle_label(), "Promote to manager");
    assert_eq!(directory.toggle_role(chris).await.unwrap(), Role::Manager);
    assert_eq!(backend.role_of("u2"), Some(Role::Manager));

    let promoted = Profile {
        role: Role::Manager,
        ..chris.clone()
    };
    assert_eq!(promoted.role.toggle_label(), "Demote to staff");
    assert_eq!(directory.toggle_role(&promoted).await.unwrap(), Role::Staff);
    assert_eq!(backend.role_of("u2"), Some(Role::Staff));
}

#[tokio::test]
async fn delete_removes_other_accounts() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, Some("u1"));

    directory.delete("u3").await.unwrap();
    assert_eq!(backend.role_of("u3"), None);
    assert_eq!(directory.staff().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_trims_input_and_drops_blank_password() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, Some("u1"));

    let profile = directory
        .create(NewUser {
            email: "  new.starter@example.com ".into(),
            full_name: " Dana Cole ".into(),
            role: Role::Staff,
            password: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(profile.email, "new.starter@example.com");

    let created = backend.created.lock().unwrap();
    assert_eq!(created[0].full_name, "Dana Cole");
    assert!(created[0].password.is_none());
    assert_eq!(
        serde_json::to_value(&created[0]).unwrap(),
        json!({ "email": "new.starter@example.com", "full_name": "Dana Cole", "role": "staff" })
    );
}

#[tokio::test]
async fn create_requires_email_and_name() {
    let backend = FakeDirectory::seeded();
    let directory = StaffDirectory::new(&backend, None);

    let err = directory
        .create(NewUser {
            email: "   ".into(),
            full_name: "Dana Cole".into(),
            ..NewUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Missing("Email")));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn backend_refusal_is_reported() {
    let backend = FakeDirectory {
        refuse_create: true,
        ..FakeDirectory::seeded()
    };
    let directory = StaffDirectory::new(&backend, Some("u1"));
    let err = directory
        .create(NewUser {
            email: "alex@example.com".into(),
            full_name: "Alex Reed".into(),
            role: Role::Manager,
            password: Some("s3cret-pass".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "A user with this email already exists");
}

#[test]
fn profile_row_from_backend() {
    let profile: Profile = serde_json::from_value(json!({
        "id": "u4",
        "email": "kim@example.com",
        "full_name": "Kim Lee",
        "role": "manager",
        "created_at": "2025-03-01T08:00:00Z"
    }))
    .unwrap();
    assert_eq!(profile.role, Role::Manager);
    assert_eq!(profile.role.as_str(), "manager");
}
