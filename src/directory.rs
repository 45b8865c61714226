//! Staff accounts behind the Network Access screen: listing, creating,
//! promoting or demoting, and deleting users.
//!
//! A manager may change anyone's account except their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::submission::GatewayError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Staff,
    Manager,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Manager => "manager",
        }
    }

    /// The role the promote/demote action switches to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Staff => Self::Manager,
            Self::Manager => Self::Staff,
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Staff => "Promote to manager",
            Self::Manager => "Demote to staff",
        }
    }
}

/// One row of `profiles`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: Option<String>,
}

/// Request body for account creation. Without a password the user sets one
/// through the invitation email.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("You cannot modify your own account")]
    OwnAccount,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All profiles, oldest first.
    async fn list(&self) -> Result<Vec<Profile>, GatewayError>;
    async fn create(&self, user: &NewUser) -> Result<Profile, GatewayError>;
    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), GatewayError>;
    async fn delete(&self, user_id: &str) -> Result<(), GatewayError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffEntry {
    pub profile: Profile,
    /// The signed-in user's own row; it offers no role or delete action.
    pub is_self: bool,
}

impl StaffEntry {
    pub fn can_manage(&self) -> bool {
        !self.is_self
    }
}

/// The directory as seen by the signed-in manager.
pub struct StaffDirectory<'a> {
    directory: &'a dyn UserDirectory,
    current_user: Option<String>,
}

impl<'a> StaffDirectory<'a> {
    pub fn new(directory: &'a dyn UserDirectory, current_user: Option<&str>) -> Self {
        Self {
            directory,
            current_user: current_user.map(str::to_string),
        }
    }

    fn is_self(&self, user_id: &str) -> bool {
        self.current_user.as_deref() == Some(user_id)
    }

    fn check_not_self(&self, user_id: &str) -> Result<(), DirectoryError> {
        if self.is_self(user_id) {
            return Err(DirectoryError::OwnAccount);
        }
        Ok(())
    }

    /// Every account, oldest first, with the caller's own row marked.
    pub async fn staff(&self) -> Result<Vec<StaffEntry>, GatewayError> {
        let mut profiles = self.directory.list().await?;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles
            .into_iter()
            .map(|profile| StaffEntry {
                is_self: self.is_self(&profile.id),
                profile,
            })
            .collect())
    }

    /// Trims the form input; a blank password is left for the user to set.
    pub async fn create(&self, user: NewUser) -> Result<Profile, DirectoryError> {
        let user = NewUser {
            email: user.email.trim().to_string(),
            full_name: user.full_name.trim().to_string(),
            role: user.role,
            password: user.password.filter(|p| !p.is_empty()),
        };
        if user.email.is_empty() {
            return Err(DirectoryError::Missing("Email"));
        }
        if user.full_name.is_empty() {
            return Err(DirectoryError::Missing("Full name"));
        }
        let profile = self.directory.create(&user).await?;
        log::info!("Created {} account for {}", user.role.as_str(), user.email);
        Ok(profile)
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DirectoryError> {
        self.check_not_self(user_id)?;
        self.directory.set_role(user_id, role).await?;
        log::info!("Set role of {user_id} to {}", role.as_str());
        Ok(())
    }

    /// Promotes staff and demotes managers. Returns the new role.
    pub async fn toggle_role(&self, profile: &Profile) -> Result<Role, DirectoryError> {
        let role = profile.role.toggled();
        self.set_role(&profile.id, role).await?;
        Ok(role)
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), DirectoryError> {
        self.check_not_self(user_id)?;
        self.directory.delete(user_id).await?;
        log::info!("Deleted account {user_id}");
        Ok(())
    }
}
