use std::path::PathBuf;

pub const DEFAULT_ORGANISATION: &str = "ImmersiveCore";

/// Document-wide settings shared by both form templates.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Printed in footers and used as the blank-form file name prefix.
    pub organisation: String,
    /// PNG drawn in the header bar. Missing or undecodable files are skipped.
    pub logo: Option<PathBuf>,
    /// Deflate page content streams.
    pub compress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organisation: DEFAULT_ORGANISATION.to_string(),
            logo: None,
            compress: true,
        }
    }
}

impl Settings {
    /// Defaults overridden by `ONBOARDING_ORGANISATION`, `ONBOARDING_LOGO`
    /// and `ONBOARDING_UNCOMPRESSED`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(org) = std::env::var("ONBOARDING_ORGANISATION") {
            let trimmed = org.trim();
            if !trimmed.is_empty() {
                settings.organisation = trimmed.to_string();
            }
        }
        if let Ok(logo) = std::env::var("ONBOARDING_LOGO") {
            let trimmed = logo.trim();
            if !trimmed.is_empty() {
                settings.logo = Some(PathBuf::from(trimmed));
            }
        }
        if std::env::var_os("ONBOARDING_UNCOMPRESSED").is_some() {
            settings.compress = false;
        }
        settings
    }

    pub fn with_organisation(mut self, organisation: impl Into<String>) -> Self {
        self.organisation = organisation.into();
        self
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn uncompressed(mut self) -> Self {
        self.compress = false;
        self
    }
}
