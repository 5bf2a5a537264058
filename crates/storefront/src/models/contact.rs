//! Store metadata rows: `contact_info`, `settings`, `profiles`.

use serde::{Deserialize, Serialize};

use vitrine_core::{ContactInfoId, LocalizedText, UserId, UserType};

/// Row of the `contact_info` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: ContactInfoId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: LocalizedText,
    #[serde(default)]
    pub instagram: Option<String>,
}

/// Row of the `settings` key/value table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Row of the `profiles` table (one per auth user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default, deserialize_with = "user_type_lenient")]
    pub user_type: UserType,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Accept any string (or null) for `user_type`; unknown values mean retail.
fn user_type_lenient<'de, D>(deserializer: D) -> Result<UserType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map_or(UserType::Retail, |value| UserType::from_profile_value(&value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn profile_user_type_is_lenient() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10",
            "user_type": "WHOLESALE"
        }))
        .unwrap();
        assert_eq!(profile.user_type, UserType::Wholesale);

        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10",
            "user_type": null
        }))
        .unwrap();
        assert_eq!(profile.user_type, UserType::Retail);
    }
}
