use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::User => "User",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: Id,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub date_joined: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.phone.clone()
        } else {
            name.to_string()
        }
    }

    /// Staff members share the admin console with administrators.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Region {
    pub id: Id,
    pub name: String,
}

/// A field of study. The public site presents fields as "courses".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Field {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subject {
    pub id: Id,
    pub name: String,
    pub field_id: Option<Id>,
    pub field: Option<Field>,
}

impl Subject {
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_ref().map(|f| f.name.as_str())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EducationalCenter {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub region_id: Option<Id>,
    pub region: Option<Region>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub fields: Vec<Field>,
    pub subjects: Vec<Subject>,
    pub rating: Option<f32>,
    pub stars_count: u32,
}

impl EducationalCenter {
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.name.as_str())
    }

    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) if self.stars_count > 0 => format!("{r:.1} ({})", self.stars_count),
            _ => "No ratings yet".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Branch {
    pub id: Id,
    pub center_id: Id,
    pub center_name: Option<String>,
    pub name: String,
    pub region_id: Option<Id>,
    pub region: Option<Region>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceCategory {
    pub id: Id,
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resource {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Id>,
    pub category: Option<ResourceCategory>,
    pub subject_id: Option<Id>,
    pub subject: Option<Subject>,
    pub link: Option<String>,
    pub file: Option<String>,
    pub author_id: Option<Id>,
    pub created_at: Option<String>,
}

impl Resource {
    /// External link wins over an uploaded file URL.
    pub fn url(&self) -> Option<&str> {
        self.link
            .as_deref()
            .filter(|l| !l.is_empty())
            .or(self.file.as_deref().filter(|f| !f.is_empty()))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommentAuthor {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Comment {
    pub id: Id,
    pub center_id: Id,
    pub center_name: Option<String>,
    pub user_id: Id,
    pub author: Option<CommentAuthor>,
    pub text: String,
    pub created_at: Option<String>,
}

impl Comment {
    pub fn author_name(&self) -> String {
        self.author
            .as_ref()
            .map(|a| format!("{} {}", a.first_name, a.last_name).trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Anonymous".to_string())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Star {
    pub id: Id,
    pub center_id: Id,
    pub center_name: Option<String>,
    pub user_id: Id,
    pub value: u8,
    pub created_at: Option<String>,
}

/// Minimal `{id, name}` projection used to fill select inputs.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Named {
    pub id: Id,
    #[serde(alias = "title")]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentInput {
    pub center: Id,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StarInput {
    pub center: Id,
    pub value: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_decodes_with_missing_relations() {
        let raw = r#"{"id": 4, "name": "Bright Minds", "rating": 4.5, "stars_count": 2, "extra": true}"#;
        let center: EducationalCenter = serde_json::from_str(raw).unwrap();
        assert_eq!(center.id, 4);
        assert!(center.region.is_none());
        assert!(center.fields.is_empty());
        assert_eq!(center.rating_label(), "4.5 (2)");
    }

    #[test]
    fn unknown_role_falls_back_to_user() {
        let user: User = serde_json::from_str(r#"{"id": 1, "role": "superhero"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());

        let staff: User = serde_json::from_str(r#"{"id": 2, "role": "staff"}"#).unwrap();
        assert!(staff.is_admin());
    }

    #[test]
    fn full_name_falls_back_to_phone() {
        let user = User {
            phone: "+998901234567".into(),
            ..Default::default()
        };
        assert_eq!(user.full_name(), "+998901234567");

        let named = User {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert_eq!(named.full_name(), "Ada Lovelace");
    }

    #[test]
    fn named_accepts_title_alias() {
        let named: Named = serde_json::from_str(r#"{"id": 3, "title": "Algebra basics"}"#).unwrap();
        assert_eq!(named.name, "Algebra basics");
    }

    #[test]
    fn resource_url_prefers_link() {
        let resource = Resource {
            link: Some(String::new()),
            file: Some("https://files.example.com/a.pdf".into()),
            ..Default::default()
        };
        assert_eq!(resource.url(), Some("https://files.example.com/a.pdf"));
    }
}
