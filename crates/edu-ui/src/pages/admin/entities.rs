use edu_types::validation::{Rule, MIN_PASSWORD_LENGTH};
use edu_types::{Branch, EducationalCenter, Field, Id, Region, Resource, Role, Star, Subject, User};

use super::AdminEntity;
use crate::components::form::{FieldKind, FormField, FormValues, OptionSource};
use crate::table::{Column, SortValue};

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn id_text(id: Option<Id>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn values<const N: usize>(pairs: [(&str, String); N]) -> FormValues {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn id_column<T: AdminEntity>() -> Column<T> {
    Column::new("id", "ID", |row: &T| row.id().to_string())
        .sort_by(|row: &T| Some(SortValue::Number(row.id() as f64)))
        .hide_on_mobile()
}

fn role_choices() -> Vec<(String, String)> {
    [Role::User, Role::Staff, Role::Admin]
        .iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect()
}

impl AdminEntity for User {
    const TITLE: &'static str = "Users";
    const SINGULAR: &'static str = "User";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |u: &User| u.full_name()).sort_text(),
            Column::new("phone", "Phone", |u: &User| u.phone.clone()),
            Column::new("email", "Email", |u: &User| opt(&u.email)).sort_text().hide_on_mobile(),
            Column::new("role", "Role", |u: &User| u.role.label().to_string()).sort_text(),
            Column::new("active", "Active", |u: &User| if u.is_active { "Yes" } else { "No" }.to_string())
                .hide_on_mobile(),
        ]
    }

    fn form_fields(editing: bool) -> Vec<FormField> {
        let password = FormField::new("password", "Password", FieldKind::Password)
            .rule(Rule::MinLength(MIN_PASSWORD_LENGTH));
        let password = if editing {
            password.placeholder("Leave blank to keep the current password")
        } else {
            password.required()
        };
        vec![
            FormField::new("phone", "Phone", FieldKind::Phone).required().rule(Rule::Phone),
            FormField::new("first_name", "First name", FieldKind::Text).required().rule(Rule::MaxLength(64)),
            FormField::new("last_name", "Last name", FieldKind::Text).required().rule(Rule::MaxLength(64)),
            FormField::new("email", "Email", FieldKind::Email).rule(Rule::Email),
            FormField::new("role", "Role", FieldKind::Select(OptionSource::Static(role_choices()))).required(),
            FormField::new("is_active", "Active", FieldKind::Checkbox),
            password,
        ]
    }

    fn form_values(&self) -> FormValues {
        values([
            ("phone", self.phone.clone()),
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("email", opt(&self.email)),
            ("role", self.role.as_str().to_string()),
            ("is_active", self.is_active.to_string()),
        ])
    }

    fn defaults() -> FormValues {
        values([("role", Role::User.as_str().to_string()), ("is_active", "true".to_string())])
    }

    fn describe(&self) -> String {
        self.full_name()
    }
}

impl AdminEntity for EducationalCenter {
    const TITLE: &'static str = "Centers";
    const SINGULAR: &'static str = "Center";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |c: &EducationalCenter| c.name.clone()).sort_text(),
            Column::new("region", "Region", |c: &EducationalCenter| c.region_name().unwrap_or("").to_string())
                .sort_text(),
            Column::new("phone", "Phone", |c: &EducationalCenter| opt(&c.phone)).hide_on_mobile(),
            Column::new("rating", "Rating", |c: &EducationalCenter| c.rating_label())
                .sort_by(|c: &EducationalCenter| c.rating.map(|r| SortValue::Number(r as f64))),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required().rule(Rule::MaxLength(255)),
            FormField::new("description", "Description", FieldKind::TextArea),
            FormField::new("region", "Region", FieldKind::Select(OptionSource::Remote("/regions/"))).required(),
            FormField::new("address", "Address", FieldKind::Text),
            FormField::new("phone", "Phone", FieldKind::Phone).rule(Rule::Phone),
            FormField::new("email", "Email", FieldKind::Email).rule(Rule::Email),
            FormField::new("website", "Website", FieldKind::Text)
                .rule(Rule::Url)
                .placeholder("https://"),
            FormField::new("fields", "Courses", FieldKind::MultiSelect(OptionSource::Remote("/fields/"))),
            FormField::new("subjects", "Subjects", FieldKind::MultiSelect(OptionSource::Remote("/subjects/"))),
        ]
    }

    fn form_values(&self) -> FormValues {
        let join = |ids: Vec<Id>| ids.iter().map(Id::to_string).collect::<Vec<_>>().join(",");
        values([
            ("name", self.name.clone()),
            ("description", opt(&self.description)),
            ("region", id_text(self.region_id.or(self.region.as_ref().map(|r| r.id)))),
            ("address", opt(&self.address)),
            ("phone", opt(&self.phone)),
            ("email", opt(&self.email)),
            ("website", opt(&self.website)),
            ("fields", join(self.fields.iter().map(|f| f.id).collect())),
            ("subjects", join(self.subjects.iter().map(|s| s.id).collect())),
        ])
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl AdminEntity for Branch {
    const TITLE: &'static str = "Branches";
    const SINGULAR: &'static str = "Branch";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |b: &Branch| b.name.clone()).sort_text(),
            Column::new("center", "Center", |b: &Branch| opt(&b.center_name)).sort_text(),
            Column::new("region", "Region", |b: &Branch| {
                b.region.as_ref().map(|r| r.name.clone()).unwrap_or_default()
            })
            .sort_text()
            .hide_on_mobile(),
            Column::new("address", "Address", |b: &Branch| opt(&b.address)).hide_on_mobile(),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required().rule(Rule::MaxLength(255)),
            FormField::new("center", "Center", FieldKind::Select(OptionSource::Remote("/centers/"))).required(),
            FormField::new("region", "Region", FieldKind::Select(OptionSource::Remote("/regions/"))),
            FormField::new("address", "Address", FieldKind::Text),
            FormField::new("phone", "Phone", FieldKind::Phone).rule(Rule::Phone),
        ]
    }

    fn form_values(&self) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("center", self.center_id.to_string()),
            ("region", id_text(self.region_id.or(self.region.as_ref().map(|r| r.id)))),
            ("address", opt(&self.address)),
            ("phone", opt(&self.phone)),
        ])
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl AdminEntity for Region {
    const TITLE: &'static str = "Regions";
    const SINGULAR: &'static str = "Region";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![id_column(), Column::new("name", "Name", |r: &Region| r.name.clone()).sort_text()]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![FormField::new("name", "Name", FieldKind::Text).required().rule(Rule::MaxLength(128))]
    }

    fn form_values(&self) -> FormValues {
        values([("name", self.name.clone())])
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl AdminEntity for Field {
    const TITLE: &'static str = "Courses";
    const SINGULAR: &'static str = "Course";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |f: &Field| f.name.clone()).sort_text(),
            Column::new("description", "Description", |f: &Field| opt(&f.description)).hide_on_mobile(),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required().rule(Rule::MaxLength(128)),
            FormField::new("description", "Description", FieldKind::TextArea),
            FormField::new("icon", "Icon", FieldKind::Text).placeholder("Emoji or icon name"),
        ]
    }

    fn form_values(&self) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("description", opt(&self.description)),
            ("icon", opt(&self.icon)),
        ])
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl AdminEntity for Subject {
    const TITLE: &'static str = "Subjects";
    const SINGULAR: &'static str = "Subject";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |s: &Subject| s.name.clone()).sort_text(),
            Column::new("field", "Course", |s: &Subject| s.field_name().unwrap_or("").to_string()).sort_text(),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required().rule(Rule::MaxLength(128)),
            FormField::new("field", "Course", FieldKind::Select(OptionSource::Remote("/fields/"))).required(),
        ]
    }

    fn form_values(&self) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("field", id_text(self.field_id.or(self.field.as_ref().map(|f| f.id)))),
        ])
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl AdminEntity for Resource {
    const TITLE: &'static str = "Resources";
    const SINGULAR: &'static str = "Resource";

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("title", "Title", |r: &Resource| r.title.clone()).sort_text(),
            Column::new("category", "Category", |r: &Resource| {
                r.category.as_ref().map(|c| c.name.clone()).unwrap_or_default()
            })
            .sort_text(),
            Column::new("subject", "Subject", |r: &Resource| {
                r.subject.as_ref().map(|s| s.name.clone()).unwrap_or_default()
            })
            .sort_text()
            .hide_on_mobile(),
            Column::new("created", "Added", |r: &Resource| opt(&r.created_at))
                .sort_text()
                .hide_on_mobile(),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        vec![
            FormField::new("title", "Title", FieldKind::Text).required().rule(Rule::MaxLength(255)),
            FormField::new("description", "Description", FieldKind::TextArea),
            FormField::new(
                "category",
                "Category",
                FieldKind::Select(OptionSource::Remote("/resource-categories/")),
            )
            .required(),
            FormField::new("subject", "Subject", FieldKind::Select(OptionSource::Remote("/subjects/"))),
            FormField::new("link", "Link", FieldKind::Text).rule(Rule::Url).placeholder("https://"),
        ]
    }

    fn form_values(&self) -> FormValues {
        values([
            ("title", self.title.clone()),
            ("description", opt(&self.description)),
            ("category", id_text(self.category_id.or(self.category.as_ref().map(|c| c.id)))),
            ("subject", id_text(self.subject_id.or(self.subject.as_ref().map(|s| s.id)))),
            ("link", opt(&self.link)),
        ])
    }

    fn describe(&self) -> String {
        self.title.clone()
    }
}

impl AdminEntity for Star {
    const TITLE: &'static str = "Ratings";
    const SINGULAR: &'static str = "Rating";
    const EDITABLE: bool = false;

    fn id(&self) -> Id {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("center", "Center", |s: &Star| {
                s.center_name.clone().unwrap_or_else(|| format!("#{}", s.center_id))
            })
            .sort_text(),
            Column::new("user", "User", |s: &Star| format!("#{}", s.user_id)).hide_on_mobile(),
            Column::new("value", "Stars", |s: &Star| s.value.to_string())
                .sort_by(|s: &Star| Some(SortValue::Number(s.value as f64))),
            Column::new("created", "Date", |s: &Star| opt(&s.created_at)).sort_text().hide_on_mobile(),
        ]
    }

    fn form_fields(_editing: bool) -> Vec<FormField> {
        Vec::new()
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
    }

    fn describe(&self) -> String {
        let center = self.center_name.clone().unwrap_or_else(|| format!("center #{}", self.center_id));
        format!("{} stars for {center}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::components::form::to_payload;

    #[test]
    fn center_round_trips_relations_as_ids() {
        let center = EducationalCenter {
            id: 4,
            name: "Bright Minds".into(),
            region: Some(Region { id: 2, name: "Tashkent".into() }),
            fields: vec![Field { id: 1, ..Default::default() }, Field { id: 3, ..Default::default() }],
            ..Default::default()
        };

        let payload = to_payload(&EducationalCenter::form_fields(true), &center.form_values()).unwrap();

        assert_eq!(payload["region"], json!(2));
        assert_eq!(payload["fields"], json!([1, 3]));
        assert_eq!(payload["subjects"], json!([]));
        assert_eq!(payload["website"], json!(null));
    }

    #[test]
    fn new_user_requires_password_but_edit_does_not() {
        let mut form = User::defaults();
        form.insert("phone".into(), "+998 90 123-45-67".into());
        form.insert("first_name".into(), "Ada".into());
        form.insert("last_name".into(), "Lovelace".into());

        let errors = to_payload(&User::form_fields(false), &form).unwrap_err();
        assert!(errors.contains_key("password"));

        let payload = to_payload(&User::form_fields(true), &form).unwrap();
        assert!(payload.get("password").is_none());
        assert_eq!(payload["phone"], json!("+998901234567"));
        assert_eq!(payload["is_active"], json!(true));
        assert_eq!(payload["role"], json!("user"));
    }

    #[test]
    fn stars_are_list_only() {
        assert!(!Star::EDITABLE);
        assert!(Star::form_fields(false).is_empty());
        let star = Star { value: 4, center_id: 9, ..Default::default() };
        assert_eq!(star.describe(), "4 stars for center #9");
    }
}
