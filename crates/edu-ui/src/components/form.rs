//! Descriptor-driven entity form.
//!
//! Values are kept as strings keyed by field name and only turned into
//! JSON on submit. Multi-select values are comma-separated ids, checkboxes
//! are `"true"` or `"false"`.

use std::collections::BTreeMap;
use std::sync::Arc;

use edu_types::validation::{check, normalize_phone, FieldErrors, Rule};
use leptos::prelude::*;
use serde_json::{Map, Number, Value};

use crate::api::{self, Loaded};

pub type FormValues = BTreeMap<String, String>;

/// `(value, label)` pairs for select inputs.
pub type Choices = Vec<(String, String)>;

#[derive(Clone, Debug, PartialEq)]
pub enum OptionSource {
    Static(Choices),
    /// Collection path loaded through `list_named`.
    Remote(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Password,
    Email,
    Phone,
    Number,
    TextArea,
    Checkbox,
    Select(OptionSource),
    MultiSelect(OptionSource),
}

impl FieldKind {
    fn source(&self) -> Option<&OptionSource> {
        match self {
            FieldKind::Select(source) | FieldKind::MultiSelect(source) => Some(source),
            _ => None,
        }
    }

    fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Password => "password",
            FieldKind::Email => "email",
            FieldKind::Phone => "tel",
            FieldKind::Number => "number",
            _ => "text",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub placeholder: Option<&'static str>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            rules: Vec::new(),
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.insert(0, Rule::Required);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

pub fn multi_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn toggle_id(raw: &str, id: &str, selected: bool) -> String {
    let mut ids = multi_ids(raw);
    ids.retain(|existing| existing != id);
    if selected {
        ids.push(id.to_string());
    }
    ids.join(",")
}

fn id_value(raw: &str) -> Value {
    match raw.parse::<i64>() {
        Ok(id) => Value::from(id),
        Err(_) => Value::from(raw),
    }
}

pub fn validate(fields: &[FormField], values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in fields {
        let raw = values.get(field.name).map(String::as_str).unwrap_or("");
        let raw = match field.kind {
            FieldKind::Checkbox => "",
            _ => raw,
        };
        if let Some(message) = check(raw, &field.rules) {
            errors.insert(field.name.to_string(), message);
        } else if field.kind == FieldKind::Number && !raw.trim().is_empty() && raw.trim().parse::<f64>().is_err() {
            errors.insert(field.name.to_string(), "Enter a number.".to_string());
        }
    }
    errors
}

/// Validate and convert form values to a JSON body. Blank optional values
/// become `null`; a blank password is left out so editing keeps the old one.
pub fn to_payload(fields: &[FormField], values: &FormValues) -> Result<Value, FieldErrors> {
    let errors = validate(fields, values);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut body = Map::new();
    for field in fields {
        let raw = values.get(field.name).map(|v| v.trim()).unwrap_or("");
        let value = match &field.kind {
            FieldKind::Password if raw.is_empty() => continue,
            FieldKind::Checkbox => Value::Bool(raw == "true"),
            FieldKind::MultiSelect(_) => Value::Array(multi_ids(raw).iter().map(|id| id_value(id)).collect()),
            _ if raw.is_empty() => Value::Null,
            FieldKind::Number => match raw.parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            FieldKind::Select(_) => id_value(raw),
            FieldKind::Phone => Value::from(normalize_phone(raw)),
            _ => Value::from(raw),
        };
        body.insert(field.name.to_string(), value);
    }
    Ok(Value::Object(body))
}

type RemoteOptions = RwSignal<BTreeMap<&'static str, Loaded<Choices>>>;

#[component]
pub fn EntityForm(
    fields: Vec<FormField>,
    initial: FormValues,
    #[prop(into, default = "Save".to_string())] submit_label: String,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] server_errors: Signal<FieldErrors>,
    on_submit: Callback<Value>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let fields = Arc::new(fields);
    let values = RwSignal::new(initial);
    let errors = RwSignal::new(FieldErrors::new());
    let remote: RemoteOptions = RwSignal::new(BTreeMap::new());

    let remotePaths: Vec<&'static str> = fields
        .iter()
        .filter_map(|f| match f.kind.source() {
            Some(OptionSource::Remote(path)) => Some(*path),
            _ => None,
        })
        .collect();
    Effect::new(move |_| {
        for path in remotePaths.iter().copied() {
            remote.update(|map| {
                map.insert(path, Loaded::Loading);
            });
            api::spawn(async move {
                let loaded = api::client()
                    .list_named(path)
                    .await
                    .map(|rows| rows.into_iter().map(|n| (n.id.to_string(), n.name)).collect::<Choices>());
                remote.update(|map| {
                    map.insert(path, loaded.into());
                });
            });
        }
    });

    let submit = {
        let fields = Arc::clone(&fields);
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            match to_payload(&fields, &values.get_untracked()) {
                Ok(payload) => {
                    errors.set(FieldErrors::new());
                    on_submit.run(payload);
                }
                Err(found) => errors.set(found),
            }
        }
    };

    let inputs = fields
        .iter()
        .map(|field| {
            let name = field.name;
            let message = move || {
                errors
                    .with(|e| e.get(name).cloned())
                    .or_else(|| server_errors.with(|e| e.get(name).cloned()))
            };
            view! {
                <div class="form-group" class:has-error=move || message().is_some()>
                    <label for=name>
                        {field.label}
                        {field.is_required().then_some(" *")}
                    </label>
                    {render_input(field, values, remote)}
                    {move || message().map(|m| view! { <span class="field-error">{m}</span> })}
                </div>
            }
        })
        .collect_view();

    view! {
        <form class="entity-form" on:submit=submit novalidate=true>
            {inputs}
            {move || {
                server_errors
                    .with(|e| e.get("non_field_errors").cloned())
                    .map(|m| view! { <div class="form-error">{m}</div> })
            }}
            <div class="form-actions">
                <button type="button" class="btn btn-secondary" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
                <button type="submit" class="btn btn-primary" disabled=busy>
                    {move || if busy.get() { "Saving...".to_string() } else { submit_label.clone() }}
                </button>
            </div>
        </form>
    }
}

/// Single labelled input bound to a string signal, with its error from
/// `errors`. Used by the hand-written auth and profile forms.
#[component]
pub fn FieldInput(
    name: &'static str,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: RwSignal<String>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] autocomplete: &'static str,
) -> impl IntoView {
    let message = move || errors.with(|e| e.get(name).cloned());

    view! {
        <div class="form-group" class:has-error=move || message().is_some()>
            <label for=name>{label}</label>
            <input
                id=name
                name=name
                type=input_type
                placeholder=placeholder
                autocomplete=autocomplete
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {move || message().map(|m| view! { <span class="field-error">{m}</span> })}
        </div>
    }
}

fn read(values: RwSignal<FormValues>, name: &str) -> String {
    values.with(|v| v.get(name).cloned().unwrap_or_default())
}

fn write(values: RwSignal<FormValues>, name: &str, value: String) {
    values.update(|v| {
        v.insert(name.to_string(), value);
    });
}

fn choices(source: &OptionSource, remote: RemoteOptions) -> Loaded<Choices> {
    match source {
        OptionSource::Static(list) => Loaded::Ready(list.clone()),
        OptionSource::Remote(path) => remote.with(|m| m.get(path).cloned().unwrap_or(Loaded::Loading)),
    }
}

fn render_input(field: &FormField, values: RwSignal<FormValues>, remote: RemoteOptions) -> AnyView {
    let name = field.name;
    let placeholder = field.placeholder.unwrap_or("");

    match &field.kind {
        FieldKind::TextArea => view! {
            <textarea
                id=name
                rows="4"
                placeholder=placeholder
                prop:value=move || read(values, name)
                on:input=move |ev| write(values, name, event_target_value(&ev))
            ></textarea>
        }
        .into_any(),
        FieldKind::Checkbox => view! {
            <input
                id=name
                type="checkbox"
                prop:checked=move || read(values, name) == "true"
                on:change=move |ev| write(values, name, event_target_checked(&ev).to_string())
            />
        }
        .into_any(),
        FieldKind::Select(source) => {
            let source = source.clone();
            view! {
                <select id=name on:change=move |ev| write(values, name, event_target_value(&ev))>
                    <option value="" selected=move || read(values, name).is_empty()>
                        "Select..."
                    </option>
                    {move || match choices(&source, remote) {
                        Loaded::Ready(list) => list
                            .into_iter()
                            .map(|(value, label)| {
                                let current = value.clone();
                                view! {
                                    <option value=value selected=move || read(values, name) == current>
                                        {label}
                                    </option>
                                }
                            })
                            .collect_view()
                            .into_any(),
                        Loaded::Loading => view! { <option disabled=true>"Loading..."</option> }.into_any(),
                        Loaded::Failed(_) => view! { <option disabled=true>"Could not load options"</option> }
                            .into_any(),
                    }}
                </select>
            }
            .into_any()
        }
        FieldKind::MultiSelect(source) => {
            let source = source.clone();
            view! {
                <div class="multi-select" id=name>
                    {move || match choices(&source, remote) {
                        Loaded::Ready(list) => list
                            .into_iter()
                            .map(|(value, label)| {
                                let checkedId = value.clone();
                                view! {
                                    <label class="checkbox">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || multi_ids(&read(values, name)).contains(&checkedId)
                                            on:change=move |ev| {
                                                let next = toggle_id(&read(values, name), &value, event_target_checked(&ev));
                                                write(values, name, next);
                                            }
                                        />
                                        {label}
                                    </label>
                                }
                            })
                            .collect_view()
                            .into_any(),
                        Loaded::Loading => view! { <span class="muted">"Loading..."</span> }.into_any(),
                        Loaded::Failed(e) => view! { <span class="field-error">{e}</span> }.into_any(),
                    }}
                </div>
            }
            .into_any()
        }
        kind => view! {
            <input
                id=name
                type=kind.input_type()
                placeholder=placeholder
                prop:value=move || read(values, name)
                on:input=move |ev| write(values, name, event_target_value(&ev))
            />
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn center_fields() -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("phone", "Phone", FieldKind::Phone).rule(Rule::Phone),
            FormField::new("region", "Region", FieldKind::Select(OptionSource::Remote("/regions/"))),
            FormField::new("fields", "Courses", FieldKind::MultiSelect(OptionSource::Remote("/fields/"))),
            FormField::new("capacity", "Capacity", FieldKind::Number),
            FormField::new("is_active", "Active", FieldKind::Checkbox),
            FormField::new("password", "Password", FieldKind::Password),
        ]
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn payload_converts_types() {
        let input = values(&[
            ("name", " Bright Minds "),
            ("phone", "+998 (90) 123-45-67"),
            ("region", "4"),
            ("fields", "1, 3,,7"),
            ("capacity", "120"),
            ("is_active", "true"),
        ]);

        let payload = to_payload(&center_fields(), &input).unwrap();

        assert_eq!(
            payload,
            json!({
                "name": "Bright Minds",
                "phone": "+998901234567",
                "region": 4,
                "fields": [1, 3, 7],
                "capacity": 120,
                "is_active": true,
            })
        );
    }

    #[test]
    fn blank_optionals_become_null() {
        let payload = to_payload(&center_fields(), &values(&[("name", "Nova")])).unwrap();

        assert_eq!(payload["phone"], Value::Null);
        assert_eq!(payload["region"], Value::Null);
        assert_eq!(payload["capacity"], Value::Null);
        assert_eq!(payload["fields"], json!([]));
        assert_eq!(payload["is_active"], json!(false));
        assert!(payload.get("password").is_none());
    }

    #[test]
    fn rule_failures_are_reported_per_field() {
        let errors = to_payload(&center_fields(), &values(&[("phone", "12"), ("capacity", "many")])).unwrap_err();

        assert_eq!(errors["name"], "This field is required.");
        assert_eq!(errors["phone"], "Enter a valid phone number.");
        assert_eq!(errors["capacity"], "Enter a number.");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn fractional_numbers_survive() {
        let fields = vec![FormField::new("rating", "Rating", FieldKind::Number).rule(Rule::Range(0.0, 5.0))];
        let payload = to_payload(&fields, &values(&[("rating", "4.5")])).unwrap();
        assert_eq!(payload["rating"], json!(4.5));

        let errors = to_payload(&fields, &values(&[("rating", "7")])).unwrap_err();
        assert_eq!(errors["rating"], "Must be between 0 and 5.");
    }

    #[test]
    fn toggle_ids() {
        assert_eq!(toggle_id("1,2", "3", true), "1,2,3");
        assert_eq!(toggle_id("1,2,3", "2", false), "1,3");
        assert_eq!(toggle_id("", "5", true), "5");
        assert_eq!(toggle_id("5", "5", true), "5");
    }
}
